use std::env;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log verbosity tier.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

const DEFAULT_LEVEL: &str = "warn";

/// Maps a `LOG_LEVEL` value to a filter directive.
///
/// Unset or unrecognized values fall back to warnings-and-above.
pub fn level_directive(value: Option<&str>) -> &'static str {
    match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => "debug",
        Some("INFO") => "info",
        Some("WARNING") | Some("WARN") => "warn",
        Some("ERROR") | Some("CRITICAL") => "error",
        _ => DEFAULT_LEVEL,
    }
}

/// Installs the stderr logger. Stdout is reserved for the statusline itself.
pub fn init_logging() {
    let level = level_directive(env::var(LOG_LEVEL_ENV).ok().as_deref());
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .without_time()
        .try_init();
}
