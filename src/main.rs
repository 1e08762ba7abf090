use anyhow::{anyhow, bail, Context, Result};
use claude_statusline::utils::init_logging;
use claude_statusline::*;
use pico_args::Arguments;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{error, warn};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    help: bool,
    verbose: bool,
    compact: bool,
    no_color: bool,
    preview: bool,
    init_config: bool,
    show_config: bool,
    reset_config: bool,
    toggle: Option<String>,
    set_icon: Option<String>,
    set_color: Option<String>,
    move_field: Option<String>,
    mode: Option<String>,
    bar_width: Option<i64>,
}

impl Args {
    fn from_env() -> Result<Self> {
        let mut args = Arguments::from_env();

        let parsed = Self {
            config: args.opt_value_from_str::<_, PathBuf>("--config")?,
            help: args.contains(["-h", "--help"]),
            verbose: args.contains("--verbose"),
            compact: args.contains("--compact"),
            no_color: args.contains("--no-color"),
            preview: args.contains("--preview"),
            init_config: args.contains("--init-config"),
            show_config: args.contains("--show-config"),
            reset_config: args.contains("--reset-config"),
            toggle: args.opt_value_from_str("--toggle")?,
            set_icon: args.opt_value_from_str("--set-icon")?,
            set_color: args.opt_value_from_str("--set-color")?,
            move_field: args.opt_value_from_str("--move")?,
            mode: args.opt_value_from_str("--mode")?,
            bar_width: args.opt_value_from_str("--bar-width")?,
        };

        let rest = args.finish();
        if !rest.is_empty() {
            warn!("Ignoring unrecognized arguments: {:?}", rest);
        }
        Ok(parsed)
    }

    fn overrides(&self) -> RenderOverrides {
        let display_mode = if self.verbose {
            Some(DisplayMode::Verbose)
        } else if self.compact {
            Some(DisplayMode::Compact)
        } else {
            None
        };
        RenderOverrides {
            display_mode,
            no_color: self.no_color,
        }
    }

    fn has_edits(&self) -> bool {
        self.toggle.is_some()
            || self.set_icon.is_some()
            || self.set_color.is_some()
            || self.move_field.is_some()
            || self.mode.is_some()
            || self.bar_width.is_some()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::from_env()?;

    if args.help {
        print_help();
        return Ok(());
    }

    let mut store = ConfigStore::new(resolve_config_path(args.config.clone()));

    if args.reset_config {
        store.reset().await.context("Failed to reset configuration")?;
        println!("Configuration reset to defaults at {}", store.path().display());
        return Ok(());
    }

    if args.init_config {
        let created = store
            .ensure_exists()
            .await
            .context("Failed to create configuration")?;
        if created {
            println!("Created default configuration at {}", store.path().display());
        } else {
            println!("Configuration already exists at {}", store.path().display());
        }
        return Ok(());
    }

    if args.has_edits() {
        let mut config = store.load().await;
        let notices = apply_edits(&mut config, &args)?;
        store
            .save(&config)
            .await
            .with_context(|| format!("Failed to save configuration to {}", store.path().display()))?;
        for notice in notices {
            println!("{}", notice);
        }
        println!("Saved configuration to {}", store.path().display());
        return Ok(());
    }

    if args.show_config {
        let config = store.load().await;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.preview {
        let config = store.load().await;
        println!("{}", preview(&config, &args.overrides()));
        return Ok(());
    }

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read session JSON from stdin")?;

    let mut statusline = StatusLine::new(store);
    let output = statusline.generate(&input, &args.overrides()).await?;
    println!("{}", output);

    Ok(())
}

/// Applies every requested edit in memory. Returns the messages to show once
/// the result has been saved.
fn apply_edits(config: &mut Config, args: &Args) -> Result<Vec<String>> {
    let mut notices = Vec::new();

    if let Some(name) = &args.toggle {
        let field: FieldKind = name.parse()?;
        let visible = config.toggle_field(field);
        notices.push(format!("{} is now {}", field, if visible { "visible" } else { "hidden" }));
    }

    if let Some(spec) = &args.set_icon {
        let (key, icon) = split_assignment(spec, "--set-icon")?;
        config.set_icon(key, icon)?;
    }

    if let Some(spec) = &args.set_color {
        let (key, color) = split_assignment(spec, "--set-color")?;
        config.set_color(key, color)?;
    }

    if let Some(spec) = &args.move_field {
        let (name, position) = split_assignment(spec, "--move")?;
        let field: FieldKind = name.parse()?;
        let position: usize = position
            .parse()
            .with_context(|| format!("Invalid position '{}' for --move", position))?;
        config.move_field(field, position);
    }

    if let Some(mode) = &args.mode {
        config.set_display_mode(mode.parse()?);
    }

    if let Some(width) = args.bar_width {
        config.set_progress_bar_width(width)?;
    }

    Ok(notices)
}

/// Splits `key=value`; the value may be empty (e.g. to remove an icon).
fn split_assignment<'a>(spec: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    let (key, value) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("{} expects <key>=<value>, got '{}'", flag, spec))?;
    if key.is_empty() {
        bail!("{} expects a non-empty key", flag);
    }
    Ok((key, value))
}

fn print_help() {
    println!("Claude Statusline - Configurable statusline for Claude Code");
    println!();
    println!("USAGE:");
    println!("    claude-statusline [OPTIONS] < session.json");
    println!();
    println!("RENDER OPTIONS:");
    println!("    --config <FILE>            Config file path");
    println!("    --verbose                  Labeled output for this run");
    println!("    --compact                  Icon-only output for this run");
    println!("    --no-color                 Disable ANSI colors for this run");
    println!("    --preview                  Render sample data with the current config");
    println!();
    println!("CONFIG OPTIONS:");
    println!("    --init-config              Write the default config if none exists");
    println!("    --show-config              Print the validated config");
    println!("    --reset-config             Restore the default config");
    println!("    --toggle <FIELD>           Show or hide a field");
    println!("    --set-icon <KEY>=<ICON>    Change an icon (empty removes it)");
    println!("    --set-color <KEY>=<COLOR>  cyan, green, blue, magenta, yellow, red, white");
    println!("    --move <FIELD>=<POS>       Move a field within its display line order");
    println!("    --mode <MODE>              compact or verbose");
    println!("    --bar-width <N>            Progress bar width (5-50)");
    println!("    -h, --help                 Show this help message");
    println!();
    println!("FIELDS:");
    let names: Vec<&str> = FieldKind::ALL.iter().map(|f| f.name()).collect();
    println!("    {}", names.join(", "));
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    CLAUDE_STATUSLINE_CONFIG   Override config path");
    println!("    NO_COLOR                   Disable colors");
    println!("    LOG_LEVEL                  DEBUG, INFO, WARNING (default), ERROR");
}
