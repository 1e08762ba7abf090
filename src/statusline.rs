use crate::config::{Config, ConfigStore, DisplayMode};
use crate::display::{format_statusline, RenderContext};
use crate::error::Result;
use crate::extract::{DataExtractor, StatusData};
use crate::segments::{HostProbe, Probe};
use crate::themes::no_color_requested;
use crate::utils::SessionSnapshot;
use tracing::debug;

/// Per-invocation overrides from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOverrides {
    pub display_mode: Option<DisplayMode>,
    pub no_color: bool,
}

impl RenderOverrides {
    pub fn context(&self, config: &Config) -> RenderContext {
        let mut ctx = RenderContext::from_config(config, no_color_requested() || self.no_color);
        if let Some(mode) = self.display_mode {
            ctx.verbose = mode.is_verbose();
        }
        ctx
    }
}

/// Input JSON in, rendered statusline out.
pub struct StatusLine<P = HostProbe> {
    store: ConfigStore,
    extractor: DataExtractor<P>,
}

impl StatusLine<HostProbe> {
    pub fn new(store: ConfigStore) -> Self {
        Self::with_probe(store, HostProbe::new())
    }
}

impl<P: Probe> StatusLine<P> {
    pub fn with_probe(store: ConfigStore, probe: P) -> Self {
        Self {
            store,
            extractor: DataExtractor::new(probe),
        }
    }

    /// Fails only when the input is not a JSON object.
    pub async fn generate(&mut self, input: &str, overrides: &RenderOverrides) -> Result<String> {
        debug!("Parsing JSON input");
        let session = SessionSnapshot::parse(input)?;

        let config = self.store.load().await;
        let ctx = overrides.context(&config);
        debug!("Rendering with verbose={}, colors={}", ctx.verbose, ctx.colors);

        let data = self.extractor.extract(&session, &config).await;
        Ok(format_statusline(&data, &config, &ctx))
    }
}

/// Representative values for previewing a configuration.
pub fn sample_data() -> StatusData {
    StatusData {
        model: Some("claude-sonnet-4-5".to_string()),
        version: Some("1.0.85".to_string()),
        context_remaining: Some(72),
        tokens: Some(45_230),
        tokens_per_minute: Some(1_507),
        current_dir: Some("my-project".to_string()),
        git_branch: Some("main *↑1".to_string()),
        cost: Some(1.23),
        cost_per_hour: Some(2.46),
        duration_ms: Some(1_800_000),
        lines_changed: Some(187),
        output_style: Some("default".to_string()),
        cpu_usage: Some(23),
        memory_usage: Some(61),
        battery: Some(88),
        python_version: Some("3.12.4".to_string()),
        python_venv: Some(".venv".to_string()),
        datetime: Some("2025-01-01 12:00:00".to_string()),
    }
}

pub fn preview(config: &Config, overrides: &RenderOverrides) -> String {
    format_statusline(&sample_data(), config, &overrides.context(config))
}
