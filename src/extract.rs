use crate::config::Config;
use crate::fields::FieldKind;
use crate::segments::Probe;
use crate::utils::SessionSnapshot;
use std::path::Path;
use tracing::debug;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat per-invocation values, one slot per field plus the two rates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusData {
    pub model: Option<String>,
    pub version: Option<String>,
    pub context_remaining: Option<u8>,
    pub tokens: Option<u64>,
    pub tokens_per_minute: Option<u64>,
    pub current_dir: Option<String>,
    pub git_branch: Option<String>,
    pub cost: Option<f64>,
    pub cost_per_hour: Option<f64>,
    pub duration_ms: Option<u64>,
    pub lines_changed: Option<u64>,
    pub output_style: Option<String>,
    pub cpu_usage: Option<u8>,
    pub memory_usage: Option<u8>,
    pub battery: Option<u8>,
    pub python_version: Option<String>,
    pub python_venv: Option<String>,
    pub datetime: Option<String>,
}

impl StatusData {
    /// Text value for simple fields; empty strings count as absent.
    pub fn text(&self, field: FieldKind) -> Option<&str> {
        let value = match field {
            FieldKind::Model => &self.model,
            FieldKind::Version => &self.version,
            FieldKind::CurrentDir => &self.current_dir,
            FieldKind::GitBranch => &self.git_branch,
            FieldKind::OutputStyle => &self.output_style,
            FieldKind::PythonVersion => &self.python_version,
            FieldKind::PythonVenv => &self.python_venv,
            FieldKind::Datetime => &self.datetime,
            _ => return None,
        };
        value.as_deref().filter(|s| !s.is_empty())
    }

    pub fn percent(&self, field: FieldKind) -> Option<u8> {
        match field {
            FieldKind::ContextRemaining => self.context_remaining,
            FieldKind::CpuUsage => self.cpu_usage,
            FieldKind::MemoryUsage => self.memory_usage,
            FieldKind::Battery => self.battery,
            _ => None,
        }
    }

    /// Metric value and its rate, if one was computable.
    pub fn metric(&self, field: FieldKind) -> Option<(f64, Option<f64>)> {
        match field {
            FieldKind::Cost => self.cost.map(|cost| (cost, self.cost_per_hour)),
            FieldKind::Tokens => self
                .tokens
                .map(|tokens| (tokens as f64, self.tokens_per_minute.map(|r| r as f64))),
            FieldKind::LinesChanged => self.lines_changed.map(|lines| (lines as f64, None)),
            _ => None,
        }
    }

    pub fn millis(&self, field: FieldKind) -> Option<u64> {
        match field {
            FieldKind::Duration => self.duration_ms,
            _ => None,
        }
    }

    /// Fields that carry a value, for diagnostics.
    pub fn present_fields(&self) -> Vec<FieldKind> {
        FieldKind::ALL
            .iter()
            .copied()
            .filter(|field| {
                self.text(*field).is_some()
                    || self.percent(*field).is_some()
                    || self.metric(*field).is_some()
                    || self.millis(*field).is_some()
            })
            .collect()
    }
}

/// Maps a session snapshot plus probe results onto [`StatusData`].
///
/// Each sub-extraction stands alone: a missing section or a failed probe
/// only leaves its own fields empty. Probes for hidden fields are skipped.
#[derive(Debug, Clone, Default)]
pub struct DataExtractor<P> {
    probe: P,
}

impl<P: Probe> DataExtractor<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub async fn extract(&self, session: &SessionSnapshot, config: &Config) -> StatusData {
        let mut data = StatusData::default();

        extract_model(session, &mut data);
        extract_version(session, &mut data);
        extract_context(session, &mut data);
        self.extract_workspace(session, config, &mut data).await;
        extract_cost(session, &mut data);
        extract_output_style(session, &mut data);
        self.extract_system(config, &mut data).await;
        self.extract_runtime(config, &mut data).await;

        debug!("Extracted fields: {:?}", data.present_fields());
        data
    }

    async fn extract_workspace(&self, session: &SessionSnapshot, config: &Config, data: &mut StatusData) {
        let Some(cwd) = session.current_dir() else {
            return;
        };

        let path = Path::new(cwd);
        data.current_dir = Some(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| cwd.to_string()),
        );

        if config.is_visible(FieldKind::GitBranch) {
            data.git_branch = self.probe.git_summary(path).await;
        }
    }

    async fn extract_system(&self, config: &Config, data: &mut StatusData) {
        let (cpu, memory, battery) = tokio::join!(
            async {
                if config.is_visible(FieldKind::CpuUsage) {
                    self.probe.cpu_usage().await
                } else {
                    None
                }
            },
            async {
                if config.is_visible(FieldKind::MemoryUsage) {
                    self.probe.memory_usage().await
                } else {
                    None
                }
            },
            async {
                if config.is_visible(FieldKind::Battery) {
                    self.probe.battery().await
                } else {
                    None
                }
            },
        );
        data.cpu_usage = cpu;
        data.memory_usage = memory;
        data.battery = battery;
    }

    async fn extract_runtime(&self, config: &Config, data: &mut StatusData) {
        if config.is_visible(FieldKind::PythonVersion) {
            data.python_version = self.probe.python_version().await;
        }
        data.python_venv = self.probe.python_venv();
        data.datetime = Some(self.probe.now().format(DATETIME_FORMAT).to_string());
    }
}

/// Model id, or the display name when no id is given.
fn extract_model(session: &SessionSnapshot, data: &mut StatusData) {
    let Some(model) = &session.model else {
        return;
    };
    data.model = [&model.id, &model.display_name]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .cloned();
}

fn extract_version(session: &SessionSnapshot, data: &mut StatusData) {
    data.version = session.version.clone().filter(|v| !v.is_empty());
}

fn extract_context(session: &SessionSnapshot, data: &mut StatusData) {
    let Some(window) = &session.context_window else {
        return;
    };

    data.context_remaining = window
        .remaining_percentage
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 100.0) as u8);

    let input = count(window.total_input_tokens);
    let output = count(window.total_output_tokens);
    let total = input.unwrap_or(0) + output.unwrap_or(0);
    if total > 0 {
        data.tokens = Some(total);
    }
}

/// Cost, duration, lines and the two rates. Runs after context so the token
/// rate can use the token total.
fn extract_cost(session: &SessionSnapshot, data: &mut StatusData) {
    let Some(cost) = &session.cost else {
        return;
    };

    data.cost = cost.total_cost_usd.filter(|c| c.is_finite() && *c >= 0.0);
    data.duration_ms = count(cost.total_duration_ms);

    if let Some(duration_ms) = data.duration_ms.filter(|ms| *ms > 0) {
        let duration_ms = duration_ms as f64;

        if let Some(cost) = data.cost.filter(|c| *c > 0.0) {
            data.cost_per_hour = Some(cost / (duration_ms / MS_PER_HOUR)).filter(|r| r.is_finite());
        }
        if let Some(tokens) = data.tokens {
            let rate = tokens as f64 / (duration_ms / MS_PER_MINUTE);
            data.tokens_per_minute = rate.is_finite().then(|| rate as u64);
        }
    }

    let added = count(cost.total_lines_added).unwrap_or(0);
    let removed = count(cost.total_lines_removed).unwrap_or(0);
    if added > 0 || removed > 0 {
        data.lines_changed = Some(added + removed);
    }
}

fn extract_output_style(session: &SessionSnapshot, data: &mut StatusData) {
    data.output_style = session
        .output_style
        .as_ref()
        .and_then(|style| style.name.clone())
        .filter(|name| !name.is_empty());
}

/// Non-negative finite JSON number as a whole count.
fn count(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u64)
}
