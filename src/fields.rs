use crate::error::StatuslineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every field the statusline knows how to show.
///
/// Declaration order is the canonical order used when a stored
/// `field_order` is missing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Model,
    Version,
    ContextRemaining,
    Tokens,
    CurrentDir,
    GitBranch,
    Cost,
    Duration,
    LinesChanged,
    OutputStyle,
    CpuUsage,
    MemoryUsage,
    Battery,
    PythonVersion,
    PythonVenv,
    Datetime,
}

/// The three fixed display lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Identity,
    Status,
    Metrics,
}

impl Line {
    pub const ALL: [Line; 3] = [Line::Identity, Line::Status, Line::Metrics];

    pub fn index(self) -> usize {
        match self {
            Line::Identity => 0,
            Line::Status => 1,
            Line::Metrics => 2,
        }
    }
}

/// Where a field lands. Duration moves between lines with the display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Fixed(Line),
    ByMode { compact: Line, verbose: Line },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Cost,
    Tokens,
    Lines,
}

/// How a field turns its value into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Value shown as-is.
    Simple,
    /// Percentage, optionally followed by a bracketed bar.
    Progress { bar: bool },
    /// Primary value with an optional parenthesized rate.
    Metric(MetricUnit),
    /// Milliseconds rendered in the coarsest readable unit.
    Duration,
}

/// Static description of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub kind: FieldKind,
    pub icon_key: &'static str,
    pub label: &'static str,
    pub placement: Placement,
    pub strategy: Strategy,
}

impl FieldDef {
    pub fn line(&self, verbose: bool) -> Line {
        match self.placement {
            Placement::Fixed(line) => line,
            Placement::ByMode { compact, verbose: verbose_line } => {
                if verbose {
                    verbose_line
                } else {
                    compact
                }
            }
        }
    }
}

impl FieldKind {
    pub const ALL: [FieldKind; 16] = [
        FieldKind::Model,
        FieldKind::Version,
        FieldKind::ContextRemaining,
        FieldKind::Tokens,
        FieldKind::CurrentDir,
        FieldKind::GitBranch,
        FieldKind::Cost,
        FieldKind::Duration,
        FieldKind::LinesChanged,
        FieldKind::OutputStyle,
        FieldKind::CpuUsage,
        FieldKind::MemoryUsage,
        FieldKind::Battery,
        FieldKind::PythonVersion,
        FieldKind::PythonVenv,
        FieldKind::Datetime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Model => "model",
            FieldKind::Version => "version",
            FieldKind::ContextRemaining => "context_remaining",
            FieldKind::Tokens => "tokens",
            FieldKind::CurrentDir => "current_dir",
            FieldKind::GitBranch => "git_branch",
            FieldKind::Cost => "cost",
            FieldKind::Duration => "duration",
            FieldKind::LinesChanged => "lines_changed",
            FieldKind::OutputStyle => "output_style",
            FieldKind::CpuUsage => "cpu_usage",
            FieldKind::MemoryUsage => "memory_usage",
            FieldKind::Battery => "battery",
            FieldKind::PythonVersion => "python_version",
            FieldKind::PythonVenv => "python_venv",
            FieldKind::Datetime => "datetime",
        }
    }

    /// Registry lookup.
    pub fn def(self) -> FieldDef {
        use Line::*;
        use Strategy::*;

        let (icon_key, label, placement, strategy) = match self {
            FieldKind::CurrentDir => ("directory", "Directory:", Placement::Fixed(Identity), Simple),
            FieldKind::GitBranch => ("git_branch", "Git branch:", Placement::Fixed(Identity), Simple),
            FieldKind::Model => ("model", "Model:", Placement::Fixed(Identity), Simple),
            FieldKind::Version => ("version", "Version:", Placement::Fixed(Identity), Simple),
            FieldKind::OutputStyle => ("style", "Style:", Placement::Fixed(Identity), Simple),
            FieldKind::PythonVersion => ("python", "Python:", Placement::Fixed(Identity), Simple),
            FieldKind::Datetime => ("datetime", "Time:", Placement::Fixed(Identity), Simple),
            FieldKind::ContextRemaining => (
                "context",
                "Context remaining:",
                Placement::Fixed(Status),
                Progress { bar: true },
            ),
            FieldKind::Duration => (
                "duration",
                "Duration:",
                Placement::ByMode {
                    compact: Metrics,
                    verbose: Status,
                },
                Strategy::Duration,
            ),
            FieldKind::Cost => ("cost", "Cost:", Placement::Fixed(Metrics), Metric(MetricUnit::Cost)),
            FieldKind::Tokens => ("tokens", "Tokens:", Placement::Fixed(Metrics), Metric(MetricUnit::Tokens)),
            FieldKind::LinesChanged => (
                "lines_changed",
                "Lines changed:",
                Placement::Fixed(Metrics),
                Metric(MetricUnit::Lines),
            ),
            FieldKind::CpuUsage => ("cpu", "CPU:", Placement::Fixed(Metrics), Progress { bar: false }),
            FieldKind::MemoryUsage => ("memory", "Memory:", Placement::Fixed(Metrics), Progress { bar: false }),
            FieldKind::Battery => ("battery", "Battery:", Placement::Fixed(Metrics), Progress { bar: false }),
            FieldKind::PythonVenv => ("venv", "Virtualenv:", Placement::Fixed(Metrics), Simple),
        };

        FieldDef {
            kind: self,
            icon_key,
            label,
            placement,
            strategy,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = StatuslineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| StatuslineError::UnknownField(s.to_string()))
    }
}

/// All icon keys referenced by the registry, in canonical field order.
pub fn icon_keys() -> Vec<&'static str> {
    FieldKind::ALL.iter().map(|kind| kind.def().icon_key).collect()
}
