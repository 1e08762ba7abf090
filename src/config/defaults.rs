use crate::config::*;
use crate::fields::FieldKind;
use crate::themes::ColorName;
use std::collections::BTreeMap;

pub const MIN_PROGRESS_BAR_WIDTH: u8 = 5;
pub const MAX_PROGRESS_BAR_WIDTH: u8 = 50;
pub const DEFAULT_PROGRESS_BAR_WIDTH: u8 = 10;
pub const DEFAULT_SHOW_PROGRESS_BARS: bool = true;
pub const DEFAULT_ENABLE_COLORS: bool = true;

pub const DEFAULT_FIELD_ORDER: [FieldKind; 16] = [
    FieldKind::CurrentDir,
    FieldKind::GitBranch,
    FieldKind::Model,
    FieldKind::Version,
    FieldKind::OutputStyle,
    FieldKind::PythonVersion,
    FieldKind::Datetime,
    FieldKind::ContextRemaining,
    FieldKind::Duration,
    FieldKind::Tokens,
    FieldKind::Cost,
    FieldKind::LinesChanged,
    FieldKind::CpuUsage,
    FieldKind::MemoryUsage,
    FieldKind::Battery,
    FieldKind::PythonVenv,
];

const DEFAULT_ICONS: [(&str, &str); 16] = [
    ("directory", "📁"),
    ("git_branch", "🌿"),
    ("model", "🤖"),
    ("version", "📟"),
    ("context", "🧠"),
    ("cost", "💰"),
    ("tokens", "📊"),
    ("duration", "⌛"),
    ("style", "🎨"),
    ("lines_changed", "✏️"),
    ("cpu", "💻"),
    ("memory", "🧮"),
    ("battery", "🔋"),
    ("python", "🐍"),
    ("venv", "📦"),
    ("datetime", "🕐"),
];

pub fn default_visibility(field: FieldKind) -> bool {
    !matches!(
        field,
        FieldKind::Duration | FieldKind::LinesChanged | FieldKind::OutputStyle
    )
}

/// Default color for a field name or element key.
pub fn default_color(key: &str) -> Option<ColorName> {
    let color = match key {
        "current_dir" | "tokens" | "lines_changed" | "python_venv" => ColorName::Cyan,
        "git_branch" | "battery" | PROGRESS_FILLED_COLOR_KEY => ColorName::Green,
        "model" | "output_style" | "cpu_usage" => ColorName::Blue,
        "version" | "duration" | "memory_usage" => ColorName::Magenta,
        "context_remaining" | "python_version" => ColorName::Yellow,
        "cost" => ColorName::Red,
        "datetime" | PROGRESS_EMPTY_COLOR_KEY | SEPARATOR_COLOR_KEY => ColorName::White,
        _ => return None,
    };
    Some(color)
}

pub fn default_icons() -> BTreeMap<String, String> {
    DEFAULT_ICONS
        .iter()
        .map(|(key, icon)| (key.to_string(), icon.to_string()))
        .collect()
}

pub fn default_colors() -> BTreeMap<String, ColorName> {
    FieldKind::ALL
        .iter()
        .map(|field| field.name())
        .chain(ELEMENT_COLOR_KEYS)
        .filter_map(|key| default_color(key).map(|color| (key.to_string(), color)))
        .collect()
}

pub fn default_visible_fields() -> BTreeMap<FieldKind, bool> {
    FieldKind::ALL
        .iter()
        .map(|field| (*field, default_visibility(*field)))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Compact,
            visible_fields: default_visible_fields(),
            field_order: DEFAULT_FIELD_ORDER.to_vec(),
            icons: default_icons(),
            colors: default_colors(),
            show_progress_bars: DEFAULT_SHOW_PROGRESS_BARS,
            progress_bar_width: DEFAULT_PROGRESS_BAR_WIDTH,
            enable_colors: DEFAULT_ENABLE_COLORS,
        }
    }
}
