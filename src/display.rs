use crate::config::{
    Config, DisplayMode, PROGRESS_EMPTY_COLOR_KEY, PROGRESS_FILLED_COLOR_KEY, SEPARATOR_COLOR_KEY,
};
use crate::extract::StatusData;
use crate::fields::{FieldDef, Line, Strategy};
use crate::themes::Painter;
use crate::utils::{format_duration, format_metric};

/// Gap between fields on the same line.
pub const FIELD_SEPARATOR: &str = "  ";

const BAR_FILLED: char = '=';
const BAR_EMPTY: char = '-';

/// Everything the formatter needs besides data and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub verbose: bool,
    pub colors: bool,
}

impl RenderContext {
    /// Mode from the config; colors only when both the config and the
    /// environment allow them.
    pub fn from_config(config: &Config, no_color_env: bool) -> Self {
        Self {
            verbose: config.display_mode == DisplayMode::Verbose,
            colors: config.enable_colors && !no_color_env,
        }
    }
}

/// Renders the visible fields into up to three lines (identity, status,
/// metrics), each ordered by `field_order`. Empty lines are dropped.
pub fn format_statusline(data: &StatusData, config: &Config, ctx: &RenderContext) -> String {
    let painter = Painter::new(ctx.colors);
    let separator = painter.paint(FIELD_SEPARATOR, config.color(SEPARATOR_COLOR_KEY));

    let mut lines: [Vec<String>; 3] = Default::default();
    for field in &config.field_order {
        if !config.is_visible(*field) {
            continue;
        }
        let def = field.def();
        if let Some(rendered) = render_field(&def, data, config, &painter, ctx.verbose) {
            lines[def.line(ctx.verbose).index()].push(rendered);
        }
    }

    Line::ALL
        .iter()
        .map(|line| &lines[line.index()])
        .filter(|fields| !fields.is_empty())
        .map(|fields| fields.join(&separator))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One field as `[icon ][label ]value`, or `None` when it has no value.
pub fn render_field(
    def: &FieldDef,
    data: &StatusData,
    config: &Config,
    painter: &Painter,
    verbose: bool,
) -> Option<String> {
    let color = config.color(def.kind.name());

    let value = match def.strategy {
        Strategy::Simple => painter.paint(data.text(def.kind)?, color),
        Strategy::Progress { bar } => {
            let percent = data.percent(def.kind)?;
            let mut text = painter.paint(&format!("{}%", percent), color);
            if bar && config.show_progress_bars {
                text.push(' ');
                text.push_str(&progress_bar(percent, config.progress_bar_width, config, painter));
            }
            text
        }
        Strategy::Metric(unit) => {
            let (value, rate) = data.metric(def.kind)?;
            painter.paint(&format_metric(unit, value, rate), color)
        }
        Strategy::Duration => painter.paint(&format_duration(data.millis(def.kind)?), color),
    };

    let mut out = String::new();
    let icon = config.icon(def.icon_key);
    if !icon.is_empty() {
        out.push_str(icon);
        out.push(' ');
    }
    if verbose {
        out.push_str(&painter.paint(def.label, config.color(SEPARATOR_COLOR_KEY)));
        out.push(' ');
    }
    out.push_str(&value);
    Some(out)
}

/// `(filled, empty)` segment counts; they always sum to `width`.
pub fn bar_segments(percent: u8, width: u8) -> (usize, usize) {
    let width = width as usize;
    let percent = percent.min(100) as f64;
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    (filled, width - filled)
}

/// `[======----]` with separately colored filled and empty runs.
pub fn progress_bar(percent: u8, width: u8, config: &Config, painter: &Painter) -> String {
    let (filled, empty) = bar_segments(percent, width);
    let bracket = config.color(SEPARATOR_COLOR_KEY);

    let mut bar = painter.paint("[", bracket);
    bar.push_str(&painter.paint(
        &BAR_FILLED.to_string().repeat(filled),
        config.color(PROGRESS_FILLED_COLOR_KEY),
    ));
    bar.push_str(&painter.paint(
        &BAR_EMPTY.to_string().repeat(empty),
        config.color(PROGRESS_EMPTY_COLOR_KEY),
    ));
    bar.push_str(&painter.paint("]", bracket));
    bar
}
