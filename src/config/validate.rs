use crate::config::*;
use crate::fields::FieldKind;
use crate::themes::ColorName;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

pub const KEY_DISPLAY_MODE: &str = "display_mode";
pub const KEY_VISIBLE_FIELDS: &str = "visible_fields";
pub const KEY_FIELD_ORDER: &str = "field_order";
pub const KEY_ICONS: &str = "icons";
pub const KEY_COLORS: &str = "colors";
pub const KEY_SHOW_PROGRESS_BARS: &str = "show_progress_bars";
pub const KEY_PROGRESS_BAR_WIDTH: &str = "progress_bar_width";
pub const KEY_ENABLE_COLORS: &str = "enable_colors";

/// Turns an arbitrary JSON value into a complete, valid [`Config`].
///
/// Never fails. Invalid entries fall back to their defaults, unknown field
/// names are dropped (extra icon keys are kept since nothing reads them), and fields missing from an older file are filled in so
/// upgrades never lose newly introduced fields. Problems are logged as
/// warnings.
pub fn validate(raw: &Value) -> Config {
    let (config, warnings) = validate_with_warnings(raw);
    if !warnings.is_empty() {
        warn!("Configuration validation warnings:");
        for warning in &warnings {
            warn!("  - {}", warning);
        }
    }
    config
}

/// Same as [`validate`] but hands the warnings back instead of logging them.
pub fn validate_with_warnings(raw: &Value) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();

    let Some(obj) = raw.as_object() else {
        warnings.push("configuration is not a JSON object, using defaults".to_string());
        return (Config::default(), warnings);
    };

    let config = Config {
        display_mode: display_mode(obj.get(KEY_DISPLAY_MODE), &mut warnings),
        visible_fields: visible_fields(obj.get(KEY_VISIBLE_FIELDS), &mut warnings),
        field_order: field_order(obj.get(KEY_FIELD_ORDER), &mut warnings),
        icons: icons(obj.get(KEY_ICONS), &mut warnings),
        colors: colors(obj.get(KEY_COLORS), &mut warnings),
        show_progress_bars: flag(obj, KEY_SHOW_PROGRESS_BARS, DEFAULT_SHOW_PROGRESS_BARS, &mut warnings),
        progress_bar_width: progress_bar_width(obj.get(KEY_PROGRESS_BAR_WIDTH), &mut warnings),
        enable_colors: flag(obj, KEY_ENABLE_COLORS, DEFAULT_ENABLE_COLORS, &mut warnings),
    };

    (config, warnings)
}

fn display_mode(value: Option<&Value>, warnings: &mut Vec<String>) -> DisplayMode {
    match value {
        None => DisplayMode::default(),
        Some(Value::String(s)) => s.parse().unwrap_or_else(|_| {
            warnings.push(format!(
                "Invalid display_mode '{}', using default '{}'",
                s,
                DisplayMode::default()
            ));
            DisplayMode::default()
        }),
        Some(other) => {
            warnings.push(format!(
                "Invalid display_mode {}, using default '{}'",
                other,
                DisplayMode::default()
            ));
            DisplayMode::default()
        }
    }
}

fn visible_fields(value: Option<&Value>, warnings: &mut Vec<String>) -> BTreeMap<FieldKind, bool> {
    let mut fields = default_visible_fields();

    let entries = match value {
        None => return fields,
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            warnings.push("visible_fields is not an object, using defaults".to_string());
            return fields;
        }
    };

    for (name, visible) in entries {
        let Ok(field) = name.parse::<FieldKind>() else {
            warnings.push(format!("Unknown field '{}' in visible_fields", name));
            continue;
        };
        match visible.as_bool() {
            Some(visible) => {
                fields.insert(field, visible);
            }
            None => warnings.push(format!(
                "Invalid visibility {} for field '{}', using default",
                visible, name
            )),
        }
    }

    fields
}

fn field_order(value: Option<&Value>, warnings: &mut Vec<String>) -> Vec<FieldKind> {
    let entries = match value {
        None => return DEFAULT_FIELD_ORDER.to_vec(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            warnings.push("field_order is not a list, using default order".to_string());
            return DEFAULT_FIELD_ORDER.to_vec();
        }
    };

    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(FieldKind::ALL.len());
    let mut invalid = Vec::new();

    for entry in entries {
        match entry.as_str().map(str::parse::<FieldKind>) {
            Some(Ok(field)) => {
                if seen.insert(field) {
                    order.push(field);
                }
            }
            _ => invalid.push(entry.to_string()),
        }
    }

    if !invalid.is_empty() {
        warnings.push(format!(
            "Invalid field names in field_order: {}",
            invalid.join(", ")
        ));
    }

    for field in FieldKind::ALL {
        if seen.insert(field) {
            order.push(field);
        }
    }

    order
}

fn icons(value: Option<&Value>, warnings: &mut Vec<String>) -> BTreeMap<String, String> {
    let mut icons = default_icons();

    match value {
        None => {}
        Some(Value::Object(entries)) => {
            for (key, icon) in entries {
                match icon.as_str() {
                    Some(icon) => {
                        icons.insert(key.clone(), icon.to_string());
                    }
                    None => warnings.push(format!("Invalid icon {} for '{}', using default", icon, key)),
                }
            }
        }
        Some(_) => warnings.push("icons is not an object, using defaults".to_string()),
    }

    icons
}

fn colors(value: Option<&Value>, warnings: &mut Vec<String>) -> BTreeMap<String, ColorName> {
    let mut colors = default_colors();

    let entries = match value {
        None => return colors,
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            warnings.push("colors is not an object, using defaults".to_string());
            return colors;
        }
    };

    for (key, color) in entries {
        if !is_color_key(key) {
            warnings.push(format!("Unknown color key '{}' ignored", key));
            continue;
        }
        match color.as_str().map(str::parse::<ColorName>) {
            Some(Ok(color)) => {
                colors.insert(key.clone(), color);
            }
            _ => warnings.push(format!(
                "Invalid color {} for field '{}', using default",
                color, key
            )),
        }
    }

    colors
}

fn flag(obj: &Map<String, Value>, key: &str, default: bool, warnings: &mut Vec<String>) -> bool {
    match obj.get(key) {
        None => default,
        Some(Value::Bool(value)) => *value,
        Some(other) => {
            warnings.push(format!("Invalid {} {}, using default {}", key, other, default));
            default
        }
    }
}

fn progress_bar_width(value: Option<&Value>, warnings: &mut Vec<String>) -> u8 {
    let Some(value) = value else {
        return DEFAULT_PROGRESS_BAR_WIDTH;
    };

    let width = value
        .as_i64()
        .and_then(|w| u8::try_from(w).ok())
        .filter(|w| (MIN_PROGRESS_BAR_WIDTH..=MAX_PROGRESS_BAR_WIDTH).contains(w));

    width.unwrap_or_else(|| {
        warnings.push(format!(
            "Invalid progress_bar_width {}, must be between {} and {}. Using default {}",
            value, MIN_PROGRESS_BAR_WIDTH, MAX_PROGRESS_BAR_WIDTH, DEFAULT_PROGRESS_BAR_WIDTH
        ));
        DEFAULT_PROGRESS_BAR_WIDTH
    })
}
