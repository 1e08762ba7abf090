pub mod defaults;
pub mod loader;
pub mod validate;

pub use defaults::*;
pub use loader::*;
pub use validate::*;

use crate::error::{Result, StatuslineError};
use crate::fields::{icon_keys, FieldKind};
use crate::themes::ColorName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Color key for the brackets, labels and the gap between fields.
pub const SEPARATOR_COLOR_KEY: &str = "separator";
pub const PROGRESS_FILLED_COLOR_KEY: &str = "progress_bar_filled";
pub const PROGRESS_EMPTY_COLOR_KEY: &str = "progress_bar_empty";

/// Color keys that do not name a field.
pub const ELEMENT_COLOR_KEYS: [&str; 3] = [
    PROGRESS_FILLED_COLOR_KEY,
    PROGRESS_EMPTY_COLOR_KEY,
    SEPARATOR_COLOR_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Compact,
    Verbose,
}

impl DisplayMode {
    pub fn is_verbose(self) -> bool {
        self == DisplayMode::Verbose
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Compact => f.write_str("compact"),
            DisplayMode::Verbose => f.write_str("verbose"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = StatuslineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compact" => Ok(DisplayMode::Compact),
            // "large" is what older config files called verbose
            "verbose" | "large" => Ok(DisplayMode::Verbose),
            other => Err(StatuslineError::InvalidDisplayMode(other.to_string())),
        }
    }
}

/// The persisted configuration, always in validated form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub display_mode: DisplayMode,
    pub visible_fields: BTreeMap<FieldKind, bool>,
    pub field_order: Vec<FieldKind>,
    pub icons: BTreeMap<String, String>,
    pub colors: BTreeMap<String, ColorName>,
    pub show_progress_bars: bool,
    pub progress_bar_width: u8,
    pub enable_colors: bool,
}

impl Config {
    pub fn is_visible(&self, field: FieldKind) -> bool {
        self.visible_fields
            .get(&field)
            .copied()
            .unwrap_or_else(|| default_visibility(field))
    }

    /// Icon for an icon key; empty when the user removed it.
    pub fn icon(&self, key: &str) -> &str {
        self.icons.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn color(&self, key: &str) -> ColorName {
        self.colors
            .get(key)
            .copied()
            .or_else(|| default_color(key))
            .unwrap_or(ColorName::White)
    }

    /// Flips visibility and returns the new state.
    pub fn toggle_field(&mut self, field: FieldKind) -> bool {
        let visible = !self.is_visible(field);
        self.visible_fields.insert(field, visible);
        visible
    }

    pub fn set_icon(&mut self, key: &str, icon: &str) -> Result<()> {
        if !icon_keys().contains(&key) {
            return Err(StatuslineError::UnknownIconKey(key.to_string()));
        }
        self.icons.insert(key.to_string(), icon.trim().to_string());
        Ok(())
    }

    pub fn set_color(&mut self, key: &str, color: &str) -> Result<()> {
        if !is_color_key(key) {
            return Err(StatuslineError::UnknownField(key.to_string()));
        }
        let color = color.parse::<ColorName>()?;
        self.colors.insert(key.to_string(), color);
        Ok(())
    }

    /// Moves a field within `field_order`; positions past the end clamp to it.
    ///
    /// Reordering never moves a field to a different display line.
    pub fn move_field(&mut self, field: FieldKind, position: usize) {
        self.field_order.retain(|f| *f != field);
        let position = position.min(self.field_order.len());
        self.field_order.insert(position, field);
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    pub fn set_progress_bar_width(&mut self, width: i64) -> Result<()> {
        match u8::try_from(width) {
            Ok(w) if (MIN_PROGRESS_BAR_WIDTH..=MAX_PROGRESS_BAR_WIDTH).contains(&w) => {
                self.progress_bar_width = w;
                Ok(())
            }
            _ => Err(StatuslineError::InvalidWidth(width)),
        }
    }
}

/// Field names plus the element keys (separator, bar segments).
pub fn is_color_key(key: &str) -> bool {
    ELEMENT_COLOR_KEYS.contains(&key) || key.parse::<FieldKind>().is_ok()
}
