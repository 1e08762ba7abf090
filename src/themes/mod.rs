use crate::error::StatuslineError;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment signal that disables ANSI styling regardless of config.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

const RESET: &str = "\x1b[0m";

/// The fixed palette a config may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Cyan,
    Green,
    Blue,
    Magenta,
    Yellow,
    Red,
    White,
}

impl ColorName {
    pub const ALL: [ColorName; 7] = [
        ColorName::Cyan,
        ColorName::Green,
        ColorName::Blue,
        ColorName::Magenta,
        ColorName::Yellow,
        ColorName::Red,
        ColorName::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorName::Cyan => "cyan",
            ColorName::Green => "green",
            ColorName::Blue => "blue",
            ColorName::Magenta => "magenta",
            ColorName::Yellow => "yellow",
            ColorName::Red => "red",
            ColorName::White => "white",
        }
    }

    /// Palette entries map onto the bright ANSI foreground colors.
    fn terminal_color(self) -> Color {
        match self {
            ColorName::Cyan => Color::BrightCyan,
            ColorName::Green => Color::BrightGreen,
            ColorName::Blue => Color::BrightBlue,
            ColorName::Magenta => Color::BrightMagenta,
            ColorName::Yellow => Color::BrightYellow,
            ColorName::Red => Color::BrightRed,
            ColorName::White => Color::BrightWhite,
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorName {
    type Err = StatuslineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ColorName::ALL
            .iter()
            .copied()
            .find(|color| color.name() == wanted)
            .ok_or_else(|| StatuslineError::InvalidColor(s.to_string()))
    }
}

/// True when the `NO_COLOR` convention asks for plain output.
pub fn no_color_requested() -> bool {
    env::var_os(NO_COLOR_ENV).is_some()
}

/// Applies palette colors, or passes text through untouched when disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, color: ColorName) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        format!(
            "\x1b[{}m{}{}",
            color.terminal_color().to_fg_str(),
            text,
            RESET
        )
    }
}
