use thiserror::Error;

/// Errors surfaced by the statusline library.
///
/// Probe failures never appear here: a probe that cannot answer simply
/// yields no value for its field.
#[derive(Debug, Error)]
pub enum StatuslineError {
    #[error("failed to parse JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid session input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("field '{0}' not found in registry")]
    UnknownField(String),

    #[error("unknown icon key '{0}'")]
    UnknownIconKey(String),

    #[error("invalid color '{0}', expected one of: cyan, green, blue, magenta, yellow, red, white")]
    InvalidColor(String),

    #[error("invalid progress bar width {0}, must be between 5 and 50")]
    InvalidWidth(i64),

    #[error("invalid display mode '{0}', expected compact or verbose")]
    InvalidDisplayMode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatuslineError>;
