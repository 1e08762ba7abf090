use crate::utils::run_command;
use std::env;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

pub const PYTHON_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";

const PYTHON_BINARIES: [&str; 2] = ["python3", "python"];

/// Version of the Python interpreter on `PATH`, e.g. `3.11.5`.
pub async fn python_version() -> Option<String> {
    for binary in PYTHON_BINARIES {
        if let Some(output) = run_command(binary, &["--version"], None, PYTHON_COMMAND_TIMEOUT).await {
            if let Some(version) = parse_python_version(&output) {
                return Some(version);
            }
        }
    }
    None
}

/// `Python 3.11.5` -> `3.11.5`
pub fn parse_python_version(output: &str) -> Option<String> {
    let version = output.trim().strip_prefix("Python ")?.trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// Name of the active virtualenv, taken from `VIRTUAL_ENV`.
pub fn python_venv() -> Option<String> {
    venv_name(env::var_os(VIRTUAL_ENV).as_deref())
}

pub fn venv_name(value: Option<&OsStr>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    Path::new(value)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
