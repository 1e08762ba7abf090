use crate::error::{Result, StatuslineError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

// Numbers are taken as f64 so integral and fractional JSON numbers both parse.
// A member of the wrong type reads as absent without spoiling its section.

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelInfo {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContextWindow {
    #[serde(default, deserialize_with = "lenient_number")]
    pub remaining_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_input_tokens: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_output_tokens: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkspaceInfo {
    pub current_dir: Option<String>,
    pub project_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CostInfo {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_cost_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_api_duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_lines_added: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_lines_removed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputStyle {
    pub name: Option<String>,
}

/// The session state Claude Code pipes to the statusline command.
///
/// Every section is optional and parsed on its own, so a malformed section
/// only costs the fields that come from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub cwd: Option<String>,
    pub model: Option<ModelInfo>,
    pub version: Option<String>,
    pub context_window: Option<ContextWindow>,
    pub workspace: Option<WorkspaceInfo>,
    pub cost: Option<CostInfo>,
    pub output_style: Option<OutputStyle>,
}

impl SessionSnapshot {
    /// Parses raw stdin. Fails only when the input is not a JSON object.
    pub fn parse(input: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(input)?;
        Self::from_value(&raw)
    }

    pub fn from_value(raw: &Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(StatuslineError::InvalidInput(format!(
                "expected a JSON object, got {}",
                json_kind(raw)
            )));
        }

        Ok(Self {
            session_id: section(raw, "session_id"),
            cwd: section(raw, "cwd"),
            model: section(raw, "model"),
            version: section(raw, "version"),
            context_window: section(raw, "context_window"),
            workspace: section(raw, "workspace"),
            cost: section(raw, "cost"),
            output_style: section(raw, "output_style"),
        })
    }

    /// Working directory, preferring the workspace block over top-level `cwd`.
    pub fn current_dir(&self) -> Option<&str> {
        self.workspace
            .as_ref()
            .and_then(|w| w.current_dir.as_deref())
            .or(self.cwd.as_deref())
            .filter(|dir| !dir.is_empty())
    }
}

fn section<T: DeserializeOwned>(raw: &Value, key: &str) -> Option<T> {
    let value = raw.get(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Ignoring malformed '{}' section: {}", key, e);
            None
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
