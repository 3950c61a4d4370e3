use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rubric or vendor payload exactly as a caller handed it over.
///
/// Upstream producers (LLM rubric authors, the feature extractor) sometimes hand over parsed
/// JSON and sometimes the JSON text itself, so both forms are accepted everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawInput {
    Structured(Value),
    Text(String),
}

/// Reasons a raw input could not be turned into structured data.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input is empty")]
    Empty,
    #[error("input is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RawInput {
    pub fn is_blank(&self) -> bool {
        match self {
            RawInput::Structured(Value::Null) => true,
            RawInput::Structured(Value::String(text)) | RawInput::Text(text) => {
                text.trim().is_empty()
            }
            RawInput::Structured(_) => false,
        }
    }

    /// Resolve the input into a JSON value, parsing text forms along the way.
    pub fn into_value(self) -> Result<Value, InputError> {
        match self {
            RawInput::Structured(Value::Null) => Err(InputError::Empty),
            RawInput::Structured(Value::String(text)) | RawInput::Text(text) => parse_text(&text),
            RawInput::Structured(value) => Ok(value),
        }
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RawInput::Text(text),
            other => RawInput::Structured(other),
        }
    }
}

impl From<RawInput> for Value {
    fn from(input: RawInput) -> Self {
        match input {
            RawInput::Structured(value) => value,
            RawInput::Text(text) => Value::String(text),
        }
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_string())
    }
}

fn parse_text(text: &str) -> Result<Value, InputError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

/// Drop surrounding whitespace and a Markdown code fence, which LLM authors like to add.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim().trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // The opening fence line may carry a language tag such as `json`.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}
