use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConversionError, FailureCategory, Result};

const MAX_INPUT_CHARS: usize = 64;

/// Description of a recovered failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub category: FailureCategory,
    /// Short rendering of the offending input.
    pub input: String,
    pub message: String,
}

/// Result of a safe conversion: always a usable value, plus a diagnostic
/// when that value is a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Outcome<T> {
    pub value: T,
    pub diagnostic: Option<Diagnostic>,
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    /// Settle a fallible computation.
    ///
    /// On error the `fallback` is returned and one `conversion_failed` event
    /// is emitted at warn level.
    pub fn recover(result: Result<T>, fallback: T, input: impl Into<String>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failed(err, fallback, input.into()),
        }
    }

    fn failed(err: ConversionError, fallback: T, input: String) -> Self {
        let category = err.category();
        let message = err.to_string();
        tracing::warn!(
            event = "conversion_failed",
            category = %category,
            input = %input,
            message = %message
        );
        Self {
            value: fallback,
            diagnostic: Some(Diagnostic {
                category,
                input,
                message,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.diagnostic.is_none()
    }

    pub fn category(&self) -> Option<FailureCategory> {
        self.diagnostic.as_ref().map(|diag| diag.category)
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            diagnostic: self.diagnostic,
        }
    }
}

/// Render a caller value for diagnostics, truncated to a readable length.
pub fn describe_input(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_INPUT_CHARS {
        return rendered;
    }
    let mut truncated: String = rendered.chars().take(MAX_INPUT_CHARS).collect();
    truncated.push_str("...");
    truncated
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
