use serde::de::DeserializeOwned;
use serde_json::Value;

/// Accumulates streamed model fragments and parses them once, at the end.
///
/// Partial JSON is never inspected; a fragment boundary can fall anywhere,
/// including inside a multi-byte character's escape or a string literal.
#[derive(Debug, Default)]
pub struct FragmentAggregator {
    buffer: String,
    fragments: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error("model returned no content")]
    Empty,
    #[error("model output is not valid JSON: {0}")]
    NotJson(String),
    #[error("model output is JSON but not an object: got {0}")]
    NotAnObject(&'static str),
    #[error("model output does not match the expected shape: {0}")]
    ShapeMismatch(String),
}

impl FragmentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.buffer.push_str(fragment);
        self.fragments += 1;
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Parses the full reply as JSON, then decodes the top-level object into `T`.
    pub fn finish<T: DeserializeOwned>(self) -> Result<T, AggregationError> {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            return Err(AggregationError::Empty);
        }

        let value: Value =
            serde_json::from_str(trimmed).map_err(|e| AggregationError::NotJson(e.to_string()))?;
        if !value.is_object() {
            return Err(AggregationError::NotAnObject(json_kind(&value)));
        }

        serde_json::from_value(value).map_err(|e| AggregationError::ShapeMismatch(e.to_string()))
    }
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
