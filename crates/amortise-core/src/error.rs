use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortiseError {
    #[error("Invalid frequency '{name}': {reason}")]
    InvalidFrequency { name: String, reason: String },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortiseError {
    fn from(e: serde_json::Error) -> Self {
        AmortiseError::SerializationError(e.to_string())
    }
}
