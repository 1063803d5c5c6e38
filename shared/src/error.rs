use thiserror::Error;
use validator::ValidationErrors;
use serde_json::Error as JsonError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum SharedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid participant id: {0}")]
    InvalidParticipantId(String),

    #[error("Invalid endpoint template: {0}")]
    InvalidEndpointTemplate(String),

    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    /// The server answered but reported that the removal did not happen.
    #[error("{0}")]
    Rejected(String),

    #[error("Request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl SharedError {
    /// Text suitable for showing to the admin in a blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            SharedError::Rejected(message) => message.clone(),
            SharedError::Status { message: Some(message), .. } => message.clone(),
            SharedError::Status { status, message: None } => {
                format!("Failed to remove participant (server returned {}).", status)
            }
            SharedError::MalformedResponse(_) => {
                "Failed to remove participant: the server sent an unexpected response.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ValidationErrors> for SharedError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<JsonError> for SharedError {
    fn from(error: JsonError) -> Self {
        Self::Conversion(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SharedError>;
