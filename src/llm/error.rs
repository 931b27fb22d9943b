use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use reqwest::Error as ReqwestError;
use serde_json::error::Error as SerdeError;

#[derive(Debug)]
pub enum LlmError {
    NetworkError(ReqwestError),
    MalformedResponse(SerdeError),
    Unsuccessful(String),
    EmptyResponse,
}

impl From<ReqwestError> for LlmError {
    fn from(error: ReqwestError) -> Self {
        LlmError::NetworkError(error)
    }
}

impl From<SerdeError> for LlmError {
    fn from(error: SerdeError) -> Self {
        LlmError::MalformedResponse(error)
    }
}

impl From<String> for LlmError {
    fn from(error: String) -> Self {
        LlmError::Unsuccessful(error)
    }
}

impl Error for LlmError {}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::NetworkError(err) => err.fmt(f),
            LlmError::MalformedResponse(err) => err.fmt(f),
            LlmError::Unsuccessful(body) if body.trim().is_empty() => {
                write!(f, "Groq request failed.")
            }
            LlmError::Unsuccessful(body) => body.fmt(f),
            LlmError::EmptyResponse => write!(f, "Empty response from Groq."),
        }
    }
}
