use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use reqwest::Error as ReqwestError;
use serde_json::error::Error as SerdeError;
use serde_json::Value;

#[derive(Debug)]
pub enum SupabaseError {
    NetworkError(ReqwestError),
    MalformedResponse(SerdeError),
    Unsuccessful(String),
}

impl SupabaseError {
    /// The message GoTrue put in its error body, falling back to the raw body.
    pub fn message(&self) -> String {
        match self {
            SupabaseError::Unsuccessful(body) => error_message(body),
            other => other.to_string(),
        }
    }
}

fn error_message(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.to_string(),
    };
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value[*key].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

impl From<ReqwestError> for SupabaseError {
    fn from(error: ReqwestError) -> Self {
        SupabaseError::NetworkError(error)
    }
}

impl From<SerdeError> for SupabaseError {
    fn from(error: SerdeError) -> Self {
        SupabaseError::MalformedResponse(error)
    }
}

impl From<String> for SupabaseError {
    fn from(error: String) -> Self {
        SupabaseError::Unsuccessful(error)
    }
}

impl Error for SupabaseError {}

impl fmt::Display for SupabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SupabaseError::NetworkError(err) => err.fmt(f),
            SupabaseError::MalformedResponse(err) => err.fmt(f),
            SupabaseError::Unsuccessful(err) => err.fmt(f),
        }
    }
}
