use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use reqwest::Error as ReqwestError;
use serde_json::error::Error as SerdeError;

#[derive(Debug)]
pub enum TurnstileError {
    NetworkError(ReqwestError),
    MalformedResponse(SerdeError),
}

impl From<ReqwestError> for TurnstileError {
    fn from(error: ReqwestError) -> Self {
        TurnstileError::NetworkError(error)
    }
}

impl From<SerdeError> for TurnstileError {
    fn from(error: SerdeError) -> Self {
        TurnstileError::MalformedResponse(error)
    }
}

impl Error for TurnstileError {}

impl fmt::Display for TurnstileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TurnstileError::NetworkError(err) => err.fmt(f),
            TurnstileError::MalformedResponse(err) => err.fmt(f),
        }
    }
}
