use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use reqwest::Error as ReqwestError;
use serde_json::error::Error as SerdeError;

#[derive(Debug)]
pub enum StripeError {
    NetworkError(ReqwestError),
    MalformedResponse(SerdeError),
    Unsuccessful(String),
}

impl From<ReqwestError> for StripeError {
    fn from(error: ReqwestError) -> Self {
        StripeError::NetworkError(error)
    }
}

impl From<SerdeError> for StripeError {
    fn from(error: SerdeError) -> Self {
        StripeError::MalformedResponse(error)
    }
}

impl From<String> for StripeError {
    fn from(error: String) -> Self {
        StripeError::Unsuccessful(error)
    }
}

impl Error for StripeError {}

impl fmt::Display for StripeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StripeError::NetworkError(err) => err.fmt(f),
            StripeError::MalformedResponse(err) => err.fmt(f),
            StripeError::Unsuccessful(err) => err.fmt(f),
        }
    }
}
