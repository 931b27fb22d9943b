use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::Error as DatabaseError;
use log::error;
use serde_json::{json, Value};

use crate::assistant::syllabus::SyllabusError;
use crate::llm::error::LlmError;
use crate::stripe::error::StripeError;
use crate::supabase::error::SupabaseError;
use crate::turnstile::error::TurnstileError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    LimitReached(String),
    NotFound(String),
    Unprocessable(String),
    TooManyRequests(String),
    Misconfigured(String),
    CaptchaFailed { message: String, codes: Vec<String> },
    Upstream(String),
    DatabaseError(DatabaseError),
    LlmError(LlmError),
    StripeError(StripeError),
    SupabaseError(SupabaseError),
    TurnstileError(TurnstileError),
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        ApiError::BadRequest(message.to_string())
    }

    pub fn not_found() -> Self {
        ApiError::NotFound(String::from("Assignment not found."))
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(String::from("Unauthorized"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::CaptchaFailed { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::LimitReached(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Misconfigured(_)
            | ApiError::DatabaseError(_)
            | ApiError::TurnstileError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) | ApiError::LlmError(_) | ApiError::StripeError(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::SupabaseError(SupabaseError::Unsuccessful(_)) => StatusCode::UNAUTHORIZED,
            ApiError::SupabaseError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn body(&self) -> Value {
        let mut body = json!({ "error": self.to_string() });
        match self {
            ApiError::LimitReached(_) | ApiError::TooManyRequests(_) => {
                body["limit_reached"] = json!(true);
            }
            ApiError::CaptchaFailed { codes, .. } => {
                body["codes"] = json!(codes);
            }
            _ => {}
        }
        body
    }
}

impl From<DatabaseError> for ApiError {
    fn from(error: DatabaseError) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<LlmError> for ApiError {
    fn from(error: LlmError) -> Self {
        ApiError::LlmError(error)
    }
}

impl From<StripeError> for ApiError {
    fn from(error: StripeError) -> Self {
        ApiError::StripeError(error)
    }
}

impl From<SupabaseError> for ApiError {
    fn from(error: SupabaseError) -> Self {
        ApiError::SupabaseError(error)
    }
}

impl From<TurnstileError> for ApiError {
    fn from(error: TurnstileError) -> Self {
        ApiError::TurnstileError(error)
    }
}

impl From<SyllabusError> for ApiError {
    fn from(error: SyllabusError) -> Self {
        ApiError::Upstream(error.to_string())
    }
}

impl Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::LimitReached(message)
            | ApiError::NotFound(message)
            | ApiError::Unprocessable(message)
            | ApiError::TooManyRequests(message)
            | ApiError::Misconfigured(message)
            | ApiError::CaptchaFailed { message, .. }
            | ApiError::Upstream(message) => message.fmt(f),
            ApiError::DatabaseError(err) => err.fmt(f),
            ApiError::LlmError(err) => err.fmt(f),
            ApiError::StripeError(err) => err.fmt(f),
            ApiError::SupabaseError(err) => err.message().fmt(f),
            ApiError::TurnstileError(_) => write!(f, "Unable to verify captcha."),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::TurnstileError(err) => error!("captcha verification failed: {}", err),
            _ if status.is_server_error() => error!("request failed: {}", self),
            _ => {}
        }
        (status, Json(self.body())).into_response()
    }
}
