use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::state::AppState;
use crate::supabase::error::SupabaseError;
use crate::supabase::types::{Session, SignUp, User};
use crate::turnstile::types::{captcha_failure_message, SiteVerifyResponse};

#[derive(Debug, Deserialize)]
pub struct VerifyCaptchaRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "captchaToken")]
    pub captcha_token: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// First address of `X-Forwarded-For`, if any.
fn forwarded_for(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}

/// Resolves the Supabase user behind the request's bearer token.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or_else(ApiError::unauthorized)?;
    let client = state.supabase()?;
    match client.get_user(token).await {
        Ok(user) => Ok(user),
        Err(SupabaseError::Unsuccessful(body)) => {
            warn!("rejected access token: {}", body);
            Err(ApiError::unauthorized())
        }
        Err(err) => {
            warn!("failed to authenticate request: {}", err);
            Err(err.into())
        }
    }
}

async fn verify_token(
    state: &AppState,
    headers: &HeaderMap,
    token: Option<&str>,
) -> Result<SiteVerifyResponse, ApiError> {
    let client = state.turnstile()?;
    let token = token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::bad_request("Captcha token is missing."))?;

    Ok(client.verify(token, forwarded_for(headers)).await?)
}

/// Verifies the captcha, explaining the error codes when it fails.
async fn require_captcha(
    state: &AppState,
    headers: &HeaderMap,
    token: Option<&str>,
) -> Result<(), ApiError> {
    let verification = verify_token(state, headers, token).await?;
    if verification.success {
        return Ok(());
    }

    warn!("captcha rejected: {:?}", verification.error_codes);
    Err(ApiError::CaptchaFailed {
        message: captcha_failure_message(&verification.error_codes),
        codes: verification.error_codes,
    })
}

fn require_credentials(request: &CredentialsRequest) -> Result<(&str, &str), ApiError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required."));
    }
    Ok((email, &request.password))
}

pub async fn verify_captcha(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<VerifyCaptchaRequest>,
) -> Result<Json<Value>, ApiError> {
    let verification = verify_token(&state, &headers, request.token.as_deref()).await?;
    if !verification.success {
        return Err(ApiError::CaptchaFailed {
            message: String::from("Captcha verification failed."),
            codes: verification.error_codes,
        });
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<Session>, ApiError> {
    let (email, password) = require_credentials(&request)?;
    require_captcha(&state, &headers, request.captcha_token.as_deref()).await?;

    let session = state.supabase()?.sign_in_with_password(email, password).await?;
    info!("signed in user_id: {}", session.user.id);
    Ok(Json(session))
}

pub async fn sign_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<SignUp>, ApiError> {
    let (email, password) = require_credentials(&request)?;
    require_captcha(&state, &headers, request.captcha_token.as_deref()).await?;

    let sign_up = state.supabase()?.sign_up(email, password).await?;
    if let Some(user) = &sign_up.user {
        info!("signed up user_id: {}", user.id);
    }
    Ok(Json(sign_up))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, StatusCode};
    use mockito::{mock, Matcher};
    use serial_test::serial;

    use super::*;
    use crate::api::test_helpers::{auth_headers, mock_auth, test_config, test_state, test_state_with, USER_ID};
    use crate::supabase::test_helpers::{
        mock_get_user_unauthorized, mock_sign_in, mock_sign_in_not_called, mock_sign_up,
    };
    use crate::turnstile::test_helpers::{
        mock_siteverify_failure, mock_siteverify_not_called, mock_siteverify_success,
    };

    fn credentials(captcha_token: Option<&str>) -> CredentialsRequest {
        CredentialsRequest {
            email: String::from("student@example.com"),
            password: String::from("hunter22"),
            captcha_token: captcha_token.map(str::to_string),
        }
    }

    #[test]
    fn header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"));
        assert_eq!(forwarded_for(&headers), Some("203.0.113.7"));
    }

    #[tokio::test]
    #[serial]
    async fn authenticate_success() {
        let _m = mock_auth();
        let state = test_state();

        let user = authenticate(&state, &auth_headers()).await.unwrap();
        assert_eq!(user.id, USER_ID);
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn authenticate_rejects() {
        let state = test_state();
        let result = authenticate(&state, &HeaderMap::new()).await.unwrap_err();
        assert_eq!(result.status(), StatusCode::UNAUTHORIZED);

        let _m = mock_get_user_unauthorized();
        let result = authenticate(&state, &auth_headers()).await.unwrap_err();
        assert_eq!(result.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(result.to_string(), "Unauthorized");
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn authenticate_upstream_failure() {
        let mut config = test_config();
        config.supabase_url = Some(String::from("http://127.0.0.1:1"));
        let state = test_state_with(config);

        let result = authenticate(&state, &auth_headers()).await.unwrap_err();
        assert_eq!(result.status(), StatusCode::BAD_GATEWAY);

        let _m = mock("GET", "/auth/v1/user")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();
        let result = authenticate(&test_state(), &auth_headers()).await.unwrap_err();
        assert_eq!(result.status(), StatusCode::BAD_GATEWAY);
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn verify_captcha_success() {
        let _m = mock("POST", "/turnstile/v0/siteverify")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded(String::from("response"), String::from("token")),
                Matcher::UrlEncoded(String::from("remoteip"), String::from("203.0.113.7")),
            ]))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create();

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        let request = VerifyCaptchaRequest {
            token: Some(String::from(" token ")),
        };

        let Json(result) = verify_captcha(State(test_state()), headers, Json(request))
            .await
            .unwrap();
        assert_eq!(result, json!({"success": true}));
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn verify_captcha_failure() {
        let _m = mock_siteverify_failure(&["invalid-input-response"]);
        let request = VerifyCaptchaRequest {
            token: Some(String::from("token")),
        };

        let result = verify_captcha(State(test_state()), HeaderMap::new(), Json(request))
            .await
            .unwrap_err();
        assert_eq!(result.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            result.body(),
            json!({"error": "Captcha verification failed.", "codes": ["invalid-input-response"]})
        );
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn verify_captcha_missing_token() {
        let _m = mock_siteverify_not_called();
        let request = VerifyCaptchaRequest {
            token: Some(String::from("   ")),
        };

        let result = verify_captcha(State(test_state()), HeaderMap::new(), Json(request))
            .await
            .unwrap_err();
        assert_eq!(result.status(), StatusCode::BAD_REQUEST);
        assert_eq!(result.to_string(), "Captcha token is missing.");
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn verify_captcha_not_configured() {
        let mut config = test_config();
        config.turnstile_secret_key = Some(String::from("  "));
        let request = VerifyCaptchaRequest {
            token: Some(String::from("token")),
        };

        let result = verify_captcha(State(test_state_with(config)), HeaderMap::new(), Json(request))
            .await
            .unwrap_err();
        assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(result.to_string(), "Captcha is not configured.");
    }

    #[tokio::test]
    #[serial]
    async fn verify_captcha_unreachable() {
        let _m = mock("POST", "/turnstile/v0/siteverify")
            .with_status(503)
            .with_body("Service Unavailable")
            .create();
        let request = VerifyCaptchaRequest {
            token: Some(String::from("token")),
        };

        let result = verify_captcha(State(test_state()), HeaderMap::new(), Json(request))
            .await
            .unwrap_err();
        assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(result.to_string(), "Unable to verify captcha.");
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn sign_in_success() {
        let _captcha = mock_siteverify_success();
        let _m = mock_sign_in("student@example.com", USER_ID);

        let Json(session) = sign_in(State(test_state()), HeaderMap::new(), Json(credentials(Some("token"))))
            .await
            .unwrap();
        assert_eq!(session.user.id, USER_ID);
        _captcha.assert();
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn sign_in_captcha_rejected() {
        let _captcha = mock_siteverify_failure(&["timeout-or-duplicate"]);
        let _m = mock_sign_in_not_called();

        let result = sign_in(State(test_state()), HeaderMap::new(), Json(credentials(Some("token"))))
            .await
            .unwrap_err();
        assert_eq!(result.status(), StatusCode::BAD_REQUEST);
        assert!(result.to_string().starts_with("Captcha expired or was already used."));
        assert!(result.to_string().ends_with("(timeout-or-duplicate)"));
        _captcha.assert();
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn sign_in_requires_credentials() {
        let _captcha = mock_siteverify_not_called();
        let mut request = credentials(Some("token"));
        request.password = String::new();

        let result = sign_in(State(test_state()), HeaderMap::new(), Json(request))
            .await
            .unwrap_err();
        assert_eq!(result.to_string(), "Email and password are required.");
        _captcha.assert();
    }

    #[tokio::test]
    #[serial]
    async fn sign_in_rejected_by_supabase() {
        let _captcha = mock_siteverify_success();
        let _m = mock("POST", Matcher::Regex(String::from(r"^/auth/v1/token")))
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
            .create();

        let result = sign_in(State(test_state()), HeaderMap::new(), Json(credentials(Some("token"))))
            .await
            .unwrap_err();
        assert_eq!(result.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(result.to_string(), "Invalid login credentials");
        _m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn sign_up_success() {
        let _captcha = mock_siteverify_success();
        let _m = mock_sign_up("student@example.com", "user-9");

        let Json(result) = sign_up(State(test_state()), HeaderMap::new(), Json(credentials(Some("token"))))
            .await
            .unwrap();
        assert_eq!(result.user.unwrap().id, "user-9");
        _m.assert();
    }
}
