use mockito::{mock, Matcher, Mock};
use serde_json::json;

pub fn mock_get_user(access_token: &str, user_id: &str) -> Mock {
    mock("GET", "/auth/v1/user")
        .match_header("authorization", format!("Bearer {}", access_token).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": user_id, "aud": "authenticated", "email": "student@example.com"}).to_string())
        .create()
}

pub fn mock_get_user_unauthorized() -> Mock {
    mock("GET", "/auth/v1/user")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({"code": 401, "msg": "invalid JWT: unable to parse or verify signature"}).to_string())
        .create()
}

pub fn mock_sign_in(email: &str, user_id: &str) -> Mock {
    mock("POST", Matcher::Regex(String::from(r"^/auth/v1/token")))
        .match_query(Matcher::UrlEncoded(String::from("grant_type"), String::from("password")))
        .match_body(Matcher::PartialJson(json!({ "email": email })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "access-token",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-token",
                "user": {"id": user_id, "email": email}
            })
            .to_string(),
        )
        .expect(1)
        .create()
}

pub fn mock_sign_in_not_called() -> Mock {
    mock("POST", Matcher::Regex(String::from(r"^/auth/v1/token")))
        .expect(0)
        .create()
}

pub fn mock_sign_up(email: &str, user_id: &str) -> Mock {
    mock("POST", "/auth/v1/signup")
        .match_body(Matcher::PartialJson(json!({ "email": email })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": user_id, "email": email, "confirmation_sent_at": "2026-10-16T12:00:00Z"}).to_string())
        .expect(1)
        .create()
}
