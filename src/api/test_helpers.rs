use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use mockito::{server_url, Mock};

use super::state::AppState;
use crate::config::Config;
use crate::db::test_helpers::setup_test_db;
use crate::supabase::test_helpers::mock_get_user;

pub const ACCESS_TOKEN: &str = "access-token";
pub const USER_ID: &str = "user-1";

/// Every integration configured and pointed at the mock server.
pub fn test_config() -> Config {
    let url = server_url();
    Config {
        bind_addr: String::from("127.0.0.1:0"),
        database_url: String::from("file:.tmp/test.db"),
        site_url: String::from("http://localhost:3000"),
        freemium_enabled: true,
        groq_api_key: Some(String::from("groq-key")),
        openai_api_key: Some(String::from("openai-key")),
        stripe_secret_key: Some(String::from("sk_test")),
        stripe_price_id: Some(String::from("price_test")),
        stripe_webhook_secret: Some(String::from("whsec_test")),
        supabase_url: Some(url.clone()),
        supabase_anon_key: Some(String::from("anon-key")),
        turnstile_secret_key: Some(String::from("turnstile-secret")),
        groq_base_url: url.clone(),
        openai_base_url: url.clone(),
        stripe_base_url: url.clone(),
        turnstile_base_url: url,
    }
}

pub fn test_state() -> AppState {
    test_state_with(test_config())
}

pub fn test_state_with(config: Config) -> AppState {
    AppState::new(setup_test_db(), config)
}

pub fn auth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", ACCESS_TOKEN)).unwrap(),
    );
    headers
}

pub fn mock_auth() -> Mock {
    mock_get_user(ACCESS_TOKEN, USER_ID)
}
