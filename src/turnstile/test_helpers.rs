use mockito::{mock, Mock};
use serde_json::json;

pub fn mock_siteverify_success() -> Mock {
    mock("POST", "/turnstile/v0/siteverify")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "error-codes": [],
                "challenge_ts": "2026-10-16T12:00:00.000Z",
                "hostname": "localhost"
            })
            .to_string(),
        )
        .expect(1)
        .create()
}

pub fn mock_siteverify_failure(codes: &[&str]) -> Mock {
    mock("POST", "/turnstile/v0/siteverify")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "success": false, "error-codes": codes }).to_string())
        .expect(1)
        .create()
}

pub fn mock_siteverify_not_called() -> Mock {
    mock("POST", "/turnstile/v0/siteverify").expect(0).create()
}
