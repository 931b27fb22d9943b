use mockito::{mock, Matcher, Mock};
use serde_json::json;

use super::signature::compute_signature;

pub fn mock_checkout_session(user_id: &str, url: &str) -> Mock {
    mock("POST", "/v1/checkout/sessions")
        .match_body(Matcher::UrlEncoded(
            String::from("metadata[userId]"),
            String::from(user_id),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": "cs_test_1", "object": "checkout.session", "url": url}).to_string())
        .expect(1)
        .create()
}

pub fn mock_checkout_session_not_called() -> Mock {
    mock("POST", "/v1/checkout/sessions").expect(0).create()
}

/// A `Stripe-Signature` header value for `payload`.
pub fn signature_header(secret: &str, timestamp: i64, payload: &str) -> String {
    let signature = compute_signature(secret, timestamp, payload).unwrap();
    format!("t={},v1={}", timestamp, signature)
}

pub fn checkout_completed_event(user_id: Option<&str>) -> String {
    let metadata = match user_id {
        Some(user_id) => json!({ "userId": user_id }),
        None => json!({}),
    };
    json!({
        "id": "evt_test_1",
        "object": "event",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "object": "checkout.session",
                "metadata": metadata,
                "customer": "cus_test_1",
                "subscription": {"id": "sub_test_1", "object": "subscription"}
            }
        }
    })
    .to_string()
}
