use mockito::{mock, Matcher, Mock};
use serde_json::json;

pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn mock_completion(content: &str) -> Mock {
    mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(content))
        .expect(1)
        .create()
}

/// Only matches requests whose body contains every given fragment.
pub fn mock_completion_matching(fragments: &[&str], content: &str) -> Mock {
    let matchers = fragments
        .iter()
        .map(|fragment| Matcher::Regex(regex::escape(fragment)))
        .collect();
    mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(matchers))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(content))
        .expect(1)
        .create()
}

pub fn mock_completion_error(status: usize, body: &str) -> Mock {
    mock("POST", "/chat/completions")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create()
}

pub fn mock_completion_not_called() -> Mock {
    mock("POST", "/chat/completions").expect(0).create()
}
