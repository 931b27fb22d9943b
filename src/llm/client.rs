use reqwest::{Client, Response};
use serde_json::from_str;

use super::error::LlmError;
use super::types::{ChatRequest, ChatResponse};

/// Client for OpenAI compatible chat completion APIs.
pub struct ChatClient {
    api_key: String,
    domain: String,
}

impl ChatClient {
    pub fn new(api_key: String, domain: String) -> ChatClient {
        ChatClient { api_key, domain }
    }

    /// Returns the trimmed content of the first choice.
    pub async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.domain);
        let resp: Response = Client::new()
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if resp.status().is_success() {
            let resp: ChatResponse = from_str(&resp.text().await?)?;
            match resp.content().map(str::trim) {
                Some(content) if !content.is_empty() => Ok(content.to_string()),
                _ => Err(LlmError::EmptyResponse),
            }
        } else {
            Err(resp.text().await?.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::{mock, server_url, Matcher};
    use serde_json::json;

    use super::*;
    use crate::llm::test_helpers::{mock_completion, mock_completion_error};

    const API_KEY: &str = "key";

    #[tokio::test]
    async fn complete_success() {
        let _m = mock_completion("  Lock in.  ");
        let client = ChatClient::new(String::from(API_KEY), server_url());
        let request = ChatRequest::prompt("model", "prompt".to_string());

        let result = client.complete(&request).await.unwrap();
        assert_eq!(result, "Lock in.");
        _m.assert();
    }

    #[tokio::test]
    async fn complete_sends_request() {
        let _m = mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key")
            .match_body(Matcher::Json(json!({
                "model": "model",
                "messages": [{"role": "user", "content": "prompt"}],
                "temperature": 0.2
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create();

        let client = ChatClient::new(String::from(API_KEY), server_url());
        let request = ChatRequest::prompt("model", "prompt".to_string()).temperature(0.2);

        let result = client.complete(&request).await.unwrap();
        assert_eq!(result, "ok");
        _m.assert();
    }

    #[tokio::test]
    async fn complete_error() {
        let error = r#"{"error":{"message":"Invalid API Key"}}"#;
        let _m = mock_completion_error(401, error);
        let client = ChatClient::new(String::from(API_KEY), server_url());
        let request = ChatRequest::prompt("model", "prompt".to_string());

        let result = client.complete(&request).await.unwrap_err();
        let result = format!("{}", result);
        assert_eq!(result, error);
        _m.assert();
    }

    #[tokio::test]
    async fn complete_error_without_body() {
        let _m = mock_completion_error(500, "");
        let client = ChatClient::new(String::from(API_KEY), server_url());
        let request = ChatRequest::prompt("model", "prompt".to_string());

        let result = client.complete(&request).await.unwrap_err();
        assert_eq!(format!("{}", result), "Groq request failed.");
        _m.assert();
    }

    #[tokio::test]
    async fn complete_empty() {
        let _m = mock_completion("   ");
        let client = ChatClient::new(String::from(API_KEY), server_url());
        let request = ChatRequest::prompt("model", "prompt".to_string());

        let result = client.complete(&request).await.unwrap_err();
        assert!(matches!(result, LlmError::EmptyResponse));
        assert_eq!(format!("{}", result), "Empty response from Groq.");
        _m.assert();
    }
}
