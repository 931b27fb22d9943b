use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SiteVerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

fn has_any(codes: &[String], wanted: &[&str]) -> bool {
    codes.iter().any(|code| wanted.contains(&code.as_str()))
}

/// Human readable explanation of Turnstile error codes.
pub fn captcha_error_message(codes: &[String]) -> &'static str {
    if has_any(codes, &["timeout-or-duplicate"]) {
        "Captcha expired or was already used. Please complete it again and submit right away."
    } else if has_any(codes, &["invalid-input-response"]) {
        "Captcha response was invalid. Please retry the captcha."
    } else if has_any(codes, &["invalid-input-secret", "missing-input-secret"]) {
        "Captcha is misconfigured on the server. Update TURNSTILE_SECRET_KEY and try again."
    } else if has_any(codes, &["invalid-input-sitekey", "missing-input-response"]) {
        "Captcha configuration is invalid. Please retry in a moment."
    } else {
        "Captcha verification failed. Please try again."
    }
}

/// The explanation followed by the raw codes, when there are any.
pub fn captcha_failure_message(codes: &[String]) -> String {
    let message = captcha_error_message(codes);
    if codes.is_empty() {
        message.to_string()
    } else {
        format!("{} ({})", message, codes.join(", "))
    }
}
