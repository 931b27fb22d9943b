use crate::llm::types::ChatRequest;
use crate::llm::VIBE_MODEL;

pub const FALLBACK_VIBE: &str = "No vibe available right now.";

pub fn vibe_prompt(title: &str, panic_score: u8, hours_left: f64) -> String {
    format!(
        r#"You are a slightly sarcastic but supportive student productivity coach.
Generate a 1-2 sentence motivational message for a student.
Assignment: "{}"
Panic score: {}/100
Hours left: {:.1}
Be funny, real, and student-friendly. No corporate speak. Return only the message."#,
        title,
        panic_score,
        hours_left.max(0.0)
    )
}

pub fn vibe_request(prompt: String) -> ChatRequest<'static> {
    ChatRequest::prompt(VIBE_MODEL, prompt).max_tokens(80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contents() {
        let prompt = vibe_prompt("Lab report", 87, 3.14159);
        assert!(prompt.contains("Assignment: \"Lab report\""));
        assert!(prompt.contains("Panic score: 87/100"));
        assert!(prompt.contains("Hours left: 3.1"));
    }

    #[test]
    fn overdue_hours_are_zero() {
        let prompt = vibe_prompt("Lab report", 100, -5.0);
        assert!(prompt.contains("Hours left: 0.0"));
    }

    #[test]
    fn request_settings() {
        let request = vibe_request("prompt".to_string());
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, Some(80));
        assert_eq!(request.temperature, None);
    }
}
