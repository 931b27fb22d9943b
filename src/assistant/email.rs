use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use super::format::locale_datetime;
use crate::llm::types::ChatRequest;
use crate::llm::TEXT_MODEL;

pub const DEFAULT_SUBJECT: &str = "Extension request for assignment deadline";

static LEADING_FENCE: OnceLock<Regex> = OnceLock::new();
static TRAILING_FENCE: OnceLock<Regex> = OnceLock::new();
static SUBJECT: OnceLock<Regex> = OnceLock::new();
static BODY: OnceLock<Regex> = OnceLock::new();
static SUBJECT_PREFIX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

pub fn email_prompt(title: &str, course: &str, deadline: &DateTime<Utc>) -> String {
    format!(
        r#"Write a polite, professional (not overly formal) email from a college student to a professor asking for a short extension.

Assignment title: {}
Course: {}
Deadline: {}

Requirements:
- Keep it concise and respectful.
- Explain the request clearly without over-sharing.
- Include a specific, reasonable extension ask.
- Tone should be sincere and accountable.
- Do not sound robotic.

Return output in exactly this format:
Subject: <one line>
Body:
<email body with greeting, 1-3 short paragraphs, and sign-off>"#,
        title,
        course,
        locale_datetime(deadline)
    )
}

pub fn email_request(prompt: String) -> ChatRequest<'static> {
    ChatRequest::prompt(TEXT_MODEL, prompt).temperature(0.5)
}

/// Splits model output into subject and body.
///
/// Prefers explicit `Subject:` and `Body:` labels. Otherwise the first
/// non-blank line is the subject and the remaining lines are the body.
pub fn parse_email_draft(raw: &str) -> EmailDraft {
    let leading = LEADING_FENCE.get_or_init(|| Regex::new(r"(?s)^```.*?\n").unwrap());
    let trailing = TRAILING_FENCE.get_or_init(|| Regex::new(r"```$").unwrap());
    let subject_re = SUBJECT.get_or_init(|| Regex::new(r"(?i)Subject\s*:\s*(.+)").unwrap());
    let body_re = BODY.get_or_init(|| Regex::new(r"(?is)Body\s*:\s*(.+)").unwrap());
    let prefix = SUBJECT_PREFIX.get_or_init(|| Regex::new(r"(?i)^subject\s*:\s*").unwrap());

    let cleaned = leading.replace(raw.trim(), "");
    let cleaned = trailing.replace(&cleaned, "");
    let cleaned = cleaned.trim();

    let subject = subject_re.captures(cleaned).and_then(|c| c.get(1));
    let body = body_re.captures(cleaned).and_then(|c| c.get(1));
    if let (Some(subject), Some(body)) = (subject, body) {
        return EmailDraft {
            subject: subject.as_str().trim().to_string(),
            body: body.as_str().trim().to_string(),
        };
    }

    let lines: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let subject = lines
        .first()
        .map(|line| prefix.replace(line, "").to_string())
        .filter(|subject| !subject.is_empty())
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

    let body = lines.iter().skip(1).copied().collect::<Vec<&str>>().join("\n");
    let body = match body.trim() {
        "" => cleaned.to_string(),
        body => body.to_string(),
    };

    EmailDraft { subject, body }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn prompt_contents() {
        let deadline = Utc.with_ymd_and_hms(2026, 10, 20, 23, 59, 0).unwrap();
        let prompt = email_prompt("Lab 3", "CHEM 110", &deadline);
        assert!(prompt.contains("Assignment title: Lab 3"));
        assert!(prompt.contains("Course: CHEM 110"));
        assert!(prompt.contains("Deadline: 10/20/2026, 11:59:00 PM"));
    }

    #[test]
    fn labelled_output() {
        let raw = "Subject: Extension for Lab 3\nBody:\nDear Professor,\n\nCould I have two more days?\n\nThanks,\nSam";
        let draft = parse_email_draft(raw);
        assert_eq!(draft.subject, "Extension for Lab 3");
        assert_eq!(draft.body, "Dear Professor,\n\nCould I have two more days?\n\nThanks,\nSam");
    }

    #[test]
    fn fenced_output() {
        let raw = "```text\nsubject : Quick request\nbody: Hi there.\n```";
        let draft = parse_email_draft(raw);
        assert_eq!(draft.subject, "Quick request");
        assert_eq!(draft.body, "Hi there.");
    }

    #[test]
    fn unlabelled_output() {
        let raw = "Extension request\n\nDear Professor,\nI need more time.";
        let draft = parse_email_draft(raw);
        assert_eq!(draft.subject, "Extension request");
        assert_eq!(draft.body, "Dear Professor,\nI need more time.");
    }

    #[test]
    fn single_line_output() {
        let draft = parse_email_draft("Subject: Only a subject");
        assert_eq!(draft.subject, "Only a subject");
        assert_eq!(draft.body, "Subject: Only a subject");

        let draft = parse_email_draft("Subject:");
        assert_eq!(draft.subject, DEFAULT_SUBJECT);
        assert_eq!(draft.body, "Subject:");
    }

    #[test]
    fn request_settings() {
        let request = email_request("prompt".to_string());
        assert_eq!(request.temperature, Some(0.5));
    }
}
