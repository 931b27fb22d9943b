use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use super::format::strip_code_fences;
use crate::llm::types::{ChatRequest, ContentPart, ImageUrl, MessageContent};
use crate::llm::{TEXT_MODEL, VISION_MODEL};
use crate::models::{parse_deadline, AssignmentDraft, Priority};

pub const SYLLABUS_PROMPT: &str = "Extract all assignments, deadlines, and due dates from this document. Return a JSON array only, no other text. Each item should have: title (string), course (string, use the course name from the document or leave blank if unknown), deadline (ISO 8601 datetime string, if no time is found use 23:59 on that date), estimated_hours (number, default to 2 if not mentioned). Return only valid JSON, nothing else.";

pub const DEFAULT_ESTIMATED_HOURS: f64 = 2.0;

#[derive(Debug)]
pub enum SyllabusError {
    InvalidJson(serde_json::Error),
    NotAnArray,
}

impl From<serde_json::Error> for SyllabusError {
    fn from(error: serde_json::Error) -> Self {
        SyllabusError::InvalidJson(error)
    }
}

impl Error for SyllabusError {}

impl fmt::Display for SyllabusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SyllabusError::InvalidJson(err) => err.fmt(f),
            SyllabusError::NotAnArray => write!(f, "Groq response was not an array."),
        }
    }
}

pub fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// Images are sent inline as a data URL, anything else is read as text.
pub fn syllabus_request(content_type: &str, bytes: &[u8]) -> ChatRequest<'static> {
    let request = if is_image(content_type) {
        let url = format!("data:{};base64,{}", content_type, STANDARD.encode(bytes));
        ChatRequest::new(
            VISION_MODEL,
            MessageContent::Parts(vec![
                ContentPart::Text {
                    text: SYLLABUS_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url },
                },
            ]),
        )
    } else {
        let text = String::from_utf8_lossy(bytes);
        ChatRequest::prompt(
            TEXT_MODEL,
            format!("{}\n\nDocument content:\n{}", SYLLABUS_PROMPT, text),
        )
    };
    request.temperature(0.2)
}

/// Parses the extracted items, dropping the ones without a title or a
/// usable deadline.
pub fn parse_syllabus(content: &str) -> Result<Vec<AssignmentDraft>, SyllabusError> {
    match serde_json::from_str::<Value>(&strip_code_fences(content))? {
        Value::Array(items) => Ok(items.iter().filter_map(normalize_item).collect()),
        _ => Err(SyllabusError::NotAnArray),
    }
}

fn normalize_item(item: &Value) -> Option<AssignmentDraft> {
    if !item.is_object() {
        return None;
    }

    let title = field_text(&item["title"]);
    let title = title.trim();
    if title.is_empty() {
        return None;
    }

    let deadline = parse_deadline(&field_text(&item["deadline"]))?;

    Some(AssignmentDraft {
        title: title.to_string(),
        course: field_text(&item["course"]).trim().to_string(),
        deadline,
        estimated_hours: estimated_hours(&item["estimated_hours"]),
        priority: Priority::Medium,
    })
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn estimated_hours(value: &Value) -> f64 {
    let hours = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match hours {
        Some(hours) if hours.is_finite() && hours > 0.0 => hours,
        _ => DEFAULT_ESTIMATED_HOURS,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn text_request() {
        let request = syllabus_request("text/plain", b"Essay due 2026-10-20");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["temperature"], json!(0.2));
        let content = value["messages"][0]["content"].as_str().unwrap();
        assert!(content.starts_with(SYLLABUS_PROMPT));
        assert!(content.ends_with("Document content:\nEssay due 2026-10-20"));
    }

    #[test]
    fn image_request() {
        let request = syllabus_request("image/png", &[1, 2, 3]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "meta-llama/llama-4-scout-17b-16e-instruct");
        let parts = &value["messages"][0]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,AQID");
    }

    #[test]
    fn parse_items() {
        let content = r#"```json
[
  {"title": " Essay 1 ", "course": "ENG 101", "deadline": "2026-10-20T17:00:00Z", "estimated_hours": 4},
  {"title": "Reading", "deadline": "2026-10-21", "estimated_hours": "1.5"},
  {"title": "Quiz", "deadline": "2026-10-22T09:00:00", "estimated_hours": "soon"},
  {"title": "Lab", "deadline": "2026-10-23", "estimated_hours": -3},
  {"title": "", "deadline": "2026-10-24"},
  {"title": "No date"},
  {"title": "Bad date", "deadline": "next week"},
  "not an object"
]
```"#;

        let drafts = parse_syllabus(content).unwrap();
        assert_eq!(drafts.len(), 4);

        assert_eq!(drafts[0].title, "Essay 1");
        assert_eq!(drafts[0].course, "ENG 101");
        assert_eq!(drafts[0].deadline, Utc.with_ymd_and_hms(2026, 10, 20, 17, 0, 0).unwrap());
        assert_eq!(drafts[0].estimated_hours, 4.0);
        assert_eq!(drafts[0].priority, Priority::Medium);

        assert_eq!(drafts[1].course, "");
        assert_eq!(drafts[1].deadline, Utc.with_ymd_and_hms(2026, 10, 21, 23, 59, 0).unwrap());
        assert_eq!(drafts[1].estimated_hours, 1.5);

        assert_eq!(drafts[2].deadline, Utc.with_ymd_and_hms(2026, 10, 22, 9, 0, 0).unwrap());
        assert_eq!(drafts[2].estimated_hours, 2.0);
        assert_eq!(drafts[3].estimated_hours, 2.0);
    }

    #[test]
    fn parse_errors() {
        let result = parse_syllabus(r#"{"title": "Essay"}"#).unwrap_err();
        assert_eq!(format!("{}", result), "Groq response was not an array.");

        let result = parse_syllabus("Here are your assignments!").unwrap_err();
        assert!(matches!(result, SyllabusError::InvalidJson(_)));
    }

    #[test]
    fn parse_empty() {
        assert!(parse_syllabus("[]").unwrap().is_empty());
    }
}
