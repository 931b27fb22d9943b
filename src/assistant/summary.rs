use chrono::{DateTime, Utc};

use super::format::locale_datetime;
use crate::llm::types::ChatRequest;
use crate::llm::TEXT_MODEL;
use crate::models::Assignment;
use crate::tracker::panic::panic_score_at;

pub fn weekly_summary_prompt(assignments: &[Assignment], now: &DateTime<Utc>) -> String {
    let list = assignments
        .iter()
        .enumerate()
        .map(|(index, a)| {
            format!(
                "{}. {} ({}) — due {}, est {}h, panic {}/100",
                index + 1,
                a.title,
                a.course,
                locale_datetime(&a.deadline),
                a.estimated_hours,
                panic_score_at(&a.deadline, a.estimated_hours, a.priority, now)
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"You are summarizing a student's week in plain English for a dashboard widget.

Active assignments:
{}

Write exactly 2 to 3 sentences total:
- Mention the biggest threats/workload risks.
- Mention what is coming up soon.
- End with one dry humorous closing line.

Style constraints:
- Plain English, concise, practical.
- Not overly dramatic or alarmist.
- No bullets, no markdown, no labels."#,
        list
    )
}

pub fn weekly_summary_request(prompt: String) -> ChatRequest<'static> {
    ChatRequest::prompt(TEXT_MODEL, prompt).temperature(0.5)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::models::Priority;

    #[test]
    fn lists_assignments() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let make = |title: &str, hours: i64, estimate: f64| Assignment {
            id: 1,
            user_id: "user-1".to_string(),
            title: title.to_string(),
            course: "MATH 2".to_string(),
            deadline: now + Duration::hours(hours),
            estimated_hours: estimate,
            priority: Priority::Medium,
            completed: false,
        };

        let prompt = weekly_summary_prompt(&[make("Quiz", 4, 1.0), make("Project", 100, 2.5)], &now);
        assert!(prompt.contains("1. Quiz (MATH 2) — due 10/16/2026, 4:00:00 PM, est 1h, panic 25/100"));
        assert!(prompt.contains("2. Project (MATH 2) — due 10/20/2026, 4:00:00 PM, est 2.5h, panic 3/100"));
        assert!(prompt.contains("No bullets, no markdown, no labels."));
    }

    #[test]
    fn request_settings() {
        let request = weekly_summary_request("prompt".to_string());
        assert_eq!(request.temperature, Some(0.5));
    }
}
