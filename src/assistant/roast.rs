use chrono::{DateTime, Utc};

use super::format::locale_datetime;
use crate::llm::types::ChatRequest;
use crate::llm::TEXT_MODEL;
use crate::models::Assignment;
use crate::tracker::panic::panic_score_at;

pub fn roast_prompt(assignments: &[Assignment], now: &DateTime<Utc>) -> String {
    if assignments.is_empty() {
        return r#"The student has no assignments.

Rules:
- 2-3 sentences total.
- Roast them for having nothing to do, dry and funny but not mean-spirited.
- No profanity or insults."#
            .to_string();
    }

    let list = assignments
        .iter()
        .enumerate()
        .map(|(index, a)| {
            format!(
                "{}. {} ({}) — due {}, est {}h, priority {}, panic {}/100",
                index + 1,
                a.title,
                a.course,
                locale_datetime(&a.deadline),
                a.estimated_hours,
                a.priority,
                panic_score_at(&a.deadline, a.estimated_hours, a.priority, now)
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"You are roasting a student's current workload in 2-3 sentences.

Assignments:
{}

Rules:
- Brutally honest, dry, funny, but not mean-spirited.
- 2-3 sentences total.
- No profanity or insults.
- Focus on workload situation."#,
        list
    )
}

pub fn roast_request(prompt: String) -> ChatRequest<'static> {
    ChatRequest::prompt(TEXT_MODEL, prompt).temperature(0.7)
}
