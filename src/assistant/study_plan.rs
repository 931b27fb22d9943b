use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

use super::format::{locale_datetime, strip_code_fences};
use crate::llm::types::ChatRequest;
use crate::llm::TEXT_MODEL;
use crate::models::Assignment;

pub const PLAN_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningDay {
    pub label: String,
    pub iso_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDay {
    pub day: String,
    pub date: String,
    pub tasks: Vec<String>,
}

/// A structured plan, or the model's raw text when it could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StudyPlan {
    Days(Vec<PlanDay>),
    Raw(String),
}

/// Blank or unknown zone names fall back to UTC.
pub fn resolve_time_zone(value: Option<&str>) -> (String, Tz) {
    match value.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => (name.to_string(), tz),
            Err(_) => (String::from("UTC"), Tz::UTC),
        },
        None => (String::from("UTC"), Tz::UTC),
    }
}

/// First day of the plan. Unparseable input falls back to `now`.
pub fn resolve_start(today_iso: Option<&str>, now: &DateTime<Utc>) -> DateTime<Utc> {
    let value = match today_iso.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value,
        None => return *now,
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(&Utc);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|start| Utc.from_utc_datetime(&start))
        .unwrap_or(*now)
}

pub fn planning_window(start: &DateTime<Utc>, tz: &Tz) -> Vec<PlanningDay> {
    (0..PLAN_DAYS as i64)
        .map(|offset| {
            let local = (*start + Duration::days(offset)).with_timezone(tz);
            PlanningDay {
                label: local.format("%A, %b %-d, %Y").to_string(),
                iso_date: local.format("%Y-%m-%d").to_string(),
            }
        })
        .collect()
}

pub fn study_plan_prompt(assignments: &[Assignment], time_zone: &str, window: &[PlanningDay]) -> String {
    let list = assignments
        .iter()
        .enumerate()
        .map(|(index, a)| {
            format!(
                "{}. {} ({}) — due {}, est {}h",
                index + 1,
                a.title,
                a.course,
                locale_datetime(&a.deadline),
                a.estimated_hours
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    let window_text = window
        .iter()
        .enumerate()
        .map(|(index, day)| format!("{}. {} ({})", index + 1, day.label, day.iso_date))
        .collect::<Vec<String>>()
        .join("\n");

    let (today_label, today_iso) = window
        .first()
        .map(|day| (day.label.as_str(), day.iso_date.as_str()))
        .unwrap_or(("Unknown", "Unknown"));

    format!(
        r#"Generate a 7-day study plan based on these assignments.

Today's context:
- User timezone: {time_zone}
- Day 1 (today): {today_label} ({today_iso})

Planning window (must stay in this exact order):
{window_text}

Return ONLY a valid JSON array with exactly 7 objects, one per day in the exact order shown above.
Each object should have:
- day (string, e.g. "Wednesday")
- date (string, YYYY-MM-DD)
- tasks (array of strings, each task as a short sentence)

If no tasks are needed for a day, return an empty array for tasks.
Return nothing except the JSON array.

Assignments:
{list}

Rules:
- Include time estimates per task
- Make sure the workload fits the deadlines
- Spread work intelligently across days
- Day 1 must represent today, not Monday unless today is Monday
- Return ONLY valid JSON, no markdown, no code blocks, no extra text"#
    )
}

pub fn study_plan_request(prompt: String) -> ChatRequest<'static> {
    ChatRequest::prompt(TEXT_MODEL, prompt).temperature(0.4)
}

pub fn parse_study_plan(text: &str, window: &[PlanningDay]) -> StudyPlan {
    let days = match serde_json::from_str::<Value>(&strip_code_fences(text)) {
        Ok(Value::Array(days)) if days.len() == PLAN_DAYS => days,
        _ => return StudyPlan::Raw(text.to_string()),
    };

    let mut plan = Vec::with_capacity(PLAN_DAYS);
    for (index, entry) in days.iter().enumerate() {
        if entry.is_null() {
            return StudyPlan::Raw(text.to_string());
        }

        let fallback_date = window.get(index).map(|day| day.iso_date.clone());
        plan.push(PlanDay {
            day: truthy_string(&entry["day"]).unwrap_or_default(),
            date: truthy_string(&entry["date"])
                .or(fallback_date)
                .unwrap_or_default(),
            tasks: match &entry["tasks"] {
                Value::Array(tasks) => tasks.iter().map(display).collect(),
                _ => Vec::new(),
            },
        });
    }
    StudyPlan::Days(plan)
}

fn truthy_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(display(other)),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
