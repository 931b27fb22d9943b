use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static CODE_FENCE: OnceLock<Regex> = OnceLock::new();

/// en-US rendering used inside prompts, e.g. `10/16/2026, 5:07:00 PM`.
pub fn locale_datetime(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Strips markdown code fences the models like to wrap JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    let fence = CODE_FENCE.get_or_init(|| Regex::new(r"(?i)```(?:json)?").unwrap());
    fence.replace_all(raw, "").trim().to_string()
}
