use chrono::NaiveDate;

/// Next streak value for activity on `today`, or `None` when today was
/// already counted.
pub fn next_streak(current: i32, last_active: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
    match last_active {
        Some(last) if last == today => None,
        Some(last) if Some(last) == today.pred_opt() => Some(current.max(0) + 1),
        _ => Some(1),
    }
}

pub fn date_key(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
