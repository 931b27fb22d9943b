use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::Assignment;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Countdown {
    pub label: String,
    pub hours_left: f64,
}

pub fn countdown(deadline: &DateTime<Utc>, now: &DateTime<Utc>) -> Countdown {
    let diff = *deadline - *now;
    let millis = diff.num_milliseconds();

    if millis <= 0 {
        return Countdown {
            label: "Overdue".to_string(),
            hours_left: 0.0,
        };
    }

    let total_seconds = millis / 1000;
    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    Countdown {
        label: format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, seconds),
        hours_left: millis as f64 / (1000.0 * 60.0 * 60.0),
    }
}

pub fn pacing(deadline: &DateTime<Utc>, estimated_hours: f64, now: &DateTime<Utc>) -> Option<String> {
    let millis = (*deadline - *now).num_milliseconds();
    if millis <= 0 {
        return None;
    }

    let days_remaining = millis as f64 / (1000.0 * 60.0 * 60.0 * 24.0);
    if days_remaining < 1.0 {
        return Some("Due very soon — push through it".to_string());
    }

    Some(format!(
        "Spend ~{:.1} hrs/day to finish comfortably",
        estimated_hours / days_remaining
    ))
}

/// Active assignments due within the next 48 hours.
pub fn survive_today<'a>(assignments: &'a [Assignment], now: &DateTime<Utc>) -> Vec<&'a Assignment> {
    let window = Duration::hours(48);
    assignments
        .iter()
        .filter(|a| !a.completed)
        .filter(|a| {
            let diff = a.deadline - *now;
            diff > Duration::zero() && diff <= window
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::Priority;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn countdown_label() {
        let deadline = now() + Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);
        let result = countdown(&deadline, &now());
        assert_eq!(result.label, "2d 03h 04m 05s");
        assert!((result.hours_left - 51.068).abs() < 0.001);
    }

    #[test]
    fn countdown_overdue() {
        let result = countdown(&(now() - Duration::minutes(1)), &now());
        assert_eq!(result.label, "Overdue");
        assert_eq!(result.hours_left, 0.0);
    }

    #[test]
    fn pacing_text() {
        assert_eq!(pacing(&(now() - Duration::hours(1)), 3.0, &now()), None);
        assert_eq!(
            pacing(&(now() + Duration::hours(5)), 3.0, &now()).unwrap(),
            "Due very soon — push through it"
        );
        assert_eq!(
            pacing(&(now() + Duration::days(4)), 6.0, &now()).unwrap(),
            "Spend ~1.5 hrs/day to finish comfortably"
        );
    }

    #[test]
    fn survive_today_window() {
        let make = |id: i32, hours: i64, completed: bool| Assignment {
            id,
            user_id: "user-1".to_string(),
            title: format!("task {}", id),
            course: String::new(),
            deadline: now() + Duration::hours(hours),
            estimated_hours: 1.0,
            priority: Priority::Medium,
            completed,
        };
        let assignments = vec![
            make(1, -1, false),
            make(2, 1, false),
            make(3, 48, false),
            make(4, 49, false),
            make(5, 2, true),
        ];

        let ids: Vec<i32> = survive_today(&assignments, &now()).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
