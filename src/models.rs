use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::db::models::{AssignmentEntity, SubscriptionEntity};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Anything that isn't a known tier counts as `Medium`.
    pub fn parse_or_default(value: &str) -> Priority {
        value.trim().parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionStatus {
    Free,
    Premium,
}

impl SubscriptionStatus {
    pub fn parse_or_free(value: &str) -> SubscriptionStatus {
        value.trim().parse().unwrap_or(SubscriptionStatus::Free)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub course: String,
    pub deadline: DateTime<Utc>,
    pub estimated_hours: f64,
    pub priority: Priority,
    pub completed: bool,
}

impl TryFrom<AssignmentEntity> for Assignment {
    type Error = chrono::ParseError;

    fn try_from(entity: AssignmentEntity) -> Result<Self, Self::Error> {
        let deadline = DateTime::parse_from_rfc3339(&entity.deadline)?.with_timezone(&Utc);
        Ok(Assignment {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            course: entity.course,
            deadline,
            estimated_hours: entity.estimated_hours,
            priority: Priority::parse_or_default(&entity.priority),
            completed: entity.completed,
        })
    }
}

/// Fields accepted when creating or editing an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentDraft {
    pub title: String,
    pub course: String,
    pub deadline: DateTime<Utc>,
    pub estimated_hours: f64,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub user_id: String,
    pub status: SubscriptionStatus,
    pub streak: i32,
    pub last_active: Option<NaiveDate>,
}

impl From<SubscriptionEntity> for Subscription {
    fn from(entity: SubscriptionEntity) -> Self {
        Subscription {
            user_id: entity.user_id,
            status: SubscriptionStatus::parse_or_free(&entity.status),
            streak: entity.streak.max(0),
            last_active: entity.last_active.as_deref().and_then(|value| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .or_else(|| parse_deadline(value).map(|at| at.date_naive()))
            }),
        }
    }
}

/// Parses a deadline as sent by clients or extracted from a syllabus.
///
/// Accepts RFC 3339 instants, naive date-times (read as UTC) and bare dates,
/// which land on 23:59 of that day.
pub fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS.iter() {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 0))
        .map(|parsed| Utc.from_utc_datetime(&parsed))
}

/// Storage form of an instant. Fixed width so text ordering matches time ordering.
pub fn format_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
