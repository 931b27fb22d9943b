use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Priority;

const MILLIS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicTier {
    AllGood,
    HeatingUp,
    CodeRed,
}

impl PanicTier {
    pub fn from_score(score: u8) -> PanicTier {
        if score >= 75 {
            PanicTier::CodeRed
        } else if score >= 40 {
            PanicTier::HeatingUp
        } else {
            PanicTier::AllGood
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PanicTier::AllGood => "All Good",
            PanicTier::HeatingUp => "Heating Up",
            PanicTier::CodeRed => "Code Red",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PanicTier::AllGood => "#22c55e",
            PanicTier::HeatingUp => "#f97316",
            PanicTier::CodeRed => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panic {
    pub score: u8,
    pub tier: PanicTier,
    pub label: &'static str,
    pub color: &'static str,
}

impl Panic {
    pub fn from_score(score: u8) -> Panic {
        let tier = PanicTier::from_score(score);
        Panic {
            score,
            tier,
            label: tier.label(),
            color: tier.color(),
        }
    }
}

pub fn multiplier(priority: Priority) -> f64 {
    match priority {
        Priority::High => 1.5,
        Priority::Medium => 1.0,
        Priority::Low => 0.5,
    }
}

/// Fractional hours between `now` and `deadline`, negative once overdue.
pub fn hours_left(deadline: &DateTime<Utc>, now: &DateTime<Utc>) -> f64 {
    (*deadline - *now).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

pub fn panic_score(deadline: &DateTime<Utc>, estimated_hours: f64, priority: Priority) -> u8 {
    panic_score_at(deadline, estimated_hours, priority, &Utc::now())
}

pub fn panic_score_at(
    deadline: &DateTime<Utc>,
    estimated_hours: f64,
    priority: Priority,
    now: &DateTime<Utc>,
) -> u8 {
    let hours_left = hours_left(deadline, now);
    if hours_left <= 0.0 {
        return 100;
    }

    let pressure = estimated_hours / hours_left;
    let base = (pressure * 100.0).round();
    let adjusted = (base * multiplier(priority)).round();

    adjusted.max(0.0).min(100.0) as u8
}
