use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::SubscriptionStatus;

pub const FREE_ACTIVE_ASSIGNMENT_LIMIT: i64 = 5;
pub const FREE_DAILY_DIAGNOSE_LIMIT: i64 = 5;

pub const ASSIGNMENT_LIMIT_MESSAGE: &str =
    "Free plan is limited to 5 assignments. Upgrade to Premium for $2.99/month for unlimited.";
pub const DIAGNOSE_LIMIT_MESSAGE: &str = "Daily limit reached — upgrade for unlimited";

/// Plan limits as seen by one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub freemium_enabled: bool,
    pub status: SubscriptionStatus,
}

impl Gate {
    pub fn new(freemium_enabled: bool, status: SubscriptionStatus) -> Self {
        Gate {
            freemium_enabled,
            status,
        }
    }

    /// Without the freemium switch everybody gets the premium experience.
    pub fn effective_status(&self) -> SubscriptionStatus {
        if self.freemium_enabled {
            self.status
        } else {
            SubscriptionStatus::Premium
        }
    }

    pub fn is_limited(&self) -> bool {
        self.effective_status() == SubscriptionStatus::Free
    }

    /// Cap on active assignments, `None` when unlimited.
    pub fn assignment_limit(&self) -> Option<i64> {
        if self.is_limited() {
            Some(FREE_ACTIVE_ASSIGNMENT_LIMIT)
        } else {
            None
        }
    }

    /// Daily diagnose quota, `None` when unlimited.
    pub fn diagnose_limit(&self) -> Option<i64> {
        if self.is_limited() {
            Some(FREE_DAILY_DIAGNOSE_LIMIT)
        } else {
            None
        }
    }
}

/// Start and end of the UTC calendar day containing `now`.
pub fn utc_day_bounds(now: &DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .unwrap_or(*now);
    (start, start + Duration::days(1))
}
