use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::auth::authenticate;
use super::error::ApiError;
use super::state::AppState;
use crate::models::{Assignment, Subscription, SubscriptionStatus};
use crate::tracker::conflicts::{detect_conflicts, ConflictReport};
use crate::tracker::countdown::{countdown, pacing, survive_today, Countdown};
use crate::tracker::gate::Gate;
use crate::tracker::panic::{panic_score_at, Panic};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub survive_today: bool,
}

#[derive(Debug, Serialize)]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub panic: Panic,
    pub countdown: Countdown,
    pub pacing: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub status: SubscriptionStatus,
    pub freemium_enabled: bool,
    pub streak: i32,
    pub last_active: Option<NaiveDate>,
    pub active_assignments: usize,
    /// Absent when the plan has no cap.
    pub assignment_limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub assignments: Vec<AssignmentView>,
    pub conflicts: ConflictReport,
    pub plan: PlanView,
}

pub fn assignment_view(assignment: &Assignment, now: &DateTime<Utc>) -> AssignmentView {
    let score = panic_score_at(
        &assignment.deadline,
        assignment.estimated_hours,
        assignment.priority,
        now,
    );
    AssignmentView {
        assignment: assignment.clone(),
        panic: Panic::from_score(score),
        countdown: countdown(&assignment.deadline, now),
        pacing: if assignment.completed {
            None
        } else {
            pacing(&assignment.deadline, assignment.estimated_hours, now)
        },
    }
}

/// Conflicts are always computed over the whole workload, the survive
/// today filter only narrows the listed assignments.
pub fn build_dashboard(
    assignments: &[Assignment],
    subscription: &Subscription,
    gate: &Gate,
    survive_today_only: bool,
    now: &DateTime<Utc>,
) -> Dashboard {
    let listed: Vec<&Assignment> = if survive_today_only {
        survive_today(assignments, now)
    } else {
        assignments.iter().collect()
    };

    Dashboard {
        assignments: listed.into_iter().map(|a| assignment_view(a, now)).collect(),
        conflicts: detect_conflicts(assignments),
        plan: PlanView {
            status: gate.effective_status(),
            freemium_enabled: gate.freemium_enabled,
            streak: subscription.streak,
            last_active: subscription.last_active,
            active_assignments: assignments.iter().filter(|a| !a.completed).count(),
            assignment_limit: gate.assignment_limit(),
        },
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let now = Utc::now();

    let subscription = state.db.touch_streak(&user.id, now.date_naive())?;
    let assignments = state.db.get_assignments(&user.id)?;
    let gate = state.gate(subscription.status);

    Ok(Json(build_dashboard(
        &assignments,
        &subscription,
        &gate,
        query.survive_today,
        &now,
    )))
}
