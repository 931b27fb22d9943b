use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

use super::auth::authenticate;
use super::error::ApiError;
use super::state::AppState;
use crate::assistant::vibe::{vibe_prompt, vibe_request, FALLBACK_VIBE};
use crate::llm::error::LlmError;
use crate::models::{parse_deadline, Assignment, AssignmentDraft, Priority};
use crate::tracker::gate::{utc_day_bounds, ASSIGNMENT_LIMIT_MESSAGE, DIAGNOSE_LIMIT_MESSAGE};
use crate::tracker::panic::{hours_left, panic_score_at};

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default, alias = "estimatedHours")]
    pub estimated_hours: f64,
    #[serde(default)]
    pub priority: Option<String>,
}

impl AssignmentPayload {
    pub fn into_draft(self) -> Result<AssignmentDraft, ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::bad_request("Title is required."));
        }

        let deadline = parse_deadline(&self.deadline)
            .ok_or_else(|| ApiError::bad_request("Deadline must be a valid date."))?;

        if !self.estimated_hours.is_finite() || self.estimated_hours <= 0.0 {
            return Err(ApiError::bad_request("Estimated hours must be greater than 0."));
        }

        Ok(AssignmentDraft {
            title: title.to_string(),
            course: self.course.trim().to_string(),
            deadline,
            estimated_hours: self.estimated_hours,
            priority: self
                .priority
                .as_deref()
                .map(Priority::parse_or_default)
                .unwrap_or_default(),
        })
    }
}

pub async fn list_assignments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(state.db.get_assignments(&user.id)?))
}

/// Free users are capped on active assignments when adding new ones.
pub async fn create_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AssignmentPayload>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let user = authenticate(&state, &headers).await?;
    let draft = payload.into_draft()?;

    let subscription = state.db.get_or_create_subscription(&user.id)?;
    let limit = state.gate(subscription.status).assignment_limit();

    match state.db.create_assignment_within(&user.id, &draft, limit)? {
        Some(assignment) => Ok((StatusCode::CREATED, Json(assignment))),
        None => {
            info!("assignment limit reached for user_id: {}", user.id);
            Err(ApiError::LimitReached(ASSIGNMENT_LIMIT_MESSAGE.to_string()))
        }
    }
}

pub async fn update_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<AssignmentPayload>,
) -> Result<Json<Assignment>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let draft = payload.into_draft()?;

    match state.db.update_assignment(&user.id, id, &draft)? {
        Some(assignment) => Ok(Json(assignment)),
        None => Err(ApiError::not_found()),
    }
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    if !state.db.delete_assignment(&user.id, id)? {
        return Err(ApiError::not_found());
    }
    Ok(Json(json!({ "deleted": 1 })))
}

pub async fn clear_assignments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let deleted = state.db.delete_assignments(&user.id)?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// Completing work counts as activity for the streak.
pub async fn complete_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    if !state.db.set_completed(&user.id, id, true)? {
        return Err(ApiError::not_found());
    }

    let subscription = state.db.touch_streak(&user.id, Utc::now().date_naive())?;
    Ok(Json(json!({ "completed": true, "streak": subscription.streak })))
}

pub async fn undo_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    if !state.db.set_completed(&user.id, id, false)? {
        return Err(ApiError::not_found());
    }
    Ok(Json(json!({ "completed": false })))
}

/// The "diagnose" helper. Free users get a few per UTC day, and a use is
/// recorded before the model is asked.
pub async fn vibe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let assignment = state
        .db
        .get_assignment(&user.id, id)?
        .ok_or_else(ApiError::not_found)?;
    let client = state.openai()?;

    let now = Utc::now();
    let subscription = state.db.get_or_create_subscription(&user.id)?;
    let gate = state.gate(subscription.status);
    if let Some(limit) = gate.diagnose_limit() {
        let (start, end) = utc_day_bounds(&now);
        if !state.db.record_diagnose_within(&user.id, &start, &end, &now, limit)? {
            info!("diagnose limit reached for user_id: {}", user.id);
            return Err(ApiError::TooManyRequests(DIAGNOSE_LIMIT_MESSAGE.to_string()));
        }
    }

    let score = panic_score_at(
        &assignment.deadline,
        assignment.estimated_hours,
        assignment.priority,
        &now,
    );
    let prompt = vibe_prompt(&assignment.title, score, hours_left(&assignment.deadline, &now));

    let message = match client.complete(&vibe_request(prompt)).await {
        Ok(message) => message,
        Err(LlmError::EmptyResponse) => FALLBACK_VIBE.to_string(),
        Err(err) => return Err(err.into()),
    };
    Ok(Json(json!({ "message": message })))
}
