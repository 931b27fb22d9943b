use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use super::auth::authenticate;
use super::error::ApiError;
use super::state::AppState;
use crate::assistant::email::{email_prompt, email_request, parse_email_draft, EmailDraft};
use crate::assistant::roast::{roast_prompt, roast_request};
use crate::assistant::study_plan::{
    parse_study_plan, planning_window, resolve_start, resolve_time_zone, study_plan_prompt,
    study_plan_request,
};
use crate::assistant::summary::{weekly_summary_prompt, weekly_summary_request};
use crate::assistant::syllabus::{parse_syllabus as parse_syllabus_items, syllabus_request};
use crate::models::Assignment;

#[derive(Debug, Default, Deserialize)]
pub struct StudyPlanRequest {
    #[serde(default, alias = "todayIso")]
    pub today_iso: Option<String>,
    #[serde(default, alias = "timeZone")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DraftEmailRequest {
    #[serde(default, alias = "assignmentId")]
    pub assignment_id: Option<i32>,
}

/// A file pulled out of the multipart body.
#[derive(Debug)]
pub struct Upload {
    pub content_type: String,
    pub bytes: Bytes,
}

fn active_assignments(state: &AppState, user_id: &str) -> Result<Vec<Assignment>, ApiError> {
    let mut assignments = state.db.get_assignments(user_id)?;
    assignments.retain(|a| !a.completed);
    Ok(assignments)
}

pub async fn roast(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let client = state.groq()?;
    let assignments = active_assignments(&state, &user.id)?;

    let prompt = roast_prompt(&assignments, &Utc::now());
    let roast = client.complete(&roast_request(prompt)).await?;
    Ok(Json(json!({ "roast": roast })))
}

pub async fn weekly_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let client = state.groq()?;
    let assignments = active_assignments(&state, &user.id)?;
    if assignments.is_empty() {
        return Err(ApiError::bad_request("No active assignments provided."));
    }

    let prompt = weekly_summary_prompt(&assignments, &Utc::now());
    let summary = client.complete(&weekly_summary_request(prompt)).await?;
    Ok(Json(json!({ "summary": summary })))
}

pub async fn study_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<StudyPlanRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let client = state.groq()?;
    let assignments = active_assignments(&state, &user.id)?;
    if assignments.is_empty() {
        return Err(ApiError::bad_request("No active assignments provided."));
    }

    let (time_zone, tz) = resolve_time_zone(request.time_zone.as_deref());
    let start = resolve_start(request.today_iso.as_deref(), &Utc::now());
    let window = planning_window(&start, &tz);

    let prompt = study_plan_prompt(&assignments, &time_zone, &window);
    let text = client.complete(&study_plan_request(prompt)).await?;
    Ok(Json(json!({ "plan": parse_study_plan(&text, &window) })))
}

pub async fn draft_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DraftEmailRequest>,
) -> Result<Json<EmailDraft>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let client = state.groq()?;
    let id = request
        .assignment_id
        .ok_or_else(|| ApiError::bad_request("Select an assignment to generate a draft."))?;
    let assignment = state
        .db
        .get_assignment(&user.id, id)?
        .ok_or_else(ApiError::not_found)?;

    let title = assignment.title.trim();
    let course = assignment.course.trim();
    if title.is_empty() || course.is_empty() {
        return Err(ApiError::bad_request(
            "Missing assignment title, course, or deadline.",
        ));
    }

    let prompt = email_prompt(title, course, &assignment.deadline);
    let raw = client.complete(&email_request(prompt)).await?;
    Ok(Json(parse_email_draft(&raw)))
}

/// Returns the first part named `file`.
pub async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!("failed to read multipart body: {}", err);
                return Err(ApiError::bad_request("Invalid upload."));
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|err| {
            warn!("failed to read uploaded file: {}", err);
            ApiError::bad_request("Invalid upload.")
        })?;
        return Ok(Some(Upload { content_type, bytes }));
    }
}

/// Extracts assignments from an uploaded syllabus and stores them all.
pub async fn import_syllabus(state: &AppState, user_id: &str, upload: &Upload) -> Result<usize, ApiError> {
    let client = state.groq()?;
    let content = client
        .complete(&syllabus_request(&upload.content_type, &upload.bytes))
        .await?;

    let drafts = parse_syllabus_items(&content)?;
    if drafts.is_empty() {
        return Err(ApiError::Unprocessable(String::from("No assignments detected.")));
    }

    let inserted = state.db.create_assignments(user_id, &drafts)?;
    info!("imported {} assignments from syllabus for user_id: {}", inserted, user_id);
    Ok(inserted)
}

pub async fn parse_syllabus(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("Missing file or user."))?;

    let inserted = import_syllabus(&state, &user.id, &upload).await?;
    Ok(Json(json!({ "inserted": inserted })))
}
