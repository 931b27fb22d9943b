use std::error::Error;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use super::assignments::{
    clear_assignments, complete_assignment, create_assignment, delete_assignment,
    list_assignments, undo_assignment, update_assignment, vibe,
};
use super::assistant::{draft_email, parse_syllabus, roast, study_plan, weekly_summary};
use super::auth::{sign_in, sign_up, verify_captcha};
use super::billing::{checkout, webhook};
use super::dashboard::dashboard;
use super::state::AppState;

/// Largest syllabus upload accepted.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/verify-captcha", post(verify_captcha))
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/sign-up", post(sign_up))
        .route("/api/dashboard", get(dashboard))
        .route(
            "/api/assignments",
            get(list_assignments)
                .post(create_assignment)
                .delete(clear_assignments),
        )
        .route(
            "/api/assignments/:id",
            put(update_assignment).delete(delete_assignment),
        )
        .route("/api/assignments/:id/complete", post(complete_assignment))
        .route("/api/assignments/:id/undo", post(undo_assignment))
        .route("/api/assignments/:id/vibe", post(vibe))
        .route("/api/roast", post(roast))
        .route("/api/weekly-summary", post(weekly_summary))
        .route("/api/study-plan", post(study_plan))
        .route("/api/draft-email", post(draft_email))
        .route(
            "/api/parse-syllabus",
            post(parse_syllabus).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/stripe/checkout", post(checkout))
        .route("/api/stripe/webhook", post(webhook))
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(&state.config.bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
