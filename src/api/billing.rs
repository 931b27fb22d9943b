use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use log::{info, warn};
use serde_json::{json, Value};

use super::auth::authenticate;
use super::error::ApiError;
use super::state::AppState;
use crate::stripe::signature::verify_signature;
use crate::stripe::types::{CheckoutParams, CompletedCheckout, Event, CHECKOUT_SESSION_COMPLETED};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

pub async fn checkout(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let (client, price_id) = state.stripe()?;

    let params = CheckoutParams::subscription(&state.config.site_url, &price_id, &user.id);
    let session = client.create_checkout_session(&params).await?;
    info!("created checkout session {} for user_id: {}", session.id, user.id);

    match session.url {
        Some(url) => Ok(Json(json!({ "url": url }))),
        None => Err(ApiError::Upstream(String::from(
            "Stripe did not return a checkout URL.",
        ))),
    }
}

/// Signed Stripe events. Only completed checkouts change anything.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: String,
) -> Result<Json<Value>, ApiError> {
    let secret = state
        .config
        .stripe_webhook_secret
        .as_deref()
        .map(str::trim)
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| ApiError::Misconfigured(String::from("Missing webhook environment configuration.")))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing Stripe signature."))?;

    if let Err(err) = verify_signature(&payload, signature, secret, Utc::now().timestamp()) {
        warn!("rejected webhook: {}", err);
        return Err(ApiError::bad_request("Invalid webhook signature."));
    }

    let event: Event = serde_json::from_str(&payload).map_err(|err| {
        warn!("failed to parse webhook payload: {}", err);
        ApiError::bad_request("Invalid webhook payload.")
    })?;

    if event.event_type == CHECKOUT_SESSION_COMPLETED {
        let checkout = CompletedCheckout::from_session(&event.data.object);
        let user_id = checkout
            .user_id
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("Missing user metadata."))?;

        state.db.upgrade_subscription(
            user_id,
            checkout.customer_id.as_deref(),
            checkout.subscription_id.as_deref(),
        )?;
    } else {
        info!("ignoring webhook event: {}", event.event_type);
    }

    Ok(Json(json!({ "received": true })))
}
