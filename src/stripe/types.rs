use serde::Deserialize;
use serde_json::Value;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutParams<'a> {
    pub price_id: &'a str,
    pub user_id: &'a str,
    pub success_url: String,
    pub cancel_url: String,
}

impl<'a> CheckoutParams<'a> {
    /// A monthly subscription that returns the user to the dashboard.
    pub fn subscription(site_url: &str, price_id: &'a str, user_id: &'a str) -> Self {
        let site_url = site_url.trim_end_matches('/');
        CheckoutParams {
            price_id,
            user_id,
            success_url: format!("{}/dashboard?checkout=success", site_url),
            cancel_url: format!("{}/dashboard?checkout=cancel", site_url),
        }
    }

    /// Stripe expects nested parameters in bracket notation.
    pub fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", String::from("subscription")),
            ("line_items[0][price]", self.price_id.to_string()),
            ("line_items[0][quantity]", String::from("1")),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
            ("metadata[userId]", self.user_id.to_string()),
            ("subscription_data[metadata][userId]", self.user_id.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: Value,
}

/// The parts of a completed checkout session needed to grant premium.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCheckout {
    pub user_id: Option<String>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
}

impl CompletedCheckout {
    pub fn from_session(session: &Value) -> Self {
        CompletedCheckout {
            user_id: session["metadata"]["userId"]
                .as_str()
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            customer_id: expandable_id(&session["customer"]),
            subscription_id: expandable_id(&session["subscription"]),
        }
    }
}

/// Stripe references are either a bare id or an expanded object.
pub fn expandable_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(object) => object.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
