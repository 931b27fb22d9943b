use std::sync::Arc;

use super::error::ApiError;
use crate::config::Config;
use crate::db::client::DbClient;
use crate::llm::client::ChatClient;
use crate::models::SubscriptionStatus;
use crate::stripe::client::StripeClient;
use crate::supabase::client::SupabaseClient;
use crate::tracker::gate::Gate;
use crate::turnstile::client::TurnstileClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbClient, config: Config) -> AppState {
        AppState {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }

    pub fn gate(&self, status: SubscriptionStatus) -> Gate {
        Gate::new(self.config.freemium_enabled, status)
    }

    pub fn groq(&self) -> Result<ChatClient, ApiError> {
        let api_key = required(&self.config.groq_api_key, "Missing GROQ_API_KEY.")?;
        Ok(ChatClient::new(api_key, self.config.groq_base_url.clone()))
    }

    pub fn openai(&self) -> Result<ChatClient, ApiError> {
        let api_key = required(&self.config.openai_api_key, "Missing OPENAI_API_KEY.")?;
        Ok(ChatClient::new(api_key, self.config.openai_base_url.clone()))
    }

    /// Checkout needs both the secret key and the price of the premium plan.
    pub fn stripe(&self) -> Result<(StripeClient, String), ApiError> {
        let message = "Stripe or Supabase environment is not configured.";
        let secret_key = required(&self.config.stripe_secret_key, message)?;
        let price_id = required(&self.config.stripe_price_id, message)?;
        Ok((
            StripeClient::new(secret_key, self.config.stripe_base_url.clone()),
            price_id,
        ))
    }

    pub fn supabase(&self) -> Result<SupabaseClient, ApiError> {
        let message = "Supabase environment is not configured.";
        let url = required(&self.config.supabase_url, message)?;
        let anon_key = required(&self.config.supabase_anon_key, message)?;
        Ok(SupabaseClient::new(anon_key, url))
    }

    pub fn turnstile(&self) -> Result<TurnstileClient, ApiError> {
        let secret = required(&self.config.turnstile_secret_key, "Captcha is not configured.")?;
        Ok(TurnstileClient::new(secret, self.config.turnstile_base_url.clone()))
    }
}

fn required(value: &Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Misconfigured(message.to_string()))
}
