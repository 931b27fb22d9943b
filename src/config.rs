use std::env;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use crate::llm::{GROQ_DOMAIN, OPENAI_DOMAIN};
use crate::stripe::STRIPE_DOMAIN;
use crate::turnstile::TURNSTILE_DOMAIN;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
}

impl Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
        }
    }
}

/// Runtime settings. Integration secrets are optional so that a missing key
/// only disables the routes that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub site_url: String,
    pub freemium_enabled: bool,
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_price_id: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub turnstile_secret_key: Option<String>,
    pub groq_base_url: String,
    pub openai_base_url: String,
    pub stripe_base_url: String,
    pub turnstile_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(*name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        Ok(Config {
            bind_addr: var(&["BIND_ADDR"]).unwrap_or_else(|| String::from(DEFAULT_BIND_ADDR)),
            database_url: var(&["DATABASE_URL"]).ok_or(ConfigError::Missing("DATABASE_URL"))?,
            site_url: var(&["SITE_URL", "APP_URL", "NEXT_PUBLIC_SITE_URL", "NEXT_PUBLIC_APP_URL"])
                .unwrap_or_else(|| String::from(DEFAULT_SITE_URL)),
            freemium_enabled: parse_bool(var(&["ENABLE_FREEMIUM", "NEXT_PUBLIC_ENABLE_FREEMIUM"]), false),
            groq_api_key: var(&["GROQ_API_KEY"]),
            openai_api_key: var(&["OPENAI_API_KEY"]),
            stripe_secret_key: var(&["STRIPE_SECRET_KEY"]),
            stripe_price_id: var(&["STRIPE_PRICE_ID"]),
            stripe_webhook_secret: var(&["STRIPE_WEBHOOK_SECRET"]),
            supabase_url: var(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]),
            supabase_anon_key: var(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]),
            turnstile_secret_key: var(&["TURNSTILE_SECRET_KEY"]),
            groq_base_url: var(&["GROQ_BASE_URL"]).unwrap_or_else(|| String::from(GROQ_DOMAIN)),
            openai_base_url: var(&["OPENAI_BASE_URL"]).unwrap_or_else(|| String::from(OPENAI_DOMAIN)),
            stripe_base_url: var(&["STRIPE_BASE_URL"]).unwrap_or_else(|| String::from(STRIPE_DOMAIN)),
            turnstile_base_url: var(&["TURNSTILE_BASE_URL"])
                .unwrap_or_else(|| String::from(TURNSTILE_DOMAIN)),
        })
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
