pub mod client;
pub mod error;
#[cfg(test)]
pub mod test_helpers;
pub mod types;

pub const TURNSTILE_DOMAIN: &str = "https://challenges.cloudflare.com";
