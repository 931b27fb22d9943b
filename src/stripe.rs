pub mod client;
pub mod error;
pub mod signature;
#[cfg(test)]
pub mod test_helpers;
pub mod types;

pub const STRIPE_DOMAIN: &str = "https://api.stripe.com";
