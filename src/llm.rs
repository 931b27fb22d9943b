pub mod client;
pub mod error;
#[cfg(test)]
pub mod test_helpers;
pub mod types;

pub const GROQ_DOMAIN: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_DOMAIN: &str = "https://api.openai.com/v1";

pub const TEXT_MODEL: &str = "llama-3.3-70b-versatile";
pub const VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const VIBE_MODEL: &str = "gpt-4o-mini";
