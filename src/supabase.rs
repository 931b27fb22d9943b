pub mod client;
pub mod error;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
