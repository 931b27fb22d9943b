pub mod client;
pub mod error;
pub mod models;
pub mod schema;
#[cfg(test)]
pub mod test_helpers;
