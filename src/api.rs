pub mod assignments;
pub mod assistant;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod error;
pub mod server;
pub mod state;
#[cfg(test)]
pub mod test_helpers;
