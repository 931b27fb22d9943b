#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

use std::error::Error;

use crate::api::server::serve;
use crate::api::state::AppState;
use crate::config::Config;
use crate::db::client::DbClient;

pub mod api;
pub mod assistant;
pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod stripe;
pub mod supabase;
pub mod tracker;
pub mod turnstile;

pub async fn start(config: Config) -> Result<(), Box<dyn Error>> {
    let db = DbClient::new(&config.database_url)?;
    serve(AppState::new(db, config)).await
}
