use std::error::Error;

use dotenv::dotenv;
use log::warn;

use duesense::config::Config;
use duesense::start;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = dotenv() {
        warn!("failed to load .env file: {}", err);
    }

    let config = Config::from_env()?;
    start(config).await?;

    Ok(())
}
