use anyhow::Context;
use mod36_server::{logging, run, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;

    logging::init_logging(&config).context("Failed to initialize logging")?;

    run(config).await.context("Server error")?;

    Ok(())
}
