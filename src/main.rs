use std::path::PathBuf;

use anyhow::{Context, Result};
use weathermail::{HttpNotifier, NotifierConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var_os("WEATHERMAIL_CONFIG").map(PathBuf::from);
    let config = NotifierConfig::load_from_path(config_path)?;

    let _telemetry = telemetry::init(&config.logging, &config.telemetry)?;
    tracing::info!("Starting weathermail {}", weathermail::VERSION);

    let notifier =
        HttpNotifier::from_config(&config).context("Failed to set up notification pipeline")?;

    web::run(&config.server, notifier).await
}
