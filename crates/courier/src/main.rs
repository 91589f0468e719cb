//! The `courier` binary.

use clap::Parser;
use courier::app;
use courier::config::{Args, Settings};
use courier_telemetry::{init_telemetry, TelemetryConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env(Args::parse())?;

    let telemetry = TelemetryConfig::builder()
        .service_name("courier")
        .logging(settings.log.clone())
        .build();
    let metrics = Arc::new(init_telemetry(&telemetry)?);

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        dir = %settings.dir.display(),
        "Server Listening"
    );

    if let Err(err) = app::build_server(&settings, metrics).run().await {
        tracing::error!(error = %err, "Server failed");
        return Err(err.into());
    }
    Ok(())
}
