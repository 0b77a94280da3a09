//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Kafka console server binary

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use console_api::{run_server, ConsoleConfig, LogFormat, CONSOLE_API_NAME, CONSOLE_API_VERSION};

#[derive(Parser)]
#[command(name = "kafka-console")]
#[command(about = "Web console backend for Apache Kafka clusters")]
#[command(version = CONSOLE_API_VERSION)]
struct Cli {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, env = "KAFKA_CONSOLE_CONFIG")]
    config: Option<String>,

    /// API host
    #[arg(long)]
    host: Option<String>,

    /// API port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConsoleConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);

    config.validate()?;

    info!(
        "Starting {} v{} on {}",
        CONSOLE_API_NAME,
        CONSOLE_API_VERSION,
        config.http_address()
    );

    run_server(config).await?;
    Ok(())
}

fn init_tracing(config: &ConsoleConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
    );

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
