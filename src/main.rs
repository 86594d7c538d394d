// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use bucket_labeler::cli::{execute, Cli};
use bucket_labeler::config::ScanConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(default_filter: &str) {
    // Report goes to stdout, diagnostics to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let service = match cli.service_config() {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    init_logging(&service.log_filter);

    execute(service, ScanConfig::default()).await?;
    Ok(())
}
