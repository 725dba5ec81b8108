#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary entry point for the retrofit map server.

use std::path::PathBuf;

use clap::Parser;
use retrofit_map_config::AppConfig;

/// Serve the Chicago building retrofit map.
#[derive(Parser)]
#[command(name = "retrofit_map_server")]
#[command(about = "Serve the Chicago building retrofit map")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides config and `BIND_ADDR`).
    #[arg(long)]
    bind_addr: Option<String>,

    /// Port to listen on (overrides config and `PORT`).
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bind_addr) = cli.bind_addr {
        config.server.bind_addr = bind_addr;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    retrofit_map_server::run_server(config).await?;

    Ok(())
}
