// Claim-Denial Appeals - Web Server
// Same dashboard as the terminal UI, served as JSON over Axum

use anyhow::{Context, Result};
use clap::Parser;
use claim_appeals::api::{router, spawn_ticker, AppState};
use claim_appeals::{logging, AppConfig, Dashboard, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const TICK_EVERY: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "appeals-server", version, about = "Claim-denial appeals HTTP API")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for verification outcomes
    #[arg(long)]
    seed: Option<u64>,

    /// Claims CSV to load into the table
    #[arg(long)]
    claims: Option<PathBuf>,

    /// Bind host, overriding `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overriding `server.port`
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    /// Flags win over the config file and `APPEALS_*` variables
    fn apply(self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.verification.seed = Some(seed);
        }
        if let Some(claims) = self.claims {
            config.data.claims_csv = Some(claims);
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    cli.apply(&mut config);
    logging::init_stderr(&config.logging);

    let dashboard = Dashboard::from_config(&config, Arc::new(SystemClock))?;
    tracing::info!(claims = dashboard.claims().len(), "Dashboard ready");

    let state = AppState::new(dashboard);
    let _ticker = spawn_ticker(state.clone(), TICK_EVERY);

    let app = router(state);

    let addr = config.server.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(%addr, "Server running");
    println!("\n🚀 Server running on http://{addr}");
    println!("   API: http://{addr}/api/claims");
    println!("   UI:  http://{addr}");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "appeals-server",
            "--seed",
            "9",
            "--claims",
            "denials.csv",
            "--port",
            "8181",
        ]);
        assert!(cli.config.is_none());

        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.verification.seed, Some(9));
        assert_eq!(config.data.claims_csv, Some(PathBuf::from("denials.csv")));
        assert_eq!(config.server.server_addr(), "127.0.0.1:8181");
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = AppConfig::default();
        Cli::parse_from(["appeals-server"]).apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
