// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use claim_appeals::{
    logging, AppConfig, Dashboard, DocumentCategory, SequencerEvent, SystemClock, UploadZone,
};

#[derive(Debug, Parser)]
#[command(name = "claim-appeals", version, about = "Chargeback claim-denial appeals desk")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for verification outcomes
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Claims CSV to load into the table
    #[arg(long, global = true)]
    claims: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Terminal dashboard (default)
    Ui,
    /// Show which upload zone and category each file name lands in
    Classify { files: Vec<String> },
    /// Run one verification in real time and print the outcome
    Verify {
        /// Claim id; the first claim when omitted
        #[arg(long)]
        claim: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(seed) = cli.seed {
        config.verification.seed = Some(seed);
    }
    if let Some(claims) = cli.claims {
        config.data.claims_csv = Some(claims);
    }

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => run_ui_mode(&config),
        Command::Classify { files } => {
            logging::init_stderr(&config.logging);
            run_classify(&files);
            Ok(())
        }
        Command::Verify { claim } => {
            logging::init_stderr(&config.logging);
            run_verify(&config, claim)
        }
    }
}

fn run_classify(files: &[String]) {
    for name in files {
        let verdict = if UploadZone::Document.accepts(name) {
            format!("document → {}", DocumentCategory::classify(name))
        } else if UploadZone::Csv.accepts(name) {
            "claims csv".to_string()
        } else {
            "dropped (unsupported type)".to_string()
        };
        println!("{name}: {verdict}");
    }
}

fn run_verify(config: &AppConfig, claim: Option<String>) -> Result<()> {
    let mut dashboard = Dashboard::from_config(config, Arc::new(SystemClock))?;
    if dashboard.claims().is_empty() {
        dashboard.generate_sample_denials();
    }

    let claim_id = match claim {
        Some(id) => id,
        None => dashboard
            .claims()
            .first()
            .map(|c| c.id.clone())
            .context("No claims to verify")?,
    };
    dashboard.claim_clicked(&claim_id)?;

    println!("🔎 Verifying {claim_id} against Contracts, GPO, and Invoice repositories...");
    println!("   0% complete");

    while dashboard.verification().outcome().is_none() {
        for event in dashboard.tick() {
            if let SequencerEvent::Progressed(p) = event {
                println!("{p:>4}% complete");
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let verification = dashboard.verification();
    if let Some(outcome) = verification.outcome() {
        println!("\n{}", outcome.label());
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        for check in outcome.checks() {
            println!("  {check}");
        }
        if verification.appeal_visible() {
            println!("\nAppeal Email Draft:\n");
            println!("{}", verification.draft());
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    logging::init_file(&config.logging).context("Failed to open log file")?;

    let dashboard = Dashboard::from_config(config, Arc::new(SystemClock))?;
    tracing::info!(claims = dashboard.claims().len(), "Starting terminal dashboard");

    let mut app = ui::App::new(dashboard, config.appeal.organization.clone());
    ui::run_ui(&mut app)?;

    tracing::info!("Terminal dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the HTTP API: cargo run --bin appeals-server --features server");
    std::process::exit(1);
}
