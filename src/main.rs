//! ddns-updater - keep a DNS "A" record pointed at this machine.

use clap::Parser;
use ddns_updater::config::{ProviderKind, Settings};
use ddns_updater::detector::IpDetector;
use ddns_updater::logging;
use ddns_updater::providers::{create_provider, DnsProvider};
use ddns_updater::updater::{update_if_changed, UpdateOutcome};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ddns-updater")]
#[command(about = "Update a DNS A record when the public IP changes")]
#[command(version)]
struct Cli {
    /// DNS hosting provider
    #[arg(short, long, value_enum, ignore_case = true)]
    provider: ProviderKind,

    /// Record to update (e.g. vpn.example.com)
    #[arg(short, long)]
    name: String,

    /// Directory for log files [default: logs/ next to the executable]
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log to stdout only
    #[arg(long)]
    no_log_file: bool,
}

impl Cli {
    /// Where the rotated log files go, if anywhere.
    fn file_log_dir(&self) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        Some(self.log_dir.clone().unwrap_or_else(logging::default_log_dir))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.file_log_dir();

    // Held until exit so the file writer flushes.
    let _guard = match logging::init(log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(outcome) => {
            tracing::info!("{}", outcome.reason);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<UpdateOutcome> {
    let settings = Settings::from_env(cli.provider, &cli.name)?;
    let provider = create_provider(settings.credentials)?;
    let detector = IpDetector::new();

    tracing::debug!(
        "Checking {} on {} against {}",
        settings.record_name,
        provider.name(),
        detector.service()
    );

    let outcome = update_if_changed(&provider, &detector, &settings.record_name).await?;
    Ok(outcome)
}
