use anyhow::Result;
use clap::Parser;
use tracing::warn;

use gala_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "gala-backend")]
#[command(about = "Gala event-planning backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).await?;
    let _log_guard = gala_bootstrap::telemetry::init(args.log_json, config.log_dir.as_deref())?;
    for warning in config.startup_warnings() {
        warn!("{}", warning);
    }

    gala_bootstrap::run(config).await
}
