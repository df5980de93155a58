//! txdash main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use txdash_api::{start_server, AppState};
use txdash_config::Config;
use txdash_store::{Dashboard, FileStore, JsonFileSource};

#[derive(Parser, Debug)]
#[command(name = "txdash")]
#[command(version)]
#[command(about = "A lightweight dashboard for browsing and creating blockchain transactions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e).context("Failed to load configuration");
        }
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();

    log::info!(
        "Config loaded: transactions={}, state={}",
        config.data.transactions_file.display(),
        config.data.state_file.display()
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let source = Arc::new(JsonFileSource::from_config(&config.data));
        let mut dashboard = Dashboard::new(source);
        if let Err(e) = dashboard.load().await {
            // served with a retry banner; the source may come back
            log::warn!("Starting without transactions: {}", e);
        }

        let kv = FileStore::open(&config.data.state_file)
            .await
            .with_context(|| format!("Failed to open state file {}", config.data.state_file.display()))?;

        let state = AppState::new(config, dashboard, Arc::new(kv));
        start_server(state).await
    })
}
