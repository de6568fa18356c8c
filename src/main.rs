//! cadweb main entry point

use anyhow::Context;
use cadweb_api::start_server;
use cadweb_config::Config;
use cadweb_core::Registry;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cadweb")]
#[command(version = "0.1.0")]
#[command(about = "Read-only JSON API over the ANS operator registry and expense CSV files", long_about = None)]
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

    let config_found = args.config.exists();
    let config = match Config::load_or_default(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] [{}] {}", e.code(), e);
            for suggestion in e.suggestions() {
                eprintln!("  - {}", suggestion);
            }
            return Err(e).with_context(|| format!("loading {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if !config_found {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    log::info!(
        "Data directory: {} (operadoras={}, despesas={})",
        config.data.path.display(),
        config.data.operadoras_file,
        config.data.despesas_file
    );
    for path in [config.operadoras_path(), config.despesas_path()] {
        if !path.exists() {
            log::warn!("Data file not found yet: {}", path.display());
        }
    }

    let registry = Registry::from_config(config)?;

    let rt = Runtime::new()?;
    rt.block_on(start_server(registry))
}
