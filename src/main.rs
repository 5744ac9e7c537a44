use anyhow::Result;
use careers_view::cli::{handle_command, load_config, Cli};
use careers_view::logging;
use clap::Parser;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (subscriber, file_layer) = logging::subscriber(filter);
    subscriber.init();

    let config = load_config(&cli)?;

    // Optional JSON log file alongside the human-readable stderr output
    if let Some(path) = &config.environment.log_file {
        logging::attach_log_file(&file_layer, path)?;
    }

    handle_command(cli, config).await
}
