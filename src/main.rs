//! freshdesk-export server binary

use clap::Parser;
use freshdesk_export::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve the Freshdesk comment export form endpoint
#[derive(Parser, Debug)]
#[command(name = "freshdesk-export", version, about)]
struct Args {
    /// JSON configuration file (defaults are used for missing fields)
    #[arg(short, long, env = "FRESHDESK_EXPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            Config::from_json_file(path)?
        }
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.server.api.bind_address = bind;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "freshdesk-export starting");

    freshdesk_export::api::start_api_server(Arc::new(config)).await?;
    Ok(())
}
