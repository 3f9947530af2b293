mod ckan;
mod search;
mod server;

pub const USER_AGENT: &str = concat!("basept/", env!("CARGO_PKG_VERSION"));

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tokio::net::TcpListener;
use tracing::info;

use ckan::CkanClient;
use search::SearchService;

/// TCP connection establishment timeout for catalog requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Search public-procurement datasets on dados.gov.pt over HTTP.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// CKAN action API base URL
    #[arg(long, env = "BASEPT_UPSTREAM", default_value = ckan::DEFAULT_BASE_URL)]
    upstream: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("basept=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
    let catalog = CkanClient::new(http, &cli.upstream)
        .inspect_err(|e| tracing::error!("invalid upstream URL {}: {e}", cli.upstream))?;
    let app = server::router(SearchService::new(catalog));

    let listener = TcpListener::bind(cli.bind).await?;
    info!(addr = %listener.local_addr()?, upstream = %cli.upstream, "starting basept");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
