use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::warn;
use tokio::net::TcpListener;

use equipment_api::router;
use equipment_stats::HistoryStore;

/// HTTP service for chemical equipment CSV uploads, history and PDF reports.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = Arc::new(HistoryStore::new());
    let rtr = router(store);

    println!("Listening on {}", args.addr);

    let listener = TcpListener::bind(args.addr).await?;
    axum::serve(listener, rtr)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
    }
}
