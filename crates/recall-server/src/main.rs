//! Recall Server - forgetting-curve review scheduling over HTTP
//!
//! A thin facade around the recall-core engine:
//! - Schedule single reviews and batches (per-item failure isolation)
//! - Retention and optimal-time estimates over card snapshots
//! - Read/replace the scheduler configuration atomically
//!
//! The server holds no card storage; callers pass snapshots in and persist
//! the updated snapshots that come back. Keeping at most one in-flight
//! update per `(userId, itemId)` key is the caller's responsibility.

mod api;
mod handlers;
mod server;

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recall_core::SchedulerConfig;

use crate::server::{router, AppState};

#[derive(Debug, Parser)]
#[command(
    name = "recall-server",
    version,
    about = "Forgetting-curve spaced repetition scheduling service"
)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:7878")]
    bind: SocketAddr,

    /// Emit logs as JSON (for log shippers)
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let state = AppState::new(SchedulerConfig::default());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, version = env!("CARGO_PKG_VERSION"), "recall server listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}
