//! WalKV Server Binary
//!
//! Starts the TCP server for WalKV.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use walkv::network::Server;
use walkv::{Config, Engine};

/// WalKV Server
#[derive(Parser, Debug)]
#[command(name = "walkv-server")]
#[command(about = "Persistent key-value store with a batched write-ahead log")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(short, long)]
    listen: Option<String>,

    /// WAL directory
    #[arg(short, long)]
    wal_dir: Option<PathBuf>,

    /// Run without a write-ahead log (nothing survives a restart)
    #[arg(long)]
    no_wal: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("walkv-server: {}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    apply_overrides(&mut config, &args);

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("WalKV Server v{}", walkv::VERSION);
    tracing::info!(
        wal_enabled = config.wal.enabled,
        wal_dir = %config.wal.dir.display(),
        listen = %config.network.listen_addr,
        "configuration loaded"
    );

    // Open engine (replays the WAL before anything is served)
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            process::exit(1);
        }
    };

    let server = match Server::bind(&config.network, Arc::clone(&engine)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            engine.close();
            process::exit(1);
        }
    };

    // Set up Ctrl+C handler
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.shutdown();
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let result = server.run();

    // Drain whatever is still batched before exiting
    engine.close();

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }

    tracing::info!("Server stopped");
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(listen) = &args.listen {
        config.network.listen_addr = listen.clone();
    }
    if let Some(dir) = &args.wal_dir {
        config.wal.dir = dir.clone();
    }
    if args.no_wal {
        config.wal.enabled = false;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}
