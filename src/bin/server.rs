//! LexiKV Server Binary
//!
//! Starts the TCP server for LexiKV.

use std::sync::Arc;

use clap::Parser;
use lexikv::network::Server;
use lexikv::{Config, Dictionary};
use tracing_subscriber::{fmt, EnvFilter};

/// LexiKV Server
#[derive(Parser, Debug)]
#[command(name = "lexikv-server")]
#[command(about = "Minimal flat-file dictionary server")]
#[command(version)]
struct Args {
    /// Dictionary file path
    #[arg(short, long, default_value = "./dictionary.txt")]
    store_path: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lexikv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("LexiKV Server v{}", lexikv::VERSION);
    tracing::info!("Dictionary file: {}", args.store_path);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .store_path(&args.store_path)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .build();

    // Open the dictionary service
    let dict = match Dictionary::open(config.clone()) {
        Ok(d) => Arc::new(d),
        Err(e) => {
            tracing::error!("Failed to open dictionary: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Dictionary service initialized");

    // Start server
    let mut server = match Server::new(config, dict) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
