//! kvdns — Minimal Authoritative DNS Responder
//!
//! Serves A and AAAA records over UDP out of an external Redis key-value
//! store. Each stored entry maps a domain name to an IP address literal;
//! the `ip4`/`ip6` substring in a name selects which record types it
//! answers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         KVDNS                            │
//! ├──────────────────────────────────────────────────────────┤
//! │  UDP Dispatcher (1053)  ←── one task per datagram        │
//! │  Wire Codec             ←── RFC 1035 encode/decode       │
//! │  Resolver               ←── point lookups, ip4/ip6 rule  │
//! │  Redis Store            ←── name → address mapping       │
//! └──────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod resolver;
mod server;
mod wire;

use config::ServerConfig;
use resolver::{RedisStore, Resolver};

/// kvdns - authoritative DNS responder backed by Redis
#[derive(Parser, Debug)]
#[command(name = "kvdns")]
#[command(version)]
#[command(about = "Minimal authoritative DNS responder backed by Redis", long_about = None)]
struct Args {
    /// UDP port to listen on (default 1053)
    #[arg(long)]
    port: Option<String>,

    /// Record TTL in seconds (default 1800)
    #[arg(long)]
    expiry: Option<u32>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Redis connection URL
    #[arg(long)]
    redis_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .init();

    info!("🌐 kvdns v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    // Override config with CLI args
    let config = config
        .with_port(args.port)
        .with_expiry(args.expiry)
        .with_redis_url(args.redis_url);

    config.validate()?;

    info!("⚙️  Configuration:");
    info!("   Port: {}", config.port);
    info!("   Record TTL: {}s", config.expiry_secs);
    info!("   Redis: {}", config.redis_url);
    info!("   Max in-flight requests: {}", config.max_inflight);

    // Resolve and bind the listen address; failures here are fatal
    let bind = config.bind_addr();
    let addr = match tokio::net::lookup_host(&bind).await {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => addr,
            None => {
                error!("Listen address {bind} resolved to nothing");
                std::process::exit(1);
            }
        },
        Err(err) => {
            error!("Error resolving listen address {bind}: {err}");
            std::process::exit(1);
        }
    };

    let socket = match tokio::net::UdpSocket::bind(addr).await {
        Ok(socket) => socket,
        Err(err) => {
            error!("Error binding {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!("🌐 Listening at {addr}");

    let store = RedisStore::connect(&config.redis_url).await?;
    let resolver = Resolver::new(Arc::new(store), config.expiry_secs);

    // Runs until terminated externally
    server::run_server(socket, resolver, Arc::new(config)).await
}
