//! Redis-backed Key Lookup
//!
//! The name→address mapping lives in Redis; this crate only performs point
//! GETs and never writes. [`redis::aio::ConnectionManager`] multiplexes one
//! connection, handles reconnects, and is cheap to clone, so a single store
//! handle is shared across all request tasks.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::KeyLookup;

/// Key lookup over a Redis connection fixed at startup
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis instance at `url`.
    ///
    /// Connection parameters (address, credentials, database index) are all
    /// carried in the URL and fixed for the process lifetime.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("📦 Connected to key-value store at {url}");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyLookup for RedisStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}
