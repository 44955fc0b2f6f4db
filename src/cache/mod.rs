use redis::{aio::MultiplexedConnection, Client};
use tracing::info;

pub mod sessions;

#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    pub async fn new(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(RedisClient { conn })
    }
}

/// Redis-backed cache of verified sessions, so bcrypt only runs on a miss.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    session_ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, session_ttl_seconds: u64) -> Self {
        info!("Session cache enabled, ttl {}s", session_ttl_seconds);
        Self { redis, session_ttl_seconds }
    }
}
