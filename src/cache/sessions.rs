use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::cache::CacheService;
use crate::models::Session;

/// Cache key of one credential pair. The password only appears as a digest.
pub fn session_key(email: &str, password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("session:{}:{}", email, hex)
}

/// `KEYS` pattern matching every cached session of `email` and nothing else.
pub fn sessions_pattern(email: &str) -> String {
    let mut escaped = String::with_capacity(email.len());
    for c in email.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("session:{}:*", escaped)
}

impl CacheService {
    pub async fn cache_session(
        &self,
        email: &str,
        password: &str,
        session: &Session,
    ) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(session).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(session_key(email, password), data, self.session_ttl_seconds)
            .await
    }

    pub async fn get_cached_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(session_key(email, password)).await?;
        data.map(|d| {
            serde_json::from_str(&d).map_err(|_| {
                redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
            })
        })
        .transpose()
    }

    /// Drops every cached session of `email` (logout).
    pub async fn invalidate_sessions(&self, email: &str) -> Result<usize, redis::RedisError> {
        let pattern = sessions_pattern(email);
        let mut conn = self.redis.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await?;
        let count = keys.len();
        if !keys.is_empty() {
            let _: () = conn.del(keys).await?;
        }
        info!("Invalidated {} cached sessions for {}", count, email);
        Ok(count)
    }
}
