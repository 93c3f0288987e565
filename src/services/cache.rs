use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// Implements L1 (in-memory) and L2 (Redis) caching. L1 is fastest but local
/// to one instance, L2 is shared across instances. Redis is optional: when it
/// is unreachable the manager degrades to L1-only — a stale or missing denied
/// set only means a denied pet is re-filtered at the database instead.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager, connecting to Redis when a URL is given
    pub async fn new(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Self {
        let redis = match redis_url {
            Some(url) => match Self::connect(url).await {
                Ok(manager) => {
                    tracing::info!("Redis L2 cache connected");
                    Some(Arc::new(tokio::sync::Mutex::new(manager)))
                }
                Err(e) => {
                    tracing::warn!("Redis unavailable ({}), running with L1 cache only", e);
                    None
                }
            },
            None => None,
        };

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis,
            l1_cache,
            ttl_secs,
        }
    }

    async fn connect(redis_url: &str) -> Result<ConnectionManager, CacheError> {
        let client = redis::Client::open(redis_url)?;
        Ok(ConnectionManager::new(client).await?)
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                let bytes = json.as_bytes().to_vec();
                self.l1_cache.insert(key.to_string(), bytes).await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both tiers when Redis is up)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        // L1 uses the configured TTL
        let bytes = json.as_bytes().to_vec();
        self.l1_cache.insert(key.to_string(), bytes).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            redis::cmd("DEL").arg(key).query_async::<()>(&mut *conn).await?;
        }

        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for an adopter's denied-pet set
    pub fn denied_set(adopter_id: Uuid) -> String {
        format!("denied:{}", adopter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_l1_only_set_get_delete() {
        let cache = CacheManager::new(None, 100, 60).await;

        let key = CacheKey::denied_set(Uuid::nil());
        let denied = vec![Uuid::new_v4(), Uuid::new_v4()];

        cache.set(&key, &denied).await.unwrap();
        let cached: Vec<Uuid> = cache.get(&key).await.unwrap();
        assert_eq!(cached, denied);

        cache.delete(&key).await.unwrap();
        assert!(matches!(
            cache.get::<Vec<Uuid>>(&key).await,
            Err(CacheError::CacheMiss(_))
        ));
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_two_tier_set_get() {
        let cache = CacheManager::new(Some("redis://127.0.0.1:6379"), 1000, 60).await;

        let key = "test_key";
        let value = "test_value";

        cache.set(key, &value).await.unwrap();
        let result: String = cache.get(key).await.unwrap();
        assert_eq!(result, value);

        cache.delete(key).await.unwrap();
        assert!(cache.get::<String>(key).await.is_err());
    }

    #[test]
    fn test_cache_key_builder() {
        let id = Uuid::nil();
        assert_eq!(
            CacheKey::denied_set(id),
            format!("denied:{}", id)
        );
    }
}
