// src/cart_cache.rs
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::errors::AppError;
use crate::models::ShoppingCart;

/// Carts expire this long after their last upsert.
pub const CART_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Key-value store with per-key expiry holding serialized carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<(), AppError>;

    /// `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
}

#[derive(Clone)]
pub struct RedisCartStore {
    conn: ConnectionManager,
}

impl RedisCartStore {
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CartStore for RedisCartStore {
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}

#[derive(Clone)]
struct StoredValue {
    payload: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    // An overwrite restarts the clock.
    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cart store, used when no Redis is configured.
#[derive(Clone)]
pub struct MemoryCartStore {
    cache: Cache<String, StoredValue>,
}

impl MemoryCartStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MemoryCartStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<(), AppError> {
        self.cache
            .insert(key.to_string(), StoredValue { payload: value, ttl })
            .await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.cache.get(key).await.map(|stored| stored.payload))
    }
}

/// Upsert and lookup of whole carts, keyed by IP address.
#[derive(Clone)]
pub struct CartCache {
    store: Arc<dyn CartStore>,
}

impl CartCache {
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self { store }
    }

    /// Replaces whatever is stored under `cart.ip_address` and resets its TTL.
    pub async fn upsert(&self, cart: ShoppingCart) -> Result<ShoppingCart, AppError> {
        let payload = serde_json::to_string(&cart)?;
        self.store
            .set_with_ttl(&cart.ip_address, payload, CART_TTL)
            .await?;
        tracing::debug!("Stored cart for {}", cart.ip_address);
        Ok(cart)
    }

    pub async fn get(&self, key: &str) -> Result<ShoppingCart, AppError> {
        let payload = match self.store.get(key).await? {
            Some(payload) => payload,
            None => {
                tracing::debug!("No cart stored for {}", key);
                return Err(AppError::NotFound("Shopping cart not found"));
            }
        };
        let cart = serde_json::from_str(&payload)?;
        Ok(cart)
    }
}
