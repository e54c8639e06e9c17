use async_trait::async_trait;

use crate::Result;

pub mod consul;
pub mod redis;

/// Write operations the cache provisioner needs from a key value cache.
#[async_trait]
pub trait Cache {
    /// Liveness probe. Returns the round trip latency.
    async fn ping(&mut self) -> Result<chrono::Duration>;
    /// Overwrite the string value at key.
    async fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
    /// Remove key whatever its type. Returns the number of removed keys.
    async fn delete(&mut self, key: &str) -> Result<u64>;
    /// Add member to the set at key. Returns false if it was already a member.
    async fn add_to_set(&mut self, key: &str, member: &str) -> Result<bool>;
}

/// Write operation the config publisher needs from a distributed config store.
#[async_trait]
pub trait ConfigStore {
    /// Store value at key, replacing any existing value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;
}
