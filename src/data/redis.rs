use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError};

use crate::config::RedisConfig;

/// Handle to the redis server used as a shared key-value cache between bot instances.
///
/// Wraps a multiplexed connection, which is cheap to clone and safe to use from many tasks
/// at once.
#[derive(Clone)]
pub struct RedisConnection {
    conn: MultiplexedConnection,
}

impl RedisConnection {
    /// Opens a connection to the server described by the `[redis]` config section.
    pub async fn connect(config: &RedisConfig) -> Result<Self, RedisError> {
        let client = Client::open(config.connection_url())?;
        let conn = client.get_multiplexed_async_connection().await?;

        Ok(Self { conn })
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RedisError> {
        let mut conn = self.conn.clone();
        conn.get(key).await
    }

    /// Stores `value` under `key`, expiring after `expiry_secs` when given.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        expiry_secs: Option<u64>,
    ) -> Result<(), RedisError> {
        let mut conn = self.conn.clone();
        match expiry_secs {
            Some(seconds) => conn.set_ex(key, value, seconds).await,
            None => conn.set(key, value).await,
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), RedisError> {
        let mut conn = self.conn.clone();
        conn.del(key).await
    }

    /// Publishes `message` on a pub/sub channel, returning how many subscribers got it.
    pub async fn publish(&self, channel: &str, message: &str) -> Result<i64, RedisError> {
        let mut conn = self.conn.clone();
        conn.publish(channel, message).await
    }
}
