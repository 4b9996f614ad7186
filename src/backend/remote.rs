use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::backend::{Backend, BackendError};

/// A store backed by a Redis compatible server (Redis, Valkey).
///
/// One multiplexed connection is shared by every client connection of this server. It is cloned
/// per call, which is cheap and lets requests from different clients be pipelined over the same
/// socket without any locking on our side.
#[derive(Clone)]
pub struct RedisStore {
    url: String,
    connection: MultiplexedConnection,
    scan_batch: usize,
}

impl RedisStore {
    pub async fn connect(url: &str, scan_batch: usize) -> Result<Self, BackendError> {
        let client = Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        info!("Connected to {}", url);

        Ok(Self {
            url: url.to_string(),
            connection,
            scan_batch: scan_batch.max(1),
        })
    }

    fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

impl Backend for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let value: Option<String> = self.connection().get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<bool, BackendError> {
        let reply: String = self.connection().set(key, value).await?;
        Ok(reply == "OK")
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        let removed: u64 = self.connection().del(key).await?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> Result<(), BackendError> {
        redis::cmd("FLUSHDB")
            .query_async::<_, ()>(&mut self.connection())
            .await?;
        Ok(())
    }

    async fn scan(&self, cursor: u64) -> Result<(u64, Vec<String>), BackendError> {
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("COUNT")
            .arg(self.scan_batch)
            .query_async(&mut self.connection())
            .await?;
        Ok((next, keys))
    }

    async fn len(&self) -> Result<u64, BackendError> {
        let size: u64 = redis::cmd("DBSIZE")
            .query_async(&mut self.connection())
            .await?;
        Ok(size)
    }

    async fn ping(&self) -> Result<String, BackendError> {
        let reply: String = redis::cmd("PING")
            .query_async(&mut self.connection())
            .await?;
        Ok(reply)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
