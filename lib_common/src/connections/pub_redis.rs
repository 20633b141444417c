//! # Redis Publish Sink
//!
//! Delivers every payload with a Redis `PUBLISH` on one channel. A delivery is
//! complete once the server replies with the number of subscribers that
//! received it; zero subscribers is still a successful hand-off.
//!
//! Connection loss is surfaced as a sink error on the next publish. There is
//! no reconnect or retry here.

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisResult};

use crate::core::{BoxError, PublishSink};

/// A [`PublishSink`] backed by Redis pub/sub.
pub struct RedisPublisher {
    /// The shared, pipelined connection.
    conn: MultiplexedConnection,
    /// Channel every payload is published on.
    channel: String,
    /// Payloads acknowledged so far.
    published: u64,
}

impl RedisPublisher {
    /// Opens a connection to `url` (e.g. "redis://127.0.0.1/") for publishing on `channel`.
    pub async fn connect(url: &str, channel: &str) -> RedisResult<Self> {
        // Open the client and establish a multiplexed async connection
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        log::info!("Connected to Redis, publishing on channel '{}'", channel);
        Ok(Self {
            conn,
            channel: channel.to_string(),
            published: 0,
        })
    }

    /// The channel payloads go to.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Payloads acknowledged by the server.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl PublishSink for RedisPublisher {
    async fn publish(&mut self, payload: &str) -> Result<(), BoxError> {
        let receivers: i64 = self.conn.publish(&self.channel, payload).await?;
        self.published += 1;
        log::trace!(
            "Published {} bytes on '{}' to {} subscriber(s)",
            payload.len(),
            self.channel,
            receivers
        );
        Ok(())
    }
}
