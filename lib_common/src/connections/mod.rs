//! # Connections Module
//!
//! This module handles connections to external services that act as delivery
//! sinks for the engine.

/// Module for Redis pub/sub delivery.
pub mod pub_redis;

pub use pub_redis::RedisPublisher;
