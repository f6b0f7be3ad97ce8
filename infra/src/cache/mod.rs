//! Redis cache implementations

pub mod redis_client;

pub use redis_client::RedisClient;
