//! Cache Infrastructure Layer
//!
//! Redis implementation of `CacheStorePort`. Every command runs on a
//! multiplexed connection under a per-command timeout, and list replacement
//! goes through a single `MULTI`/`EXEC` pipeline.

pub mod error;
pub mod redis_store;

pub use error::CacheError;
pub use redis_store::{RedisCacheConfig, RedisCacheStore};
