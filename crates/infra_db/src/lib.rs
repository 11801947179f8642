//! Infrastructure Database Layer
//!
//! PostgreSQL access for the back office using SQLx.
//!
//! # Architecture
//!
//! - `pool`: connection pool configuration and creation
//! - `repositories`: SQL for the subscribers table, mapped to domain types
//! - `adapters`: implementations of domain ports on top of the repositories
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, adapters::PostgresBillingStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/mobile_operator")).await?;
//! let billing = PostgresBillingStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
