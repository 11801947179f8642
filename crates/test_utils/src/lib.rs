//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! back office test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built billing records and reference dates
//! - `builders`: Builder patterns for billing records and subscribers
//! - `stores`: In-memory billing store with query counting and outage simulation
//! - `database`: PostgreSQL test container management
//! - `generators`: Property-based and randomized test data

pub mod fixtures;
pub mod builders;
pub mod stores;
pub mod database;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use stores::*;
pub use database::*;
pub use generators::*;
