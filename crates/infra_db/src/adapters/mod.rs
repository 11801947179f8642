//! Domain Adapters
//!
//! Implementations of domain ports on top of the PostgreSQL repositories.

pub mod billing;

pub use billing::PostgresBillingStore;
