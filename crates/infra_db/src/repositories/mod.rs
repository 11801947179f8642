//! Repository implementations
//!
//! Repositories own the SQL and map between database rows and domain types.

pub mod subscriber;

pub use subscriber::SubscriberRepository;
