//! Core Kernel - Foundational types and utilities for the operator back office
//!
//! This crate provides the building blocks shared by every domain and adapter crate:
//! - Subscriber identifiers (RIC) as validated value objects
//! - Clock abstractions so date-dependent logic can be driven deterministically
//! - Port error and health-check types for the ports and adapters layout

pub mod identifiers;
pub mod temporal;
pub mod ports;

pub use identifiers::{Ric, IdentifierError};
pub use temporal::{Clock, SystemClock, ManualClock};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
