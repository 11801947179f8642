//! Request handlers

pub mod debtors;
pub mod health;
