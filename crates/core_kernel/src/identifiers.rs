//! Strongly-typed identifiers for domain entities
//!
//! The RIC is the subscriber key shared by the relational store and the
//! report cache. Wrapping it in a newtype keeps
//! blank or padded values from leaking into queries and cache entries.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when constructing identifiers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("RIC must not be empty")]
    EmptyRic,

    #[error("RIC is too long: {len} characters (max {max})")]
    RicTooLong { len: usize, max: usize },
}

/// Subscriber identifier (RIC)
///
/// Always non-empty and trimmed. The relational column is `VARCHAR(50)`, so
/// longer values are rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ric(String);

impl Ric {
    /// Maximum length accepted by the subscribers table
    pub const MAX_LEN: usize = 50;

    /// Creates a RIC, trimming surrounding whitespace
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::EmptyRic);
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(IdentifierError::RicTooLong { len, max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Ric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ric {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Ric {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ric {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ric> for String {
    fn from(ric: Ric) -> String {
        ric.0
    }
}

// Deserialization goes through `new` so cached or wire data cannot bypass validation.
impl<'de> Deserialize<'de> for Ric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ric::new(raw).map_err(serde::de::Error::custom)
    }
}
