//! Error types.

use std::collections::TryReserveError;
use thiserror::Error;

/// Storage for a copied key or value could not be obtained.
///
/// Returned by `ChainMap::insert`; the map is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to allocate {what} for new entry")]
pub struct AllocationError {
    what: &'static str,
    #[source]
    source: TryReserveError,
}

impl AllocationError {
    pub(crate) fn new(what: &'static str, source: TryReserveError) -> Self {
        Self { what, source }
    }

    /// Which part of the entry failed to allocate (`"key"` or `"value"`).
    pub fn what(&self) -> &'static str {
        self.what
    }
}

/// Rejected map configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A map needs at least one bucket.
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,

    #[error("resize threshold must be a positive finite number, got {0}")]
    InvalidThreshold(f64),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Text that names neither duplicate-key policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown duplicate-key policy {0:?}, expected \"shadow\" or \"replace\"")]
pub struct ParseDuplicateKeysError(pub(crate) String);
