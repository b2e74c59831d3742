//! Map configuration: initial bucket count, caller-side resize threshold and
//! duplicate-key policy.

use crate::error::{ConfigError, ParseDuplicateKeysError};
use std::env;
use std::str::FromStr;

/// Bucket count used by `ChainMap::new`.
pub const DEFAULT_CAPACITY: usize = 100;

/// Load factor above which `ChainMap::needs_resize` reports true.
pub const DEFAULT_RESIZE_THRESHOLD: f64 = 0.7;

pub const ENV_CAPACITY: &str = "CHAIN_MAP_CAPACITY";
pub const ENV_RESIZE_THRESHOLD: &str = "CHAIN_MAP_RESIZE_THRESHOLD";
pub const ENV_DUPLICATES: &str = "CHAIN_MAP_DUPLICATES";

/// What `insert` does when the key is already present.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DuplicateKeys {
    /// Push a new head entry; the older entry stays, counted but hidden from
    /// lookup until the newer one is removed.
    #[default]
    Shadow,
    /// Overwrite the value of the existing entry in place.
    Replace,
}

impl FromStr for DuplicateKeys {
    type Err = ParseDuplicateKeysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shadow" => Ok(DuplicateKeys::Shadow),
            "replace" => Ok(DuplicateKeys::Replace),
            _ => Err(ParseDuplicateKeysError(s.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub initial_capacity: usize,
    pub resize_threshold: f64,
    pub duplicates: DuplicateKeys,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            resize_threshold: DEFAULT_RESIZE_THRESHOLD,
            duplicates: DuplicateKeys::Shadow,
        }
    }
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn resize_threshold(mut self, threshold: f64) -> Self {
        self.resize_threshold = threshold;
        self
    }

    pub fn duplicates(mut self, policy: DuplicateKeys) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.resize_threshold.is_finite() || self.resize_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.resize_threshold));
        }
        Ok(())
    }

    /// Defaults overridden by `CHAIN_MAP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_CAPACITY) {
            cfg.initial_capacity = parse_var(ENV_CAPACITY, v)?;
        }
        if let Some(v) = lookup(ENV_RESIZE_THRESHOLD) {
            cfg.resize_threshold = parse_var(ENV_RESIZE_THRESHOLD, v)?;
        }
        if let Some(v) = lookup(ENV_DUPLICATES) {
            cfg.duplicates = parse_var(ENV_DUPLICATES, v)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}
