//! Double-array trie construction configuration.

use super::{parse_env_bool, parse_env_var, Config, ValidationError};
use crate::error::{DatrieError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on preallocated slots; the arrays still grow past it on demand.
const MAX_INITIAL_CAPACITY: usize = 1 << 28;

/// Configuration for [`DoubleArrayTrie`](crate::fsa::DoubleArrayTrie) construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieConfig {
    /// Slots preallocated in each of `base` and `check`
    pub initial_node_capacity: usize,
    /// Symbols preallocated in the tail store
    pub initial_tail_capacity: usize,
    /// Run the integrity walk when the build phase is finalized
    pub verify_on_finalize: bool,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            initial_node_capacity: 1024,
            initial_tail_capacity: 1024,
            verify_on_finalize: cfg!(debug_assertions),
        }
    }
}

impl TrieConfig {
    /// Create a configuration builder starting from the defaults.
    pub fn builder() -> TrieConfigBuilder {
        TrieConfigBuilder::new()
    }
}

impl Config for TrieConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.initial_node_capacity < 2 {
            errors.push(
                ValidationError::new(
                    "initial_node_capacity",
                    &self.initial_node_capacity.to_string(),
                    "node capacity must cover at least the root slot",
                )
                .with_suggestion("typical values: 256-65536"),
            );
        }

        if self.initial_node_capacity > MAX_INITIAL_CAPACITY {
            errors.push(ValidationError::new(
                "initial_node_capacity",
                &self.initial_node_capacity.to_string(),
                "node capacity exceeds the addressable node id range",
            ));
        }

        if self.initial_tail_capacity > MAX_INITIAL_CAPACITY {
            errors.push(ValidationError::new(
                "initial_tail_capacity",
                &self.initial_tail_capacity.to_string(),
                "tail capacity exceeds the addressable offset range",
            ));
        }

        if !errors.is_empty() {
            return Err(DatrieError::configuration(format!(
                "Configuration validation failed: {}",
                errors
                    .into_iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.initial_node_capacity = parse_env_var(
            &format!("{}TRIE_NODE_CAPACITY", prefix),
            config.initial_node_capacity,
        );
        config.initial_tail_capacity = parse_env_var(
            &format!("{}TRIE_TAIL_CAPACITY", prefix),
            config.initial_tail_capacity,
        );
        config.verify_on_finalize = parse_env_bool(
            &format!("{}TRIE_VERIFY_ON_FINALIZE", prefix),
            config.verify_on_finalize,
        );
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            initial_node_capacity: 1 << 16,
            initial_tail_capacity: 1 << 16,
            verify_on_finalize: false,
        }
    }

    fn memory_preset() -> Self {
        Self {
            initial_node_capacity: 64,
            initial_tail_capacity: 64,
            verify_on_finalize: false,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            DatrieError::configuration(format!("Failed to serialize trie config: {}", e))
        })?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            DatrieError::configuration(format!("Failed to parse trie config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for [`TrieConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrieConfigBuilder {
    config: TrieConfig,
}

impl TrieConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of preallocated node slots.
    pub fn initial_node_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_node_capacity = capacity;
        self
    }

    /// Set the number of preallocated tail symbols.
    pub fn initial_tail_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_tail_capacity = capacity;
        self
    }

    /// Enable or disable the integrity walk on finalize.
    pub fn verify_on_finalize(mut self, enabled: bool) -> Self {
        self.config.verify_on_finalize = enabled;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<TrieConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
