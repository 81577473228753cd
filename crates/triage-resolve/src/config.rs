//! Resolver configuration

use crate::error::ConfigError;
use serde::Deserialize;

/// Default ceiling on tree depth
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Default number of cached roots
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// Tree resolver configuration
///
/// Parsed from a flat TOML table; every field is optional.
///
/// ```toml
/// max_depth = 12
/// cache_capacity = 256
/// unique_sibling_titles = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Deepest level an expansion may reach before failing
    pub max_depth: usize,
    /// Maximum number of resolved roots kept in the cache
    pub cache_capacity: u64,
    /// Reject trees where two siblings share a title
    pub unique_sibling_titles: bool,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With depth ceiling
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With sibling title uniqueness check
    #[inline]
    #[must_use]
    pub fn with_unique_sibling_titles(mut self, enforce: bool) -> Self {
        self.unique_sibling_titles = enforce;
        self
    }

    /// Parse and validate configuration from TOML
    ///
    /// # Errors
    /// Returns an error for malformed TOML, unknown keys or out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns the first out-of-range value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                reason: "must be at least 1".into(),
            });
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_capacity",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            unique_sibling_titles: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.cache_capacity, 1024);
        assert!(config.unique_sibling_titles);
    }

    #[test]
    fn parses_partial_toml() {
        let config = ResolverConfig::from_toml_str("max_depth = 8").unwrap();
        assert_eq!(config, ResolverConfig::new().with_max_depth(8));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ResolverConfig::from_toml_str("").unwrap(), ResolverConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ResolverConfig::from_toml_str("max_depth = 0"),
            Err(ConfigError::Invalid { field: "max_depth", .. })
        ));
        assert!(matches!(
            ResolverConfig::from_toml_str("cache_capacity = 0"),
            Err(ConfigError::Invalid { field: "cache_capacity", .. })
        ));
        assert!(matches!(
            ResolverConfig::from_toml_str("max_depht = 3"),
            Err(ConfigError::Toml(_))
        ));
    }
}
