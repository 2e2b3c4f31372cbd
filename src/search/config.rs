//! Configuration for the combination search.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{LightcalcError, Result};

/// Number of combinations returned when nothing else is configured.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Configuration for the combination search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Maximum number of combinations to return.
    pub max_results: usize,
    /// Segment catalog to search over.
    pub catalog: Catalog,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_results: DEFAULT_MAX_RESULTS,
            catalog: Catalog::default(),
        }
    }
}

impl SearchConfig {
    /// Default configuration over a custom catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        SearchConfig {
            catalog,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: SearchConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(LightcalcError::invalid_input(
                "max_results must be at least 1",
            ));
        }
        Ok(())
    }
}
