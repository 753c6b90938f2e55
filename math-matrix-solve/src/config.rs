//! JSON configuration for the batch driver

use crate::error::{Result, SolveError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default minimum cost one parallel task should carry
pub const DEFAULT_MIN_TASK_COST: i64 = 10_000;

/// Batch driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Run batch elements on the rayon pool when it pays off
    pub parallel: bool,
    /// Minimum estimated cost per parallel task; cheaper elements are grouped
    pub min_task_cost: i64,
    /// Verbosity level (0 = quiet, 1 = summary and failures)
    pub verbosity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_task_cost: DEFAULT_MIN_TASK_COST,
            verbosity: 0,
        }
    }
}

impl BatchConfig {
    /// Sequential configuration
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.min_task_cost <= 0 {
            return Err(SolveError::Config(format!(
                "min_task_cost must be > 0, got {}",
                self.min_task_cost
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SolveError::Config(format!("Failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SolveError::Config(format!("Failed to read file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SolveError::Config(format!("Failed to serialize: {}", e)))
    }
}
