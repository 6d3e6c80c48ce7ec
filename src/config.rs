//! Pipeline configuration file support.
//!
//! This module provides utilities for reading synthesis pipeline tuning
//! knobs from TOML configuration files. Every knob has a default, so an
//! absent file or an empty table yields a working configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SynthesisError;

/// Tuning knobs for the synthesis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Candidates kept per category after ranking.
    #[serde(default = "default_top_n_per_category")]
    pub top_n_per_category: usize,
    /// Pool fetch size as a multiple of `top_n_per_category`.
    #[serde(default = "default_pool_fetch_multiplier")]
    pub pool_fetch_multiplier: usize,
    /// Hard cap on committed entries per time block.
    #[serde(default = "default_max_places_per_block")]
    pub max_places_per_block: usize,
    /// User selections placed before the round-robin day advances.
    #[serde(default = "default_selections_per_day")]
    pub selections_per_day: usize,
    /// Filler candidates appended per open time block.
    #[serde(default = "default_ai_candidates_per_block")]
    pub ai_candidates_per_block: usize,
    /// Target cluster size when splitting a day's places geographically.
    #[serde(default = "default_places_per_cluster")]
    pub places_per_cluster: usize,
    /// Assumed travel speed for leg duration estimates.
    #[serde(default = "default_average_speed_kmh")]
    pub average_speed_kmh: f64,
}

fn default_top_n_per_category() -> usize {
    10
}

fn default_pool_fetch_multiplier() -> usize {
    3
}

fn default_max_places_per_block() -> usize {
    2
}

fn default_selections_per_day() -> usize {
    6
}

fn default_ai_candidates_per_block() -> usize {
    5
}

fn default_places_per_cluster() -> usize {
    4
}

fn default_average_speed_kmh() -> f64 {
    30.0
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            top_n_per_category: default_top_n_per_category(),
            pool_fetch_multiplier: default_pool_fetch_multiplier(),
            max_places_per_block: default_max_places_per_block(),
            selections_per_day: default_selections_per_day(),
            ai_candidates_per_block: default_ai_candidates_per_block(),
            places_per_cluster: default_places_per_cluster(),
            average_speed_kmh: default_average_speed_kmh(),
        }
    }
}

impl SynthesisConfig {
    /// Load pipeline configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SynthesisConfig)` if successful
    /// * `Err(SynthesisError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SynthesisError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SynthesisError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: SynthesisConfig = toml::from_str(&content).map_err(|e| {
            SynthesisError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load pipeline configuration from the default location.
    ///
    /// Searches for `tripsmith.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(SynthesisConfig)` if found and parsed successfully
    /// * `Err(SynthesisError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, SynthesisError> {
        let search_paths = vec![
            PathBuf::from("tripsmith.toml"),
            PathBuf::from("config/tripsmith.toml"),
            PathBuf::from("../tripsmith.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(SynthesisError::configuration(
            "No tripsmith.toml found in standard locations".to_string(),
        ))
    }

    /// Check the knobs for values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if self.top_n_per_category == 0 {
            return Err(SynthesisError::configuration(
                "top_n_per_category must be at least 1",
            ));
        }
        if self.pool_fetch_multiplier == 0 {
            return Err(SynthesisError::configuration(
                "pool_fetch_multiplier must be at least 1",
            ));
        }
        if self.max_places_per_block == 0 {
            return Err(SynthesisError::configuration(
                "max_places_per_block must be at least 1",
            ));
        }
        if self.selections_per_day == 0 {
            return Err(SynthesisError::configuration(
                "selections_per_day must be at least 1",
            ));
        }
        if self.places_per_cluster == 0 {
            return Err(SynthesisError::configuration(
                "places_per_cluster must be at least 1",
            ));
        }
        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh < 0.0 {
            return Err(SynthesisError::configuration(
                "average_speed_kmh must be a non-negative finite number",
            ));
        }
        Ok(())
    }

    /// Pool fetch limit for one category query.
    pub fn fetch_limit(&self) -> usize {
        self.top_n_per_category * self.pool_fetch_multiplier
    }
}
