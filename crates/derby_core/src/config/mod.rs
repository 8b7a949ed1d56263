//! # Derby configuration
//!
//! Gameplay tuning lives in one YAML document with three sections:
//!
//! ```yaml
//! simulation:
//!   perturbation: 0.15
//!   incident:
//!     base_chance: 0.02
//! progression:
//!   max_age: 20
//! betting:
//!   house_edge: 0.1
//! ```
//!
//! Missing sections and fields fall back to defaults. `DERBY_CONFIG_PATH`
//! points at an override file for deployments.

pub mod params;

pub use params::{
    BettingParams, IncidentModel, MoraleParams, NewcomerParams, ProgressionPolicy,
    SimulationParams,
};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "DERBY_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerbyConfig {
    #[serde(default)]
    pub simulation: SimulationParams,
    #[serde(default)]
    pub progression: ProgressionPolicy,
    #[serde(default)]
    pub betting: BettingParams,
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be 0.0-1.0, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be >= 0, got {}",
            name, value
        )));
    }
    Ok(())
}

impl DerbyConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: DerbyConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load from `DERBY_CONFIG_PATH` if set and non-empty, otherwise defaults.
    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        tracing::debug!(path, "loading derby config from {}", CONFIG_PATH_ENV);
        Self::load(path)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate parameter bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;

        let prog = &self.progression;
        if prog.min_roster_size < 2 {
            return Err(ConfigError::Validation(format!(
                "progression.min_roster_size must be >= 2, got {}",
                prog.min_roster_size
            )));
        }
        if prog.review_window == 0 || prog.min_races_for_review > prog.review_window {
            return Err(ConfigError::Validation(format!(
                "progression.min_races_for_review ({}) must be 1..=review_window ({})",
                prog.min_races_for_review, prog.review_window
            )));
        }
        if prog.min_races_for_review == 0 {
            return Err(ConfigError::Validation(
                "progression.min_races_for_review must be >= 1".to_string(),
            ));
        }
        check_unit("progression.placement_floor", prog.placement_floor as f64)?;
        check_unit("progression.retirement_chance", prog.retirement_chance)?;
        if prog.place_positions == 0 {
            return Err(ConfigError::Validation(
                "progression.place_positions must be >= 1".to_string(),
            ));
        }
        check_unit("progression.morale.win_boost", prog.morale.win_boost as f64)?;
        check_unit("progression.morale.place_boost", prog.morale.place_boost as f64)?;
        check_unit(
            "progression.morale.poor_finish_penalty",
            prog.morale.poor_finish_penalty as f64,
        )?;
        check_unit("progression.morale.decay", prog.morale.decay as f64)?;

        let nc = &prog.newcomer;
        if nc.min > nc.max || nc.max > 100 {
            return Err(ConfigError::Validation(format!(
                "progression.newcomer range must satisfy min <= max <= 100, got {}..={}",
                nc.min, nc.max
            )));
        }
        check_non_negative("progression.newcomer.spread", nc.spread)?;
        check_non_negative("progression.newcomer.mean", nc.mean)?;
        check_unit("progression.newcomer.league_bias", nc.league_bias)?;

        let bet = &self.betting;
        if !(0.0..1.0).contains(&bet.house_edge) {
            return Err(ConfigError::Validation(format!(
                "betting.house_edge must be in [0.0, 1.0), got {}",
                bet.house_edge
            )));
        }
        if bet.place_positions == 0 {
            return Err(ConfigError::Validation(
                "betting.place_positions must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DerbyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = DerbyConfig::from_yaml(
            r#"
simulation:
  incident:
    deficit_slope: 0.01
progression:
  max_age: 12
"#,
        )
        .unwrap();

        assert_eq!(config.simulation.incident.deficit_slope, 0.01);
        assert_eq!(config.simulation.incident.base_chance, 0.02);
        assert_eq!(config.simulation.perturbation, 0.15);
        assert_eq!(config.progression.max_age, 12);
        assert_eq!(config.progression.min_roster_size, 2);
        assert_eq!(config.betting.default_wallet, 100);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = DerbyConfig::from_yaml("{}").unwrap();
        assert_eq!(config, DerbyConfig::default());
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let err = DerbyConfig::from_yaml("betting:\n  house_edge: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = DerbyConfig::from_yaml("progression:\n  min_roster_size: 1\n").unwrap_err();
        assert!(err.to_string().contains("min_roster_size"));

        let err = DerbyConfig::from_yaml(
            "progression:\n  newcomer:\n    min: 90\n    max: 40\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("newcomer"));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = DerbyConfig::from_yaml("simulation: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file_round_trip() {
        let mut config = DerbyConfig::default();
        config.progression.max_age = 7;
        config.betting.house_edge = 0.2;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = DerbyConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_path_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"progression:\n  max_age: 9\nbetting:\n  house_edge: 0.25\n")
            .unwrap();

        env::set_var(CONFIG_PATH_ENV, file.path());
        let loaded = DerbyConfig::from_env_or_default();
        env::set_var(CONFIG_PATH_ENV, "  ");
        let blank = DerbyConfig::from_env_or_default();
        env::remove_var(CONFIG_PATH_ENV);

        let loaded = loaded.unwrap();
        assert_eq!(loaded.progression.max_age, 9);
        assert_eq!(loaded.betting.house_edge, 0.25);
        assert_eq!(loaded.simulation, SimulationParams::default());
        assert_eq!(blank.unwrap(), DerbyConfig::default());
        assert_eq!(DerbyConfig::from_env_or_default().unwrap(), DerbyConfig::default());
    }

    #[test]
    fn test_simulation_section_rejects_nan() {
        let params = SimulationParams {
            morale_weight: f64::NAN,
            ..SimulationParams::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("simulation.morale_weight"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DerbyConfig::load("/nonexistent/derby.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
