//! TOML-based run configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::process::GasType;

/// Top-level run configuration parsed from TOML.
///
/// All fields have defaults matching the reference hydrogen-cavern study.
/// Load from TOML with [`RunConfig::from_toml_file`] or use
/// [`RunConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Source files and target key selection.
    #[serde(default)]
    pub scenario: ScenarioSection,
    /// Well-schedule generation parameters.
    #[serde(default)]
    pub schedule: ScheduleSection,
}

/// Source files and target key selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioSection {
    /// Load profile CSV from the energy-system model.
    pub load_path: String,
    /// Storage filling-level CSV with power-to-gas conversion applied.
    pub filling_level_path: String,
    /// Scenario/storage-type column consumed from both sources.
    pub target_key: String,
    /// Stored gas: `"hydrogen"` or `"methane"`.
    pub gas: String,
}

impl Default for ScenarioSection {
    fn default() -> Self {
        Self {
            load_path: "inputs/2030NEPC_DE-electricity.csv".to_string(),
            filling_level_path: "inputs/2030NEPC_filling_levels.csv".to_string(),
            target_key: "DE-hydrogen-storage".to_string(),
            gas: "hydrogen".to_string(),
        }
    }
}

/// Well-schedule generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSection {
    /// Number of wells in the storage facility (must be >= 1).
    pub well_count: usize,
    /// Minimum well bottom-hole pressure in bar (production bound).
    pub min_wbhp_bar: f64,
    /// Maximum well bottom-hole pressure in bar (injection bound).
    pub max_wbhp_bar: f64,
    /// Simulator step duration in hours (must be > 0).
    pub step_hours: f64,
    /// Output path for the SCHEDULE-section file.
    pub output_path: String,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            well_count: 21,
            min_wbhp_bar: 80.0,
            max_wbhp_bar: 130.0,
            step_hours: 1.0,
            output_path: "STORAGE_LOAD_PROFILE.INC".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"schedule.well_count"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl RunConfig {
    /// Returns the baseline configuration (the reference study parameters).
    pub fn baseline() -> Self {
        Self {
            scenario: ScenarioSection::default(),
            schedule: ScheduleSection::default(),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let sc = &self.scenario;

        if sc.load_path.is_empty() {
            errors.push(ConfigError {
                field: "scenario.load_path".into(),
                message: "must not be empty".into(),
            });
        }
        if sc.filling_level_path.is_empty() {
            errors.push(ConfigError {
                field: "scenario.filling_level_path".into(),
                message: "must not be empty".into(),
            });
        }
        if sc.target_key.is_empty() {
            errors.push(ConfigError {
                field: "scenario.target_key".into(),
                message: "must not be empty".into(),
            });
        }
        if GasType::from_name(&sc.gas).is_none() {
            errors.push(ConfigError {
                field: "scenario.gas".into(),
                message: format!("must be \"hydrogen\" or \"methane\", got \"{}\"", sc.gas),
            });
        }

        let sch = &self.schedule;
        if sch.well_count == 0 {
            errors.push(ConfigError {
                field: "schedule.well_count".into(),
                message: "must be >= 1".into(),
            });
        }
        if sch.min_wbhp_bar <= 0.0 {
            errors.push(ConfigError {
                field: "schedule.min_wbhp_bar".into(),
                message: "must be > 0".into(),
            });
        }
        if sch.max_wbhp_bar <= 0.0 {
            errors.push(ConfigError {
                field: "schedule.max_wbhp_bar".into(),
                message: "must be > 0".into(),
            });
        }
        if sch.min_wbhp_bar >= sch.max_wbhp_bar {
            errors.push(ConfigError {
                field: "schedule.min_wbhp_bar".into(),
                message: "must be < schedule.max_wbhp_bar".into(),
            });
        }
        if sch.step_hours <= 0.0 {
            errors.push(ConfigError {
                field: "schedule.step_hours".into(),
                message: "must be > 0".into(),
            });
        }
        if sch.output_path.is_empty() {
            errors.push(ConfigError {
                field: "schedule.output_path".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
