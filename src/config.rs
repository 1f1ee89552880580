//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::config::field_path;
use crate::chain::evaluator::validate_inputs;
use crate::chain::stage::temperature_stage;
use crate::chain::{ArrayLosses, LossChainConfig, SystemLosses};
use crate::error::InvalidInputError;

/// Top-level scenario configuration parsed from TOML.
///
/// The `[site]` and `[losses]` sections default to the reference scenario
/// when omitted. Inside a present `[losses.array]` or `[losses.system]`
/// table every loss magnitude is required. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::reference`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Site irradiance, capacity and climate.
    #[serde(default)]
    pub site: SiteConfig,
    /// Loss-chain magnitudes.
    #[serde(default)]
    pub losses: LossChainConfig,
}

/// Site irradiance, capacity and climate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Daily global horizontal irradiance (kWh/m²/day).
    pub daily_ghi_kwh_m2: f64,
    /// Installed DC capacity (kWp).
    pub capacity_kwp: f64,
    /// Representative ambient temperature (°C).
    pub ambient_temp_c: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            daily_ghi_kwh_m2: 5.5,
            capacity_kwp: 1000.0,
            ambient_temp_c: 25.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"site.capacity_kwp"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<InvalidInputError> for ConfigError {
    fn from(err: InvalidInputError) -> Self {
        let field = match &err {
            InvalidInputError::InvalidIrradiance(_) => "site.daily_ghi_kwh_m2".to_string(),
            InvalidInputError::NonPositiveCapacity(_) => "site.capacity_kwp".to_string(),
            InvalidInputError::NonFiniteTemperature(_)
            | InvalidInputError::TemperatureOutOfRange { .. } => "site.ambient_temp_c".to_string(),
            InvalidInputError::InvalidMagnitude { field, .. } => format!("losses.{field}"),
            InvalidInputError::InvalidTemperatureCoefficient(_) => {
                "losses.array.temperature_coefficient".to_string()
            }
            InvalidInputError::InvalidReferenceTemperature(_) => {
                "losses.array.reference_temp_c".to_string()
            }
            InvalidInputError::ZeroBaseline(stage) => field_path(*stage)
                .map_or_else(|| "losses".to_string(), |f| format!("losses.{f}")),
            InvalidInputError::StageNotEditable(_) => "override".to_string(),
            InvalidInputError::MalformedConfig(_) => "losses".to_string(),
        };
        Self::new(field, err.to_string())
    }
}

impl ScenarioConfig {
    /// Returns the reference scenario: 5.5 kWh/m²/day on 1 MWp at 25 °C with
    /// the default loss set.
    pub fn reference() -> Self {
        Self {
            site: SiteConfig::default(),
            losses: LossChainConfig::default(),
        }
    }

    /// Returns the hot-climate preset: high irradiance, heavy soiling and a
    /// 35 °C ambient that turns the temperature stage into a loss.
    pub fn hot_climate() -> Self {
        Self {
            site: SiteConfig {
                daily_ghi_kwh_m2: 6.4,
                capacity_kwp: 5000.0,
                ambient_temp_c: 35.0,
            },
            losses: LossChainConfig {
                array: ArrayLosses {
                    soiling_loss: 4.0,
                    shading_loss: 1.0,
                    mismatch_loss: 1.0,
                    module_degradation_loss: 0.7,
                    temperature_coefficient: 0.38,
                    ..ArrayLosses::default()
                },
                system: SystemLosses {
                    transformer_loss: 1.0,
                    auxiliary_loss: 0.3,
                    ..SystemLosses::default()
                },
            },
        }
    }

    /// Returns the cold-climate preset: low irradiance and an 8 °C ambient
    /// that turns the temperature stage into a gain.
    pub fn cold_climate() -> Self {
        Self {
            site: SiteConfig {
                daily_ghi_kwh_m2: 2.9,
                capacity_kwp: 250.0,
                ambient_temp_c: 8.0,
            },
            losses: LossChainConfig {
                array: ArrayLosses {
                    soiling_loss: 1.0,
                    shading_loss: 2.5,
                    mismatch_loss: 0.8,
                    lid_loss: 1.5,
                    module_degradation_loss: 0.4,
                    ..ArrayLosses::default()
                },
                system: SystemLosses {
                    unavailability_loss: 2.0,
                    ..SystemLosses::default()
                },
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "hot_climate", "cold_climate"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "hot_climate" => Ok(Self::hot_climate()),
            "cold_climate" => Ok(Self::cold_climate()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown
    /// fields, or omits a required loss magnitude.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.site;

        if let Err(e) = validate_inputs(s.daily_ghi_kwh_m2, s.capacity_kwp, s.ambient_temp_c) {
            errors.push(e.into());
        }
        if let Err(e) = self.losses.validate() {
            errors.push(e.into());
        }
        if errors.is_empty() {
            if let Err(e) = temperature_stage(s.ambient_temp_c, &self.losses) {
                errors.push(e.into());
            }
        }

        errors
    }
}
