//! Loss-chain configuration grouped by subsystem.

use serde::{Deserialize, Serialize};

use super::stage::StageId;
use crate::error::InvalidInputError;

/// Standard test condition cell temperature (°C).
pub const STC_TEMPERATURE_C: f64 = 25.0;

fn default_reference_temp_c() -> f64 {
    STC_TEMPERATURE_C
}

/// Loss parameters for one evaluation, grouped into array-level and
/// system-level effects.
///
/// Every magnitude is a non-negative percentage. The value is immutable
/// input to an evaluation: build a variant with
/// [`LossChainConfig::with_stage_override`] instead of editing a shared one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LossChainConfig {
    /// Effects on the DC side of the array.
    pub array: ArrayLosses,
    /// Conversion and balance-of-system effects up to the grid connection.
    pub system: SystemLosses,
}

/// Array-level loss parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrayLosses {
    /// Dust and dirt on module surfaces (%).
    pub soiling_loss: f64,
    /// Near and far shading (%).
    pub shading_loss: f64,
    /// Module-to-module electrical mismatch (%).
    pub mismatch_loss: f64,
    /// Light-induced degradation during initial burn-in (%), applied once.
    pub lid_loss: f64,
    /// Annual module degradation rate (%/year), compounded by the projector.
    pub module_degradation_loss: f64,
    /// Power temperature coefficient magnitude (%/°C).
    pub temperature_coefficient: f64,
    /// Temperature at which the temperature stage is neutral (°C).
    #[serde(default = "default_reference_temp_c")]
    pub reference_temp_c: f64,
}

/// System-level loss parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemLosses {
    /// DC ohmic wiring loss (%).
    pub wiring_loss: f64,
    /// Inverter conversion loss (%).
    pub inverter_loss: f64,
    /// MV transformer loss (%).
    pub transformer_loss: f64,
    /// Auxiliary consumption (%).
    pub auxiliary_loss: f64,
    /// Plant unavailability (%).
    pub unavailability_loss: f64,
}

impl Default for ArrayLosses {
    fn default() -> Self {
        Self {
            soiling_loss: 2.0,
            shading_loss: 0.0,
            mismatch_loss: 0.0,
            lid_loss: 2.0,
            module_degradation_loss: 0.5,
            temperature_coefficient: 0.4,
            reference_temp_c: STC_TEMPERATURE_C,
        }
    }
}

impl Default for SystemLosses {
    fn default() -> Self {
        Self {
            wiring_loss: 1.5,
            inverter_loss: 2.0,
            transformer_loss: 0.0,
            auxiliary_loss: 0.0,
            unavailability_loss: 1.0,
        }
    }
}

impl Default for LossChainConfig {
    /// Reference loss set: soiling 2 %, LID 2 %, module degradation
    /// 0.5 %/year, wiring 1.5 %, inverter 2 %, unavailability 1 %.
    fn default() -> Self {
        Self {
            array: ArrayLosses::default(),
            system: SystemLosses::default(),
        }
    }
}

impl LossChainConfig {
    /// A configuration with every magnitude and the temperature coefficient at zero.
    pub fn lossless() -> Self {
        Self {
            array: ArrayLosses {
                soiling_loss: 0.0,
                shading_loss: 0.0,
                mismatch_loss: 0.0,
                lid_loss: 0.0,
                module_degradation_loss: 0.0,
                temperature_coefficient: 0.0,
                reference_temp_c: STC_TEMPERATURE_C,
            },
            system: SystemLosses {
                wiring_loss: 0.0,
                inverter_loss: 0.0,
                transformer_loss: 0.0,
                auxiliary_loss: 0.0,
                unavailability_loss: 0.0,
            },
        }
    }

    /// Parses a configuration from TOML with `[array]` and `[system]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::MalformedConfig`] when a required stage
    /// field is missing, a field is unknown, or a value has the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, InvalidInputError> {
        toml::from_str(s).map_err(|e| InvalidInputError::MalformedConfig(e.to_string()))
    }

    /// Configured magnitude for a stage, in percent.
    ///
    /// Markers and the derived temperature stage report 0.
    pub fn magnitude(&self, stage: StageId) -> f64 {
        match stage {
            StageId::Shading => self.array.shading_loss,
            StageId::Soiling => self.array.soiling_loss,
            StageId::Lid => self.array.lid_loss,
            StageId::ModuleDegradation => self.array.module_degradation_loss,
            StageId::Mismatch => self.array.mismatch_loss,
            StageId::Wiring => self.system.wiring_loss,
            StageId::Inverter => self.system.inverter_loss,
            StageId::Transformer => self.system.transformer_loss,
            StageId::Auxiliary => self.system.auxiliary_loss,
            StageId::Unavailability => self.system.unavailability_loss,
            StageId::GhiInput | StageId::Temperature | StageId::GridInjection => 0.0,
        }
    }

    fn magnitude_mut(&mut self, stage: StageId) -> Option<&mut f64> {
        match stage {
            StageId::Shading => Some(&mut self.array.shading_loss),
            StageId::Soiling => Some(&mut self.array.soiling_loss),
            StageId::Lid => Some(&mut self.array.lid_loss),
            StageId::ModuleDegradation => Some(&mut self.array.module_degradation_loss),
            StageId::Mismatch => Some(&mut self.array.mismatch_loss),
            StageId::Wiring => Some(&mut self.system.wiring_loss),
            StageId::Inverter => Some(&mut self.system.inverter_loss),
            StageId::Transformer => Some(&mut self.system.transformer_loss),
            StageId::Auxiliary => Some(&mut self.system.auxiliary_loss),
            StageId::Unavailability => Some(&mut self.system.unavailability_loss),
            StageId::GhiInput | StageId::Temperature | StageId::GridInjection => None,
        }
    }

    /// Returns a copy of this configuration with one stage's magnitude replaced.
    ///
    /// This is how an edited waterfall is recomputed: the caller keeps its
    /// current config, derives a new one here, and evaluates again.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::StageNotEditable`] for markers and the
    /// temperature stage, and [`InvalidInputError::InvalidMagnitude`] when
    /// `magnitude_percent` is outside `[0, 100]`.
    pub fn with_stage_override(
        &self,
        stage: StageId,
        magnitude_percent: f64,
    ) -> Result<Self, InvalidInputError> {
        let mut next = self.clone();
        let field = field_path(stage).ok_or(InvalidInputError::StageNotEditable(stage))?;
        check_magnitude(field, magnitude_percent)?;
        let slot = next
            .magnitude_mut(stage)
            .ok_or(InvalidInputError::StageNotEditable(stage))?;
        *slot = magnitude_percent;
        Ok(next)
    }

    /// Checks every magnitude and the temperature parameters.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in canonical stage order.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        for stage in StageId::CANONICAL_ORDER {
            if let Some(field) = field_path(stage) {
                check_magnitude(field, self.magnitude(stage))?;
            }
        }

        let coefficient = self.array.temperature_coefficient;
        if !coefficient.is_finite() || coefficient < 0.0 {
            return Err(InvalidInputError::InvalidTemperatureCoefficient(coefficient));
        }
        if !self.array.reference_temp_c.is_finite() {
            return Err(InvalidInputError::InvalidReferenceTemperature(
                self.array.reference_temp_c,
            ));
        }
        Ok(())
    }
}

/// Dotted configuration path of a configurable stage.
pub fn field_path(stage: StageId) -> Option<&'static str> {
    match stage {
        StageId::Shading => Some("array.shading_loss"),
        StageId::Soiling => Some("array.soiling_loss"),
        StageId::Lid => Some("array.lid_loss"),
        StageId::ModuleDegradation => Some("array.module_degradation_loss"),
        StageId::Mismatch => Some("array.mismatch_loss"),
        StageId::Wiring => Some("system.wiring_loss"),
        StageId::Inverter => Some("system.inverter_loss"),
        StageId::Transformer => Some("system.transformer_loss"),
        StageId::Auxiliary => Some("system.auxiliary_loss"),
        StageId::Unavailability => Some("system.unavailability_loss"),
        StageId::GhiInput | StageId::Temperature | StageId::GridInjection => None,
    }
}

fn check_magnitude(field: &'static str, value: f64) -> Result<(), InvalidInputError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(InvalidInputError::InvalidMagnitude { field, value })
    }
}
