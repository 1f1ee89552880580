//! Stage identities and the canonical ordering of the loss chain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::LossChainConfig;
use crate::error::InvalidInputError;

/// Identity of one step in the loss chain.
///
/// Variants are declared in chain order, so the derived `Ord` matches
/// [`StageId::CANONICAL_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// Starting marker carrying the irradiance-driven potential energy.
    GhiInput,
    Shading,
    Soiling,
    /// Derived from ambient temperature; may be a loss or a gain.
    Temperature,
    Lid,
    ModuleDegradation,
    Mismatch,
    Wiring,
    Inverter,
    Transformer,
    Auxiliary,
    Unavailability,
    /// Terminal marker carrying the grid-injected energy.
    GridInjection,
}

impl StageId {
    /// Fixed order in which stages are applied: irradiance, array-level
    /// effects, DC-to-AC conversion, system-level effects, grid injection.
    pub const CANONICAL_ORDER: [StageId; 13] = [
        StageId::GhiInput,
        StageId::Shading,
        StageId::Soiling,
        StageId::Temperature,
        StageId::Lid,
        StageId::ModuleDegradation,
        StageId::Mismatch,
        StageId::Wiring,
        StageId::Inverter,
        StageId::Transformer,
        StageId::Auxiliary,
        StageId::Unavailability,
        StageId::GridInjection,
    ];

    /// Display label used by waterfall charts and reports.
    pub fn name(self) -> &'static str {
        match self {
            StageId::GhiInput => "GHI Input",
            StageId::Shading => "Shading",
            StageId::Soiling => "Soiling",
            StageId::Temperature => "Temperature",
            StageId::Lid => "LID",
            StageId::ModuleDegradation => "Module Degradation",
            StageId::Mismatch => "Mismatch",
            StageId::Wiring => "Wiring",
            StageId::Inverter => "Inverter",
            StageId::Transformer => "Transformer",
            StageId::Auxiliary => "Auxiliary",
            StageId::Unavailability => "Unavailability",
            StageId::GridInjection => "E_grid",
        }
    }

    /// Configuration key (snake_case), as accepted by [`FromStr`].
    pub fn key(self) -> &'static str {
        match self {
            StageId::GhiInput => "ghi_input",
            StageId::Shading => "shading",
            StageId::Soiling => "soiling",
            StageId::Temperature => "temperature",
            StageId::Lid => "lid",
            StageId::ModuleDegradation => "module_degradation",
            StageId::Mismatch => "mismatch",
            StageId::Wiring => "wiring",
            StageId::Inverter => "inverter",
            StageId::Transformer => "transformer",
            StageId::Auxiliary => "auxiliary",
            StageId::Unavailability => "unavailability",
            StageId::GridInjection => "grid_injection",
        }
    }

    /// Whether the stage is a first/last marker rather than an applied effect.
    pub fn is_marker(self) -> bool {
        matches!(self, StageId::GhiInput | StageId::GridInjection)
    }

    /// Whether the stage magnitude comes straight from configuration and can
    /// therefore be overridden.
    pub fn is_configurable(self) -> bool {
        !self.is_marker() && self != StageId::Temperature
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        StageId::CANONICAL_ORDER
            .into_iter()
            .find(|id| id.key() == wanted)
            .ok_or_else(|| {
                let keys: Vec<&str> = StageId::CANONICAL_ORDER.iter().map(|id| id.key()).collect();
                format!("unknown stage \"{s}\", expected one of: {}", keys.join(", "))
            })
    }
}

/// Direction in which a stage moves the running energy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Loss,
    Gain,
}

impl StageKind {
    /// Applies `magnitude_percent` multiplicatively to `energy_kwh`.
    pub fn apply(self, energy_kwh: f64, magnitude_percent: f64) -> f64 {
        match self {
            StageKind::Loss => energy_kwh * (1.0 - magnitude_percent / 100.0),
            StageKind::Gain => energy_kwh * (1.0 + magnitude_percent / 100.0),
        }
    }
}

/// One resolved step of the chain: identity, direction and magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossStage {
    pub id: StageId,
    pub kind: StageKind,
    /// Non-negative magnitude in percent.
    pub magnitude_percent: f64,
}

impl LossStage {
    pub fn loss(id: StageId, magnitude_percent: f64) -> Self {
        Self {
            id,
            kind: StageKind::Loss,
            magnitude_percent,
        }
    }

    pub fn gain(id: StageId, magnitude_percent: f64) -> Self {
        Self {
            id,
            kind: StageKind::Gain,
            magnitude_percent,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}

/// Derives the temperature stage from ambient conditions.
///
/// The effect is linear in the distance from the reference temperature:
/// `coefficient × |ambient − reference|`. Below the reference the array runs
/// cooler than rated and the stage is a gain; at or above it, a loss.
///
/// # Errors
///
/// Returns [`InvalidInputError::TemperatureOutOfRange`] when the derived loss
/// would exceed 100 %.
pub fn temperature_stage(
    ambient_temp_c: f64,
    config: &LossChainConfig,
) -> Result<LossStage, InvalidInputError> {
    let delta = ambient_temp_c - config.array.reference_temp_c;
    let magnitude = config.array.temperature_coefficient * delta.abs();

    if delta < 0.0 {
        return Ok(LossStage::gain(StageId::Temperature, magnitude));
    }
    if magnitude > 100.0 {
        return Err(InvalidInputError::TemperatureOutOfRange {
            ambient_temp_c,
            magnitude,
        });
    }
    Ok(LossStage::loss(StageId::Temperature, magnitude))
}

/// Resolves the applied stages (markers excluded) in canonical order.
///
/// # Errors
///
/// Propagates [`temperature_stage`] failures.
pub fn chain_stages(
    ambient_temp_c: f64,
    config: &LossChainConfig,
) -> Result<Vec<LossStage>, InvalidInputError> {
    let temperature = temperature_stage(ambient_temp_c, config)?;

    let stages = StageId::CANONICAL_ORDER
        .into_iter()
        .filter(|id| !id.is_marker())
        .map(|id| {
            if id == StageId::Temperature {
                temperature
            } else {
                LossStage::loss(id, config.magnitude(id))
            }
        })
        .collect();
    Ok(stages)
}
