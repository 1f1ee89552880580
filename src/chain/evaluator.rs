//! Single-year evaluation of the loss chain.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::config::LossChainConfig;
use super::stage::{StageId, StageKind, chain_stages};
use crate::error::InvalidInputError;

/// Days per synthetic year used to annualize daily irradiance.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Realized effect of one stage during one evaluation.
///
/// Magnitude and direction are kept apart; [`LossBreakdownItem::signed_percent`]
/// combines them only for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossBreakdownItem {
    pub stage: StageId,
    /// Applied magnitude in percent (always >= 0).
    pub magnitude_percent: f64,
    pub is_gain: bool,
    /// Running energy after this stage was applied (kWh/year).
    pub energy_kwh: f64,
}

impl LossBreakdownItem {
    fn marker(stage: StageId, energy_kwh: f64) -> Self {
        Self {
            stage,
            magnitude_percent: 0.0,
            is_gain: false,
            energy_kwh,
        }
    }

    /// Display label of the stage.
    pub fn name(&self) -> &'static str {
        self.stage.name()
    }

    /// Signed percentage for waterfall display: negative for losses,
    /// positive for gains.
    pub fn signed_percent(&self) -> f64 {
        if self.is_gain {
            self.magnitude_percent
        } else {
            -self.magnitude_percent
        }
    }
}

/// Serialized with the same columns as the CSV export, including the
/// derived `signed_percent`.
impl Serialize for LossBreakdownItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut item = serializer.serialize_struct("LossBreakdownItem", 5)?;
        item.serialize_field("stage", &self.stage)?;
        item.serialize_field("magnitude_percent", &self.magnitude_percent)?;
        item.serialize_field("signed_percent", &self.signed_percent())?;
        item.serialize_field("is_gain", &self.is_gain)?;
        item.serialize_field("energy_kwh", &self.energy_kwh)?;
        item.end()
    }
}

impl fmt::Display for LossBreakdownItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:>+8.2}% | {:>14.0} kWh",
            self.name(),
            self.signed_percent(),
            self.energy_kwh
        )
    }
}

/// Result of one loss-chain evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainEvaluation {
    /// Stage-by-stage effects, `GHI Input` first and `E_grid` last.
    pub breakdown: Vec<LossBreakdownItem>,
    /// Delivered energy as a percentage of the irradiance-driven potential.
    pub performance_ratio: f64,
    /// Grid-injected energy after every stage (kWh/year).
    pub annual_e_grid_kwh: f64,
    /// Irradiance-driven potential, `daily_ghi × capacity_kwp × 365` (kWh/year).
    pub potential_kwh: f64,
}

/// Checks the primary scalar inputs of an evaluation.
///
/// # Errors
///
/// Returns [`InvalidInputError`] for negative or non-finite irradiance,
/// non-positive or non-finite capacity, and non-finite temperature.
pub fn validate_inputs(
    daily_ghi: f64,
    capacity_kwp: f64,
    ambient_temp_c: f64,
) -> Result<(), InvalidInputError> {
    if !daily_ghi.is_finite() || daily_ghi < 0.0 {
        return Err(InvalidInputError::InvalidIrradiance(daily_ghi));
    }
    if !capacity_kwp.is_finite() || capacity_kwp <= 0.0 {
        return Err(InvalidInputError::NonPositiveCapacity(capacity_kwp));
    }
    if !ambient_temp_c.is_finite() {
        return Err(InvalidInputError::NonFiniteTemperature(ambient_temp_c));
    }
    Ok(())
}

/// Computes one year's energy flow through the loss chain.
///
/// Starts from `daily_ghi × capacity_kwp × 365` and applies every stage in
/// canonical order, each on the base left by the previous ones. Zero-magnitude
/// stages are still reported.
///
/// # Arguments
///
/// * `daily_ghi` - Global horizontal irradiance (kWh/m²/day, >= 0)
/// * `capacity_kwp` - Installed DC capacity (kWp, > 0)
/// * `ambient_temp_c` - Ambient temperature driving the temperature stage (°C)
/// * `config` - Loss magnitudes
///
/// # Errors
///
/// Returns [`InvalidInputError`] when any input or configured magnitude is
/// out of range. Nothing is clamped.
pub fn evaluate(
    daily_ghi: f64,
    capacity_kwp: f64,
    ambient_temp_c: f64,
    config: &LossChainConfig,
) -> Result<ChainEvaluation, InvalidInputError> {
    validate_inputs(daily_ghi, capacity_kwp, ambient_temp_c)?;
    config.validate()?;

    let stages = chain_stages(ambient_temp_c, config)?;
    let potential_kwh = daily_ghi * capacity_kwp * DAYS_PER_YEAR;

    let mut breakdown = Vec::with_capacity(stages.len() + 2);
    breakdown.push(LossBreakdownItem::marker(StageId::GhiInput, potential_kwh));

    let mut running = potential_kwh;
    for stage in &stages {
        running = stage.kind.apply(running, stage.magnitude_percent);
        breakdown.push(LossBreakdownItem {
            stage: stage.id,
            magnitude_percent: stage.magnitude_percent,
            is_gain: stage.kind == StageKind::Gain,
            energy_kwh: running,
        });
    }

    breakdown.push(LossBreakdownItem::marker(StageId::GridInjection, running));

    // Zero irradiance has no potential to rate against.
    let performance_ratio = if potential_kwh > 0.0 {
        100.0 * (running / potential_kwh)
    } else {
        0.0
    };

    debug!(
        daily_ghi,
        capacity_kwp,
        ambient_temp_c,
        potential_kwh,
        annual_e_grid_kwh = running,
        performance_ratio,
        "evaluated loss chain"
    );

    Ok(ChainEvaluation {
        breakdown,
        performance_ratio,
        annual_e_grid_kwh: running,
        potential_kwh,
    })
}
