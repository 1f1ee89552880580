//! Multi-year projection compounding degradation on top of the loss chain.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::chain::{ChainEvaluation, LossChainConfig, StageId, evaluate};
use crate::chain::evaluator::validate_inputs;
use crate::error::InvalidInputError;

/// Length of the projection horizon in years.
pub const PROJECTION_YEARS: u32 = 20;

/// Summary of one projected operating year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyProjection {
    /// Operating year, 1-based.
    pub year: u32,
    /// Grid-injected energy for this year (kWh).
    pub annual_e_grid_kwh: f64,
    /// Performance ratio for this year (%).
    pub performance_ratio: f64,
    /// Shortfall relative to year 1 output (%): `100 × (1 − E(y) / E(1))`.
    pub cumulative_degradation: f64,
    /// Energy delivered from year 1 through this year (kWh).
    pub cumulative_e_grid_kwh: f64,
}

impl fmt::Display for YearlyProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year={:>2} | E_grid={:>14.0} kWh  PR={:>6.2}%  degradation={:>6.2}% | cumulative={:.0} kWh",
            self.year,
            self.annual_e_grid_kwh,
            self.performance_ratio,
            self.cumulative_degradation,
            self.cumulative_e_grid_kwh,
        )
    }
}

/// Derives the configuration used for operating year `year` (1-based).
///
/// LID is a burn-in loss and is kept only in year 1. Module degradation
/// compounds: the year-`y` magnitude is `100 × (1 − (1 − rate/100)^y)`.
/// Every other stage is returned unchanged.
pub fn year_adjusted_config(config: &LossChainConfig, year: u32) -> LossChainConfig {
    let mut adjusted = config.clone();
    if year > 1 {
        adjusted.array.lid_loss = 0.0;
    }

    let retained = 1.0 - config.array.module_degradation_loss / 100.0;
    let exponent = i32::try_from(year).unwrap_or(i32::MAX);
    adjusted.array.module_degradation_loss = 100.0 * (1.0 - retained.powi(exponent));
    adjusted
}

/// First stage that drove the running energy to zero.
fn zeroing_stage(eval: &ChainEvaluation) -> StageId {
    eval.breakdown
        .iter()
        .find(|b| !b.stage.is_marker() && !b.is_gain && b.energy_kwh <= 0.0)
        .map_or(StageId::GridInjection, |b| b.stage)
}

/// Projects [`PROJECTION_YEARS`] years of grid energy for one site.
///
/// Each year is a fresh [`evaluate`] call on the year-adjusted configuration.
///
/// # Errors
///
/// Any [`InvalidInputError`] from the evaluator aborts the whole run; no
/// partial result is returned. Returns [`InvalidInputError::ZeroBaseline`]
/// when a 100 % loss zeroes year 1 under positive irradiance.
pub fn project(
    daily_ghi: f64,
    capacity_kwp: f64,
    ambient_temp_c: f64,
    config: &LossChainConfig,
) -> Result<Vec<YearlyProjection>, InvalidInputError> {
    validate_inputs(daily_ghi, capacity_kwp, ambient_temp_c)?;
    config.validate()?;

    let mut projections = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut baseline_kwh = 0.0_f64;
    let mut cumulative_kwh = 0.0_f64;

    for year in 1..=PROJECTION_YEARS {
        let year_config = year_adjusted_config(config, year);
        let eval = evaluate(daily_ghi, capacity_kwp, ambient_temp_c, &year_config)?;

        if year == 1 {
            baseline_kwh = eval.annual_e_grid_kwh;
            if baseline_kwh <= 0.0 && eval.potential_kwh > 0.0 {
                return Err(InvalidInputError::ZeroBaseline(zeroing_stage(&eval)));
            }
        }
        cumulative_kwh += eval.annual_e_grid_kwh;

        let cumulative_degradation = if baseline_kwh > 0.0 {
            100.0 * (1.0 - eval.annual_e_grid_kwh / baseline_kwh)
        } else {
            // Zero irradiance: every year is zero.
            0.0
        };

        debug!(
            year,
            annual_e_grid_kwh = eval.annual_e_grid_kwh,
            performance_ratio = eval.performance_ratio,
            cumulative_degradation,
            "projected year"
        );

        projections.push(YearlyProjection {
            year,
            annual_e_grid_kwh: eval.annual_e_grid_kwh,
            performance_ratio: eval.performance_ratio,
            cumulative_degradation,
            cumulative_e_grid_kwh: cumulative_kwh,
        });
    }

    Ok(projections)
}
