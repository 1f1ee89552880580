//! Lifetime summary statistics derived from a projection.

use std::fmt;

use serde::Serialize;

use super::projector::YearlyProjection;

/// Aggregate figures for a complete multi-year projection.
///
/// Computed post-hoc from the yearly records so the summary can never
/// disagree with the table it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    /// Number of projected years.
    pub years: usize,
    /// Year 1 grid energy (kWh).
    pub first_year_e_grid_kwh: f64,
    /// Final year grid energy (kWh).
    pub final_year_e_grid_kwh: f64,
    /// Total grid energy over all years (kWh).
    pub lifetime_e_grid_kwh: f64,
    /// Arithmetic mean of the yearly performance ratios (%).
    pub mean_performance_ratio: f64,
    /// Cumulative degradation reached in the final year (%).
    pub final_cumulative_degradation: f64,
}

impl ProjectionSummary {
    /// Computes the summary from the ordered yearly records.
    ///
    /// An empty slice yields an all-zero summary.
    pub fn from_projections(rows: &[YearlyProjection]) -> Self {
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Self {
                years: 0,
                first_year_e_grid_kwh: 0.0,
                final_year_e_grid_kwh: 0.0,
                lifetime_e_grid_kwh: 0.0,
                mean_performance_ratio: 0.0,
                final_cumulative_degradation: 0.0,
            };
        };

        let lifetime: f64 = rows.iter().map(|r| r.annual_e_grid_kwh).sum();
        let pr_sum: f64 = rows.iter().map(|r| r.performance_ratio).sum();

        Self {
            years: rows.len(),
            first_year_e_grid_kwh: first.annual_e_grid_kwh,
            final_year_e_grid_kwh: last.annual_e_grid_kwh,
            lifetime_e_grid_kwh: lifetime,
            mean_performance_ratio: pr_sum / rows.len() as f64,
            final_cumulative_degradation: last.cumulative_degradation,
        }
    }
}

impl fmt::Display for ProjectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {}-Year Projection ---", self.years)?;
        writeln!(f, "Year 1 energy:         {:.0} kWh", self.first_year_e_grid_kwh)?;
        writeln!(
            f,
            "Year {} energy:        {:.0} kWh",
            self.years, self.final_year_e_grid_kwh
        )?;
        writeln!(f, "Lifetime energy:       {:.0} kWh", self.lifetime_e_grid_kwh)?;
        writeln!(f, "Mean PR:               {:.2}%", self.mean_performance_ratio)?;
        write!(
            f,
            "Final degradation:     {:.2}%",
            self.final_cumulative_degradation
        )
    }
}
