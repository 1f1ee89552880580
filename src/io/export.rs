//! CSV export for loss breakdowns and yearly projections.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::chain::LossBreakdownItem;
use crate::projection::YearlyProjection;

/// Column header for the single-year loss breakdown export.
pub const BREAKDOWN_HEADER: &str = "stage,magnitude_percent,signed_percent,is_gain,energy_kwh";

/// Column header for the yearly projection export.
pub const PROJECTION_HEADER: &str = "year,annual_e_grid_kwh,performance_ratio,\
                                     cumulative_degradation,cumulative_e_grid_kwh";

/// Exports a loss breakdown to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_breakdown_csv(items: &[LossBreakdownItem], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_breakdown_csv(items, io::BufWriter::new(file))
}

/// Writes a loss breakdown as CSV to any writer, one row per stage in chain order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_breakdown_csv(items: &[LossBreakdownItem], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(BREAKDOWN_HEADER.split(','))?;

    for item in items {
        wtr.write_record(&[
            item.name().to_string(),
            format!("{:.4}", item.magnitude_percent),
            format!("{:.4}", item.signed_percent()),
            item.is_gain.to_string(),
            format!("{:.2}", item.energy_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports yearly projections to a CSV file at the given path.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_projection_csv(rows: &[YearlyProjection], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_projection_csv(rows, io::BufWriter::new(file))
}

/// Writes yearly projections as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_projection_csv(rows: &[YearlyProjection], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PROJECTION_HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.2}", r.annual_e_grid_kwh),
            format!("{:.4}", r.performance_ratio),
            format!("{:.4}", r.cumulative_degradation),
            format!("{:.2}", r.cumulative_e_grid_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
