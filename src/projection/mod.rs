//! Multi-year degradation projection and its summary statistics.

pub mod projector;
/// Lifetime aggregates over the yearly records.
pub mod summary;

pub use projector::{PROJECTION_YEARS, YearlyProjection, project, year_adjusted_config};
pub use summary::ProjectionSummary;
