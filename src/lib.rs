//! Energy-yield and degradation simulation for solar PV projects.

pub mod chain;
/// Scenario configuration, presets, and TOML loading.
pub mod config;
pub mod error;
/// CSV exports of evaluation and projection results.
pub mod io;
/// Twenty-year degradation projection built on the loss chain.
pub mod projection;
pub mod telemetry;

pub use chain::{ChainEvaluation, LossBreakdownItem, LossChainConfig, StageId, evaluate};
pub use error::InvalidInputError;
pub use projection::{ProjectionSummary, YearlyProjection, project};
