//! PVsyst-style loss chain: configuration, stage ordering, and single-year evaluation.

/// Loss parameters grouped by subsystem.
pub mod config;
pub mod evaluator;
/// Stage identities and canonical ordering.
pub mod stage;

pub use config::{ArrayLosses, LossChainConfig, SystemLosses};
pub use evaluator::{ChainEvaluation, LossBreakdownItem, evaluate};
pub use stage::{LossStage, StageId, StageKind};
