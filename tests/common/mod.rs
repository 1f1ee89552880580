//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use pv_yield_sim::chain::{LossChainConfig, StageId};

/// Reference site: 5.5 kWh/m²/day on 1 MWp at 25 °C.
pub const DAILY_GHI: f64 = 5.5;
pub const CAPACITY_KWP: f64 = 1000.0;
pub const AMBIENT_TEMP_C: f64 = 25.0;

/// Irradiance-driven potential of the reference site (kWh/year).
pub const REFERENCE_POTENTIAL_KWH: f64 = 2_007_500.0;

/// Golden loss set: LID 2 %, module degradation 0.5 %/year, soiling 2 %,
/// wiring 1.5 %, inverter 2 %, unavailability 1 %, everything else zero.
pub fn golden_config() -> LossChainConfig {
    let mut config = LossChainConfig::lossless();
    config.array.lid_loss = 2.0;
    config.array.module_degradation_loss = 0.5;
    config.array.soiling_loss = 2.0;
    config.system.wiring_loss = 1.5;
    config.system.inverter_loss = 2.0;
    config.system.unavailability_loss = 1.0;
    config
}

/// Lossless config with a single stage set to `magnitude`.
pub fn single_stage(stage: StageId, magnitude: f64) -> LossChainConfig {
    LossChainConfig::lossless()
        .with_stage_override(stage, magnitude)
        .expect("configurable stage with in-range magnitude")
}

/// Asserts `actual` is within `rel_tol` of `expected`, relative to `expected`.
pub fn assert_close(actual: f64, expected: f64, rel_tol: f64, what: &str) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= rel_tol * scale,
        "{what}: expected {expected}, got {actual}"
    );
}
