//! Error types shared by the loss chain and the degradation projector.

use thiserror::Error;

use crate::chain::StageId;

/// Precondition violation on the inputs of an evaluation or projection.
///
/// This is the only error the core produces. Inputs are never clamped or
/// defaulted: an implausible value upstream surfaces here instead of turning
/// into a plausible-looking yield figure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    /// Daily irradiance is negative or not a finite number.
    #[error("daily GHI must be a finite value >= 0 kWh/m²/day, got {0}")]
    InvalidIrradiance(f64),

    /// Installed capacity is zero, negative or not a finite number.
    #[error("installed capacity must be a finite value > 0 kWp, got {0}")]
    NonPositiveCapacity(f64),

    /// Ambient temperature is NaN or infinite.
    #[error("ambient temperature must be finite, got {0} °C")]
    NonFiniteTemperature(f64),

    /// A configured stage magnitude lies outside `[0, 100]` percent.
    #[error("{field} must be a finite magnitude in [0, 100] %, got {value}")]
    InvalidMagnitude {
        /// Dotted configuration path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Temperature coefficient is negative or not finite.
    #[error("array.temperature_coefficient must be a finite value >= 0 %/°C, got {0}")]
    InvalidTemperatureCoefficient(f64),

    /// Reference temperature is NaN or infinite.
    #[error("array.reference_temp_c must be finite, got {0} °C")]
    InvalidReferenceTemperature(f64),

    /// The temperature stage derived from ambient conditions exceeds 100 % loss.
    #[error(
        "temperature loss of {magnitude:.2} % at {ambient_temp_c} °C exceeds 100 %; \
         check ambient temperature and temperature coefficient"
    )]
    TemperatureOutOfRange {
        /// Ambient temperature that produced the loss.
        ambient_temp_c: f64,
        /// Derived loss magnitude in percent.
        magnitude: f64,
    },

    /// The stage is a marker or is derived, so its magnitude cannot be overridden.
    #[error("stage \"{}\" is not editable", .0.name())]
    StageNotEditable(StageId),

    /// A 100 % loss removes all year-1 output although irradiance is positive,
    /// leaving no baseline for cumulative degradation.
    #[error(
        "stage \"{}\" removes all year-1 output; cumulative degradation has no baseline",
        .0.name()
    )]
    ZeroBaseline(StageId),

    /// Configuration text is structurally malformed (missing or unknown fields).
    #[error("malformed loss-chain configuration: {0}")]
    MalformedConfig(String),
}
