//! PV yield simulator entry point: CLI wiring and config-driven evaluation.

mod cli;

use std::io;
use std::process;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use pv_yield_sim::chain::{ChainEvaluation, evaluate};
use pv_yield_sim::config::{ConfigError, ScenarioConfig};
use pv_yield_sim::error::InvalidInputError;
use pv_yield_sim::io::export::{export_breakdown_csv, export_projection_csv};
use pv_yield_sim::projection::{ProjectionSummary, YearlyProjection, project};
use pv_yield_sim::telemetry::{self, TelemetryError};

use cli::CliOptions;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid scenario:\n{}", join_lines(.0))]
    Invalid(Vec<ConfigError>),
    #[error("invalid input: {0}")]
    Input(#[from] InvalidInputError),
    #[error("failed to write CSV: {0}")]
    Export(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

fn join_lines(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything one run produces, in the shape printed by `--json`.
#[derive(Serialize)]
struct RunReport<'a> {
    scenario: &'a ScenarioConfig,
    evaluation: &'a ChainEvaluation,
    projection: &'a [YearlyProjection],
    summary: &'a ProjectionSummary,
}

/// Resolves the scenario source: `--scenario` first, then `--preset`, then the reference preset.
fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig, ConfigError> {
    if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path)
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::reference())
    }
}

/// Applies `--override` flags in order, each producing a new loss config.
fn apply_overrides(
    mut scenario: ScenarioConfig,
    cli: &CliOptions,
) -> Result<ScenarioConfig, InvalidInputError> {
    for &(stage, magnitude) in &cli.overrides {
        scenario.losses = scenario.losses.with_stage_override(stage, magnitude)?;
        info!(stage = stage.key(), magnitude, "applied stage override");
    }
    Ok(scenario)
}

fn print_text_report(
    evaluation: &ChainEvaluation,
    projection: &[YearlyProjection],
    summary: &ProjectionSummary,
) {
    println!("--- Year 1 Loss Chain ---");
    for item in &evaluation.breakdown {
        println!("{item}");
    }
    println!("Performance ratio:     {:.2}%", evaluation.performance_ratio);

    println!();
    for row in projection {
        println!("{row}");
    }

    println!("\n{summary}");
}

fn run(cli: &CliOptions) -> Result<(), AppError> {
    telemetry::init(&cli.log_level)?;

    let scenario = apply_overrides(load_scenario(cli)?, cli)?;

    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(AppError::Invalid(errors));
    }

    let site = &scenario.site;
    let evaluation = evaluate(
        site.daily_ghi_kwh_m2,
        site.capacity_kwp,
        site.ambient_temp_c,
        &scenario.losses,
    )?;
    let projection = project(
        site.daily_ghi_kwh_m2,
        site.capacity_kwp,
        site.ambient_temp_c,
        &scenario.losses,
    )?;
    let summary = ProjectionSummary::from_projections(&projection);

    if cli.json {
        let report = RunReport {
            scenario: &scenario,
            evaluation: &evaluation,
            projection: &projection,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&evaluation, &projection, &summary);
    }

    if let Some(ref path) = cli.breakdown_out {
        export_breakdown_csv(&evaluation.breakdown, path)?;
        eprintln!("Breakdown written to {}", path.display());
    }
    if let Some(ref path) = cli.projection_out {
        export_projection_csv(&projection, path)?;
        eprintln!("Projection written to {}", path.display());
    }

    Ok(())
}

fn main() {
    let cli = cli::parse_args();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
