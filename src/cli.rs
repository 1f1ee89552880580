use std::path::PathBuf;

use clap::Parser;

use pv_yield_sim::chain::StageId;

#[derive(Parser, Debug)]
#[command(
    name = "pv-yield-sim",
    about = "Evaluate a PV loss chain and project 20 years of grid energy",
    version
)]
pub struct CliOptions {
    /// Load scenario from TOML config file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (reference, hot_climate, cold_climate)
    #[arg(long)]
    pub preset: Option<String>,

    /// Override one stage magnitude, e.g. `--override soiling=3.5` (repeatable)
    #[arg(long = "override", value_name = "STAGE=PERCENT", value_parser = parse_override)]
    pub overrides: Vec<(StageId, f64)>,

    /// Export the single-year loss breakdown to CSV
    #[arg(long)]
    pub breakdown_out: Option<PathBuf>,

    /// Export the yearly projection to CSV
    #[arg(long)]
    pub projection_out: Option<PathBuf>,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

pub fn parse_args() -> CliOptions {
    CliOptions::parse()
}

fn parse_override(raw: &str) -> Result<(StageId, f64), String> {
    let (stage, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected STAGE=PERCENT, got \"{raw}\""))?;
    let stage: StageId = stage.parse()?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("\"{value}\" is not a number"))?;
    Ok((stage, value))
}
