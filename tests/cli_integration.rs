use std::path::PathBuf;
use std::process::{Command, Output};

#[derive(Debug)]
struct Report {
    performance_ratio: f64,
    lifetime_kwh: f64,
    final_degradation: f64,
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pv-yield-sim"))
        .args(args)
        .output()
        .expect("pv-yield-sim process should run")
}

fn run_and_parse_report(args: &[&str]) -> (String, Report) {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    let report = parse_report(&stdout);
    (stdout, report)
}

fn parse_report(stdout: &str) -> Report {
    Report {
        performance_ratio: parse_value(stdout, "Performance ratio:"),
        lifetime_kwh: parse_value(stdout, "Lifetime energy:"),
        final_degradation: parse_value(stdout, "Final degradation:"),
    }
}

fn parse_value(stdout: &str, label: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|l| l.starts_with(label))
        .unwrap_or_else(|| panic!("missing \"{label}\" in output:\n{stdout}"));
    line[label.len()..]
        .trim()
        .trim_end_matches("kWh")
        .trim_end_matches('%')
        .trim()
        .parse()
        .unwrap_or_else(|e| panic!("could not parse \"{line}\": {e}"))
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pv-yield-sim-{}-{name}", std::process::id()))
}

#[test]
fn scenario_files_match_their_presets() {
    for name in ["reference", "hot_climate", "cold_climate"] {
        let path = format!("scenarios/{name}.toml");
        let (from_file, _) = run_and_parse_report(&["--scenario", &path]);
        let (from_preset, _) = run_and_parse_report(&["--preset", name]);
        assert_eq!(from_file, from_preset, "{path} diverges from preset {name}");
    }
}

#[test]
fn reference_run_reports_expected_headline_numbers() {
    let (stdout, report) = run_and_parse_report(&["--scenario", "scenarios/reference.toml"]);

    assert!(stdout.contains("--- Year 1 Loss Chain ---"));
    assert!(stdout.contains("--- 20-Year Projection ---"));
    assert!((report.performance_ratio - 91.32).abs() < 0.006);
    assert!((report.final_degradation - 7.23).abs() < 0.006);
    assert!(report.lifetime_kwh > 35_000_000.0 && report.lifetime_kwh < 36_000_000.0);
}

#[test]
fn climate_presets_produce_distinct_performance() {
    let (_, reference) = run_and_parse_report(&["--preset", "reference"]);
    let (_, hot) = run_and_parse_report(&["--preset", "hot_climate"]);
    let (_, cold) = run_and_parse_report(&["--preset", "cold_climate"]);

    assert!(
        hot.performance_ratio < reference.performance_ratio,
        "expected hot climate PR below reference: hot={:.2}, reference={:.2}",
        hot.performance_ratio,
        reference.performance_ratio
    );
    assert!(
        cold.performance_ratio > reference.performance_ratio,
        "expected the cold-climate temperature gain to lift PR: cold={:.2}, reference={:.2}",
        cold.performance_ratio,
        reference.performance_ratio
    );
    assert!(hot.final_degradation > reference.final_degradation);
}

#[test]
fn override_changes_the_result() {
    let (_, base) = run_and_parse_report(&["--preset", "reference"]);
    let (_, dusty) =
        run_and_parse_report(&["--preset", "reference", "--override", "soiling=6"]);
    assert!(dusty.performance_ratio < base.performance_ratio);
    assert!(dusty.lifetime_kwh < base.lifetime_kwh);
}

#[test]
fn json_output_carries_breakdown_and_projection() {
    let output = run_cli(&["--preset", "reference", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let breakdown = value["evaluation"]["breakdown"]
        .as_array()
        .expect("breakdown array");
    assert_eq!(breakdown.len(), 13);
    assert_eq!(breakdown[0]["stage"], "ghi_input");
    assert_eq!(breakdown[12]["stage"], "grid_injection");
    assert_eq!(breakdown[2]["stage"], "soiling");
    assert_eq!(breakdown[2]["signed_percent"], -2.0);

    let projection = value["projection"].as_array().expect("projection array");
    assert_eq!(projection.len(), 20);
    assert_eq!(projection[0]["year"], 1);
    assert_eq!(projection[0]["cumulative_degradation"], 0.0);
    assert_eq!(value["summary"]["years"], 20);
}

#[test]
fn csv_exports_are_written() {
    let breakdown = temp_path("breakdown.csv");
    let projection = temp_path("projection.csv");
    let output = run_cli(&[
        "--preset",
        "cold_climate",
        "--breakdown-out",
        breakdown.to_str().expect("utf-8 temp path"),
        "--projection-out",
        projection.to_str().expect("utf-8 temp path"),
    ]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let breakdown_csv = std::fs::read_to_string(&breakdown).expect("breakdown csv exists");
    let projection_csv = std::fs::read_to_string(&projection).expect("projection csv exists");
    let _ = std::fs::remove_file(&breakdown);
    let _ = std::fs::remove_file(&projection);

    let mut lines = breakdown_csv.lines();
    assert_eq!(
        lines.next(),
        Some("stage,magnitude_percent,signed_percent,is_gain,energy_kwh")
    );
    assert_eq!(lines.count(), 13);
    assert!(breakdown_csv.contains("Temperature,"));
    assert_eq!(projection_csv.lines().count(), 21);
}

#[test]
fn out_of_range_override_fails() {
    let output = run_cli(&["--preset", "reference", "--override", "inverter=150"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("inverter_loss"), "stderr={stderr}");
}

#[test]
fn marker_stages_cannot_be_overridden() {
    let output = run_cli(&["--preset", "reference", "--override", "grid_injection=5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not editable"), "stderr={stderr}");
}

#[test]
fn unknown_preset_fails() {
    let output = run_cli(&["--preset", "tropical"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tropical"), "stderr={stderr}");
}

#[test]
fn invalid_scenario_file_reports_every_error() {
    let path = temp_path("invalid.toml");
    std::fs::write(
        &path,
        r#"
[site]
daily_ghi_kwh_m2 = -1.0

[losses.array]
soiling_loss = 120.0
shading_loss = 0.0
mismatch_loss = 0.0
lid_loss = 2.0
module_degradation_loss = 0.5
temperature_coefficient = 0.4

[losses.system]
wiring_loss = 1.5
inverter_loss = 2.0
transformer_loss = 0.0
auxiliary_loss = 0.0
unavailability_loss = 1.0
"#,
    )
    .expect("write temp scenario");
    let output = run_cli(&["--scenario", path.to_str().expect("utf-8 temp path")]);
    let _ = std::fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid scenario"), "stderr={stderr}");
    assert!(stderr.contains("site.daily_ghi_kwh_m2"), "stderr={stderr}");
    assert!(stderr.contains("losses.array.soiling_loss"), "stderr={stderr}");
}

#[test]
fn full_lid_loss_is_rejected_for_projection() {
    let output = run_cli(&["--preset", "reference", "--override", "lid=100"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"LID\" removes all year-1 output"), "stderr={stderr}");
}
