use std::path::Path;
use std::process::Command;

use pv_offgrid_sim::config::ScenarioConfig;

#[test]
fn scenario_files_match_presets() {
    for name in ScenarioConfig::PRESETS {
        let path = format!("scenarios/{name}.toml");
        let from_file = ScenarioConfig::from_toml_file(Path::new(&path))
            .unwrap_or_else(|e| panic!("{path}: {e}"));
        let preset = ScenarioConfig::from_preset(name).unwrap();
        assert_eq!(from_file, preset, "{path} drifted from preset");
    }
}

#[test]
fn cli_runs_full_pipeline_and_exports_csv() {
    let out_path =
        std::env::temp_dir().join(format!("pv-offgrid-cli-{}.csv", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_pv-offgrid-sim"))
        .args(["--preset", "southern", "--seed", "3", "--telemetry-out"])
        .arg(&out_path)
        .output()
        .expect("pv-offgrid-sim process should run");

    assert!(
        output.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    for section in [
        "--- Site: Sydney, NSW ---",
        "--- Charge controller: Victron SmartSolar 150/85 ---",
        "--- Inverter: SMA Sunny Island 6.0H ---",
        "--- Compatibility ---",
        "--- Daily Summary ---",
        "--- Insights ---",
    ] {
        assert!(stdout.contains(section), "missing {section:?} in:\n{stdout}");
    }

    let csv = std::fs::read_to_string(&out_path).expect("CSV should be written");
    std::fs::remove_file(&out_path).ok();
    assert_eq!(csv.lines().count(), 25);
}

#[test]
fn cli_overrides_conditions() {
    let output = Command::new(env!("CARGO_BIN_EXE_pv-offgrid-sim"))
        .args(["--weather", "overcast", "--season", "winter"])
        .output()
        .expect("pv-offgrid-sim process should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- Simulated day:"));
    assert!(stdout.contains(", winter ---"));
}

#[test]
fn cli_rejects_bad_input() {
    for args in [
        vec!["--preset", "nonexistent"],
        vec!["--weather", "foggy"],
        vec!["--seed", "-1"],
        vec!["--preset", "baseline", "--scenario", "scenarios/baseline.toml"],
        vec!["--bogus"],
    ] {
        let output = Command::new(env!("CARGO_BIN_EXE_pv-offgrid-sim"))
            .args(&args)
            .output()
            .expect("pv-offgrid-sim process should run");
        assert!(!output.status.success(), "{args:?} should fail");
    }
}
