//! The three estimates on the shipped dataset: naive vs. ITT vs. LATE.

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cw-cli"))
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/malaria_nets.csv")
        .canonicalize()
        .unwrap()
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("causeway_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run_to_json(args: &[&str], out_name: &str) -> serde_json::Value {
    let out_path = tmp_path(out_name);
    let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    full.push("--output".into());
    full.push(out_path.to_str().unwrap().into());
    let out: Output = Command::new(bin_path())
        .args(&full)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?}: {}", args, e));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let v = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let _ = std::fs::remove_file(&out_path);
    v
}

#[test]
fn first_stage_is_strong() {
    let fixture = fixture_path();
    let v = run_to_json(&["first-stage", "--input", fixture.to_str().unwrap()], "fs.json");

    let slope = v["fit"]["coefficients"][1].as_f64().unwrap();
    let f = v["fit"]["f_stat"].as_f64().unwrap();
    assert!(slope > 0.0, "first-stage slope should be positive, got {}", slope);
    assert!((slope - 0.449118589743).abs() < 1e-6, "slope={}", slope);
    assert!(f > 10.0, "F={}", f);
    assert!((f - 203.066762787).abs() < 1e-4, "F={}", f);
    assert_eq!(v["is_strong"].as_bool().unwrap(), true);
    assert_eq!(v["f_threshold"].as_f64().unwrap(), 10.0);
    // t = 14.25 on 798 dof: vanishingly small p-value.
    assert!(v["fit"]["p_values"][1].as_f64().unwrap() < 1e-6);
}

#[test]
fn naive_estimate_matches_reference() {
    let fixture = fixture_path();
    let v = run_to_json(&["naive", "--input", fixture.to_str().unwrap()], "naive.json");
    let slope = v["coefficients"][1].as_f64().unwrap();
    assert!((slope - (-0.383105436781)).abs() < 1e-8, "slope={}", slope);
    assert!(v["r_squared"].as_f64().unwrap() > 0.1);
}

#[test]
fn itt_estimate_matches_reference() {
    let fixture = fixture_path();
    let v = run_to_json(&["itt", "--input", fixture.to_str().unwrap()], "itt.json");
    let slope = v["coefficients"][1].as_f64().unwrap();
    assert!((slope - (-0.074519230769)).abs() < 1e-8, "slope={}", slope);
    // Assignment effect is real but modest: p between 1% and 5% here.
    let p = v["p_values"][1].as_f64().unwrap();
    assert!(p > 0.01 && p < 0.05, "p={}", p);
}

#[test]
fn late_matches_wald_ratio() {
    let fixture = fixture_path();
    let v = run_to_json(&["late", "--input", fixture.to_str().unwrap()], "late.json");

    let late = v["estimate"].as_f64().unwrap();
    let wald = v["wald_ratio"].as_f64().unwrap();
    assert!((late - (-0.165923282783)).abs() < 1e-8, "late={}", late);
    assert!((late - wald).abs() < 1e-10, "late={} wald={}", late, wald);
    assert!(v["se"].as_f64().unwrap() > 0.0);
    assert_eq!(v["first_stage"]["is_strong"].as_bool().unwrap(), true);
    assert_eq!(v["n_obs"].as_u64().unwrap(), 800);
}

#[test]
fn naive_itt_late_are_mutually_distinct() {
    let fixture = fixture_path();
    let input = fixture.to_str().unwrap();
    let naive = run_to_json(&["naive", "--input", input], "d_naive.json")["coefficients"][1]
        .as_f64()
        .unwrap();
    let itt =
        run_to_json(&["itt", "--input", input], "d_itt.json")["coefficients"][1].as_f64().unwrap();
    let late = run_to_json(&["late", "--input", input], "d_late.json")["estimate"]
        .as_f64()
        .unwrap();

    assert!((naive - itt).abs() > 0.01);
    assert!((naive - late).abs() > 0.01);
    assert!((itt - late).abs() > 0.01);
    // Selection makes the naive estimate overstate the protection.
    assert!(naive < late, "naive={} late={}", naive, late);
}
