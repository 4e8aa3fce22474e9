use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cw-cli"))
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("causeway_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn simulate_weak_degrades_first_stage_f() {
    let out = run(&["simulate-weak", "--n", "2000", "--seed", "42"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    let strong_f = v["strong"]["f_stat"].as_f64().unwrap();
    let weak_f = v["weak"]["f_stat"].as_f64().unwrap();
    assert!(strong_f > 10.0, "strong F={}", strong_f);
    assert!(weak_f.is_finite() && weak_f >= 0.0, "weak F={}", weak_f);
    assert!(weak_f < strong_f / 5.0, "weak F={} vs strong F={}", weak_f, strong_f);
    assert_eq!(v["attenuation"].as_f64().unwrap(), 0.08);
    assert_eq!(v["n"].as_u64().unwrap(), 2000);
}

#[test]
fn simulate_weak_is_reproducible() {
    let a = run(&["simulate-weak", "--seed", "123"]);
    let b = run(&["simulate-weak", "--seed", "123"]);
    assert!(a.status.success() && b.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn simulate_weak_rejects_bad_attenuation() {
    let out = run(&["simulate-weak", "--attenuation", "1.5"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("attenuation"), "stderr: {}", stderr);
}

#[test]
fn generate_writes_loadable_csv() {
    let csv_path = tmp_path("generated.csv");
    let out = run(&[
        "generate",
        "--n",
        "200",
        "--seed",
        "9",
        "--output",
        csv_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.starts_with("sms,net_use,malaria"));
    assert_eq!(contents.lines().count(), 201); // header + 200 rows

    // The generated file round-trips through the analysis commands.
    let tab_out = run(&["crosstab", "--input", csv_path.to_str().unwrap()]);
    assert!(tab_out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&tab_out.stdout).unwrap();
    assert_eq!(v["crosstab"]["n"].as_u64().unwrap(), 200);

    let _ = std::fs::remove_file(&csv_path);
}

#[test]
fn generate_same_seed_same_file() {
    let p1 = tmp_path("gen_a.csv");
    let p2 = tmp_path("gen_b.csv");
    for p in [&p1, &p2] {
        let out = run(&["generate", "--n", "50", "--seed", "4", "--output", p.to_str().unwrap()]);
        assert!(out.status.success());
    }
    assert_eq!(std::fs::read(&p1).unwrap(), std::fs::read(&p2).unwrap());
    let _ = std::fs::remove_file(&p1);
    let _ = std::fs::remove_file(&p2);
}
