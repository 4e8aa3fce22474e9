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

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn crosstab_counts_sum_to_n() {
    let out_path = tmp_path("crosstab.json");
    let fixture = fixture_path();
    let out = run(&[
        "crosstab",
        "--input",
        fixture.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let counts = v["crosstab"]["counts"].as_array().unwrap();
    let mut total = 0u64;
    for row in counts {
        for cell in row.as_array().unwrap() {
            total += cell.as_u64().unwrap();
        }
    }
    assert_eq!(total, v["crosstab"]["n"].as_u64().unwrap());
    assert_eq!(total, 800);

    // Exact cell counts of the shipped dataset.
    assert_eq!(counts[0][0].as_u64().unwrap(), 298);
    assert_eq!(counts[0][1].as_u64().unwrap(), 86);
    assert_eq!(counts[1][0].as_u64().unwrap(), 136);
    assert_eq!(counts[1][1].as_u64().unwrap(), 280);

    let _ = std::fs::remove_file(&out_path);
}

#[test]
fn crosstab_reports_compliance_shares() {
    let out_path = tmp_path("crosstab_shares.json");
    let fixture = fixture_path();
    let out = run(&[
        "crosstab",
        "--input",
        fixture.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let shares = &v["compliance_shares"];
    let always = shares["always_taker"].as_f64().unwrap();
    let never = shares["never_taker"].as_f64().unwrap();
    let complier = shares["complier"].as_f64().unwrap();

    assert!((always - 86.0 / 384.0).abs() < 1e-9);
    assert!((never - 136.0 / 416.0).abs() < 1e-9);
    assert!((complier - (280.0 / 416.0 - 86.0 / 384.0)).abs() < 1e-9);
    assert!((always + never + complier - 1.0).abs() < 1e-9);

    let _ = std::fs::remove_file(&out_path);
}

#[test]
fn crosstab_missing_column_fails() {
    let bad_path = tmp_path("bad.csv");
    std::fs::write(&bad_path, "sms,net_use\n0,1\n1,1\n").unwrap();
    let out = run(&["crosstab", "--input", bad_path.to_str().unwrap()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("malaria"), "stderr: {}", stderr);
    let _ = std::fs::remove_file(&bad_path);
}
