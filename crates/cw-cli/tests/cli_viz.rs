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
fn scatter_artifact_has_one_point_per_row() {
    let out_path = tmp_path("scatter.json");
    let fixture = fixture_path();
    let out = run(&[
        "viz",
        "scatter",
        "--input",
        fixture.to_str().unwrap(),
        "--seed",
        "3",
        "--output",
        out_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(v["schema_version"].as_str().unwrap(), "cw-viz-scatter/1");
    assert_eq!(v["meta"]["seed"].as_u64().unwrap(), 3);
    assert_eq!(v["x"].as_array().unwrap().len(), 800);
    assert_eq!(v["y"].as_array().unwrap().len(), 800);
    assert_eq!(v["group"].as_array().unwrap().len(), 800);

    // Jittered values stay near their binary sources.
    let x0 = v["x"][0].as_f64().unwrap();
    assert!(x0 > -0.5 && x0 < 1.5, "x0={}", x0);

    let _ = std::fs::remove_file(&out_path);
}

#[test]
fn scatter_renders_svg() {
    let out_path = tmp_path("scatter_svg.json");
    let svg_path = tmp_path("scatter.svg");
    let fixture = fixture_path();
    let out = run(&[
        "viz",
        "scatter",
        "--input",
        fixture.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
        "--svg",
        svg_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("</svg>"));
    // 800 data points plus 2 legend markers.
    assert_eq!(svg.matches("<circle").count(), 802);

    let _ = std::fs::remove_file(&out_path);
    let _ = std::fs::remove_file(&svg_path);
}

#[test]
fn scatter_rejects_bad_jitter() {
    let fixture = fixture_path();
    let out = run(&[
        "viz",
        "scatter",
        "--input",
        fixture.to_str().unwrap(),
        "--jitter",
        "0.9",
    ]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("jitter"), "stderr: {}", stderr);
}
