//! 命令行端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn liftdraft() -> Command {
    let mut cmd = Command::cargo_bin("liftdraft").expect("liftdraft binary");
    cmd.env_remove("LIFTDRAFT_CONFIG").env_remove("RUST_LOG");
    cmd
}

const ELEMENTS: &str = r#"[
    { "id": "beam", "type": "line", "points": [{ "x": 0, "y": 0 }, { "x": 100, "y": 0 }] },
    { "id": "post", "type": "line", "points": [{ "x": 100, "y": 10 }, { "x": 100, "y": 50 }] },
    { "id": "hook", "type": "circle", "points": [{ "x": 50, "y": 50 }, { "x": 60, "y": 50 }] }
]"#;

fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("elements.json");
    fs::write(&input, ELEMENTS).unwrap();
    (dir, input)
}

fn records(stdout: &[u8]) -> Vec<serde_json::Value> {
    serde_json::from_slice(stdout).expect("JSON element list")
}

#[test]
fn test_export_svg_to_stdout() {
    let (_dir, input) = workspace();
    liftdraft()
        .args(["export", "--format", "svg", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("x1=\"0\" y1=\"0\" x2=\"100\" y2=\"0\""));
}

#[test]
fn test_export_dxf_to_file() {
    let (dir, input) = workspace();
    let output = dir.path().join("out.dxf");
    liftdraft()
        .args(["export", "--format", "dxf", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let payload = fs::read_to_string(&output).unwrap();
    assert!(payload.contains("AC1009"));
    assert!(payload.ends_with("0\nEOF\n"));
}

#[test]
fn test_export_eps_has_wall_clock_date() {
    let (_dir, input) = workspace();
    liftdraft()
        .args(["export", "--format", "eps", "--width", "400", "--height", "300", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("%%BoundingBox: 0 0 400 300"))
        .stdout(predicate::str::contains("%%CreationDate: 1970").not());
}

#[test]
fn test_export_raster_format_fails() {
    let (_dir, input) = workspace();
    liftdraft()
        .args(["export", "--format", "png", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("png"));
}

#[test]
fn test_missing_input_fails() {
    liftdraft()
        .args(["export", "--input", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn test_linear_dimension() {
    let output = liftdraft()
        .args(["dimension", "linear", "--id", "d1", "--p1", "0,0", "--p2", "100,0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["id"], "d1");
    assert_eq!(record["text"], "100.00");
    assert_eq!(record["points"][2]["y"], 10.0);
}

#[test]
fn test_dimension_offset_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("liftdraft.toml");
    fs::write(&config, "[dimension]\nlinear_offset = 25.0\n").unwrap();

    let output = liftdraft()
        .arg("--config")
        .arg(&config)
        .args(["dimension", "linear", "--id", "d1", "--p1", "0,0", "--p2", "40,0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["points"][2]["y"], 25.0);
    assert_eq!(record["text"], "40.00");
}

#[test]
fn test_radial_dimension() {
    liftdraft()
        .args(["dimension", "radial", "--id", "r1", "--center", "0,0", "--point", "3,4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"R5.00\""));
}

#[test]
fn test_break_splits_line() {
    let (_dir, input) = workspace();
    let output = liftdraft()
        .args(["transform", "break", "--id", "beam", "--point", "40,0", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let list = records(&output.stdout);
    let ids: Vec<&str> = list.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["beam-1", "beam-2", "post", "hook"]);
    assert_eq!(list[0]["points"][1]["x"], 40.0);
}

#[test]
fn test_break_far_from_line_keeps_list() {
    let (_dir, input) = workspace();
    let output = liftdraft()
        .args(["transform", "break", "--id", "beam", "--point", "40,30", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let ids: Vec<String> = records(&output.stdout)
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["beam", "post", "hook"]);
}

#[test]
fn test_unknown_id_fails() {
    let (_dir, input) = workspace();
    liftdraft()
        .args(["transform", "offset", "--id", "nope", "--distance", "5", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no element with id 'nope'"));
}

#[test]
fn test_offset_appends_copy() {
    let (_dir, input) = workspace();
    let output = liftdraft()
        .args(["transform", "offset", "--id", "hook", "--distance", "5", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let list = records(&output.stdout);
    assert_eq!(list.len(), 4);
    assert_eq!(list[3]["id"], "hook-o");
    assert_eq!(list[3]["points"][1]["x"], 65.0);
}

#[test]
fn test_extend_to_target() {
    let (_dir, input) = workspace();
    let output = liftdraft()
        .args(["transform", "extend", "--id", "post", "--target", "beam", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let list = records(&output.stdout);
    assert_eq!(list[1]["id"], "post");
    assert_eq!(list[1]["points"][1]["y"], 0.0);
}

#[test]
fn test_rectangular_array_writes_output_file() {
    let (dir, input) = workspace();
    let output = dir.path().join("array.json");
    liftdraft()
        .args([
            "transform",
            "array-rect",
            "--rows",
            "2",
            "--columns",
            "2",
            "--row-spacing",
            "100",
            "--column-spacing",
            "200",
            "--input",
        ])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let list = records(&fs::read(&output).unwrap());
    assert_eq!(list.len(), 12);
    assert!(list.iter().any(|r| r["id"] == "beam-r1c1"));
}

#[test]
fn test_align_rejects_unknown_alignment() {
    let (_dir, input) = workspace();
    liftdraft()
        .args(["transform", "align", "diagonal", "--input"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn test_fillet_adds_arc() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("corner.json");
    fs::write(
        &input,
        r#"[
            { "id": "a", "type": "line", "points": [{ "x": 0, "y": 0 }, { "x": 100, "y": 0 }] },
            { "id": "b", "type": "line", "points": [{ "x": 100, "y": 0 }, { "x": 100, "y": 100 }] }
        ]"#,
    )
    .unwrap();

    let output = liftdraft()
        .args(["transform", "fillet", "--first", "a", "--second", "b", "--radius", "10", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let list = records(&output.stdout);
    assert_eq!(list.len(), 3);
    assert_eq!(list[2]["id"], "a-fillet");
    assert_eq!(list[2]["type"], "arc");
}
