use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;

#[test]
fn classify_prints_label_and_rotated_position() {
    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args(["classify", "--kp", "1", "--x", "10", "--y", "0", "--z", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("magnetosphere"))
        .stdout(predicate::str::contains("rotated: 9.9756 0.6976 0.0000"));
}

#[test]
fn classify_accepts_negative_coordinates() {
    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args(["classify", "--kp", "1", "--x", "-30", "--y", "40", "--z", "0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("magnetosheath"));
}

#[test]
fn classify_reports_clamped_kp() {
    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args(["classify", "--kp", "11", "--x", "0", "--y", "30", "--z", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("clamped to 9"));
}

#[test]
fn table_writes_rows_and_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("samples.csv");
    let kp_feed = dir.path().join("kp.csv");
    let output = dir.path().join("out/regions.tsv");
    let summary = dir.path().join("summary.json");

    let mut file = File::create(&input).expect("csv create");
    writeln!(file, "time,x,y,z,kp").unwrap();
    writeln!(file, "2020-01-01T00:00:00,10,0,0,1").unwrap();
    writeln!(file, "2020-01-01T00:05:00,15,0,0,").unwrap();
    writeln!(file, "2020-01-01T00:10:00,-30,40,0,12").unwrap();

    let mut file = File::create(&kp_feed).expect("kp create");
    writeln!(file, "time,kp").unwrap();
    writeln!(file, "2019-12-31T21:00:00,2.333").unwrap();

    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args([
            "table",
            "--input",
            input.to_str().unwrap(),
            "--kp-file",
            kp_feed.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--summary",
            summary.to_str().unwrap(),
        ])
        .assert()
        .success();

    let table = fs::read_to_string(&output).expect("table written");
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4, "header plus three rows: {table}");
    assert!(lines[0].starts_with("epoch_s\tutc"));
    assert!(lines[1].contains("2020-01-01T00:00:00"));
    assert!(lines[1].ends_with("\t3"));
    assert!(lines[2].contains("\t2.333\t"), "kp taken from the feed: {}", lines[2]);
    assert!(lines[2].ends_with("\t1"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("summary written"))
            .expect("summary is JSON");
    assert_eq!(json["samples"], 3);
    assert_eq!(json["magnetosphere"], 1);
    assert_eq!(json["solar_wind"], 1);
    assert_eq!(json["clamped_kp"], 1);
    assert_eq!(json["failed"], 0);
}

#[test]
fn table_honours_config_default_kp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("samples.csv");
    let config = dir.path().join("radmon.toml");
    fs::write(&input, "time,x,y,z\n0,9,3,0\n").unwrap();
    fs::write(&config, "default_kp = 9.0\n[solver]\nmethod = \"stepped\"\n").unwrap();

    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args([
            "--config",
            config.to_str().unwrap(),
            "table",
            "--input",
            input.to_str().unwrap(),
            "--output",
            "-",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t9.000\t2"));
}

#[test]
fn missing_input_fails() {
    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args(["table", "--input", "does/not/exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading samples"));
}

#[test]
fn table_rotates_gse_input_with_configured_angles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("samples.csv");
    let config = dir.path().join("radmon.toml");
    fs::write(&input, "time,x,y,z,kp\n0,2,2,1,1\n").unwrap();
    fs::write(
        &config,
        "input_frame = \"gse\"\n[rotation]\ngst_deg = 63.0\nsun_ra_deg = 23.0\nsun_dec_deg = 9.0\ndipole_colat_deg = 9.4\ndipole_lon_deg = 287.4\nobliquity_deg = 23.44\n",
    )
    .unwrap();

    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args([
            "--config",
            config.to_str().unwrap(),
            "table",
            "--input",
            input.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t3.0000\t"))
        .stdout(predicate::str::contains("\t2.0000\t2.0000\t1.0000\t1.000\t3"));
}

#[test]
fn inertial_input_without_rotation_is_counted_as_failed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("samples.csv");
    let summary = dir.path().join("summary.json");
    fs::write(&input, "time,x,y,z\n0,20000,0,0\n").unwrap();

    Command::cargo_bin("radmon")
        .expect("radmon bin")
        .args([
            "table",
            "--input",
            input.to_str().unwrap(),
            "--frame",
            "inertial",
            "--summary",
            summary.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("rotation state is required"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("summary written"))
            .expect("summary is JSON");
    assert_eq!(json["samples"], 1);
    assert_eq!(json["failed"], 1);
}
