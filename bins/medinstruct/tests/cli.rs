//! End-to-end tests for the medinstruct binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn catalog_path(dir: &TempDir) -> PathBuf {
    dir.path().join("catalog.json")
}

/// Command running inside `dir` with its catalog file
fn medinstruct(dir: &TempDir) -> Command {
    let mut cmd = bare(dir);
    cmd.arg("--catalog").arg(catalog_path(dir));
    cmd
}

/// Command running inside `dir` with no catalog flag
fn bare(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("medinstruct").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("MEDINSTRUCT_CATALOG");
    cmd
}

fn seeded() -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, instructions) in [
        ("Mometasone Cream/Ointment", "Apply a thin film once daily."),
        ("Tacrolimus Ointment", "Apply twice daily to affected skin."),
        ("Hydrocortisone Cream", "Apply up to three times daily."),
    ] {
        medinstruct(&dir)
            .args(["catalog", "add", name, instructions])
            .assert()
            .success();
    }
    dir
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn search_prints_best_match() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["search", "mometasone", "ointment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mometasone Cream/Ointment"))
        .stdout(predicate::str::contains("100.0%"))
        .stdout(predicate::str::contains("matched: mometasone ointment"))
        .stdout(predicate::str::contains("Apply a thin film once daily."));
}

#[test]
fn search_json_output() {
    let dir = seeded();
    let json = stdout_json(medinstruct(&dir).args(["--json", "search", "mometasone ointment"]));

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Mometasone Cream/Ointment");
    assert_eq!(results[0]["matchedVariant"], "mometasone ointment");
    assert_eq!(results[0]["score"], 1.0);
    assert_eq!(json["cutoff"], 0.25);
    assert_eq!(json["maxResults"], 10);
}

#[test]
fn search_without_text_is_rejected() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["search", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please enter a medicine name to search"));
}

#[test]
fn search_without_matches_succeeds() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["search", "aspirin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching medicine found"));
}

#[test]
fn search_rejects_out_of_range_cutoff() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["--cutoff", "1.5", "search", "mometasone"])
        .assert()
        .code(2);
}

#[test]
fn scan_reads_text_file() {
    let dir = seeded();
    let label = dir.path().join("label.txt");
    std::fs::write(&label, "Rx 1234\nTacrolimus 0.1% ointment\nuse as directed").unwrap();

    let json = stdout_json(medinstruct(&dir).arg("--json").arg("scan").arg(&label));
    let names: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tacrolimus Ointment"]);
}

#[test]
fn scan_reads_stdin() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["scan", "-"])
        .write_stdin("HYDROCORTISONE CREAM 1%")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hydrocortisone Cream"));
}

#[test]
fn scan_rejects_images() {
    let dir = seeded();
    let image = dir.path().join("label.png");
    std::fs::write(&image, [0x89, 0x50, 0x4e, 0x47]).unwrap();

    medinstruct(&dir)
        .arg("scan")
        .arg(&image)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn catalog_list_and_export() {
    let dir = seeded();

    let list = stdout_json(medinstruct(&dir).args(["--json", "catalog", "list"]));
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Hydrocortisone Cream", "Mometasone Cream/Ointment", "Tacrolimus Ointment"]
    );

    let export = stdout_json(medinstruct(&dir).args(["catalog", "export"]));
    assert_eq!(export["Tacrolimus Ointment"], "Apply twice daily to affected skin.");
}

#[test]
fn catalog_add_duplicate_fails() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["catalog", "add", "Tacrolimus Ointment", "Again"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn catalog_show_suggests_close_name() {
    let dir = seeded();
    medinstruct(&dir)
        .args(["catalog", "show", "Tacrolimus Ointmen"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Did you mean 'Tacrolimus Ointment'?"));
}

#[test]
fn catalog_update_and_remove() {
    let dir = seeded();
    // ids follow insertion order
    medinstruct(&dir)
        .args(["catalog", "update", "2", "Tacrolimus Ointment 0.03%", "Apply thinly."])
        .assert()
        .success();
    medinstruct(&dir)
        .args(["catalog", "show", "Tacrolimus Ointment 0.03%"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Apply thinly."));

    medinstruct(&dir)
        .args(["catalog", "remove", "2"])
        .assert()
        .success();
    medinstruct(&dir)
        .args(["catalog", "remove", "2"])
        .assert()
        .code(4);
}

#[test]
fn catalog_path_from_environment() {
    let dir = seeded();
    bare(&dir)
        .env("MEDINSTRUCT_CATALOG", catalog_path(&dir))
        .args(["catalog", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hydrocortisone Cream"));
}

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();
    bare(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[matching]"))
        .stdout(predicate::str::contains("cutoff = 0.25"));
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".medinstruct.toml"), "[matching]\ncutoff = 2.0\n").unwrap();

    bare(&dir)
        .args(["config", "validate"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("matching.cutoff"));

    bare(&dir).args(["search", "mometasone"]).assert().code(3);
}

#[test]
fn unknown_log_format_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".medinstruct.toml"),
        "[logging]\nformat = \"pretty\"\n",
    )
    .unwrap();

    bare(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("format = \"pretty\""))
        .stderr(predicate::str::contains("Unknown log format 'pretty'"));
}
