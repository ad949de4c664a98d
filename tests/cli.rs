use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCENARIO: &str = r#"[{"Valuation_ID":1,"X":"a"},{"Valuation_ID":2,"X":"b"},{"Valuation_ID":3,"X":"c"}]"#;

fn valsplit_cmd() -> Result<Command> {
    let mut cmd = Command::cargo_bin("valsplit")?;
    // Log level comes from the flags alone
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn outputs(dir: &Path, base: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{}_PropertiesIncluded.json", base)),
        dir.join(format!("{}_PropertiesExcluded.json", base)),
    )
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn menu_selection_through_stdin() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--selector", "menu"])
        .write_stdin("1\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[1] ID 2 | X: b"))
        .stdout(predicate::str::contains("march_PropertiesIncluded.json"))
        .stdout(predicate::str::contains("march_PropertiesExcluded.json"));

    let (included, excluded) = outputs(dir.path(), "march");
    assert_eq!(
        read_json(&included)?,
        json!([{"Valuation_ID": 1, "X": "a"}, {"Valuation_ID": 3, "X": "c"}])
    );
    assert_eq!(read_json(&excluded)?, json!([{"Valuation_ID": 2, "X": "b"}]));
    Ok(())
}

#[test]
fn quit_cancels_without_writing() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .write_stdin("q\n")
        .assert()
        .code(130)
        .stdout(predicate::str::contains("Cancelled"));

    let (included, excluded) = outputs(dir.path(), "march");
    assert!(!included.exists());
    assert!(!excluded.exists());
    Ok(())
}

#[test]
fn closed_stdin_cancels() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .write_stdin("")
        .assert()
        .code(130);

    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn unusable_tokens_export_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--select", "5, abc", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOTHING TO EXPORT"));

    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn json_report_lists_both_files() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    let output = valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--select", "0,2", "--output-format", "json"])
        .output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["total_records"], 3);
    assert_eq!(report["excluded_ids"], json!(["1", "3"]));
    assert_eq!(report["export"]["included"]["records"], 1);
    assert_eq!(report["export"]["excluded"]["records"], 2);
    Ok(())
}

#[test]
fn json_stdout_stays_one_document_after_fallback_warning() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    // Piped stdin has no terminal, so the checklist falls back with a warning
    let output = valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--selector", "checklist", "--output-format", "json"])
        .write_stdin("1\n")
        .output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["excluded_ids"], json!(["2"]));
    assert!(String::from_utf8(output.stderr)?.contains("\"level\":\"warning\""));
    Ok(())
}

#[test]
fn missing_file_is_reported() -> Result<()> {
    let dir = TempDir::new()?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(dir.path().join("nope.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
    Ok(())
}

#[test]
fn malformed_json_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "broken.json", "[{\"Valuation_ID\": 1,")?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--select", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not valid JSON"));

    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn missing_identifier_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;

    for contents in ["[]", r#"[{"Other":1}]"#] {
        let input = write_input(&dir, "bad.json", contents)?;

        valsplit_cmd()?
            .current_dir(dir.path())
            .arg(&input)
            .args(["--select", "0"])
            .assert()
            .code(4);
    }

    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn path_is_prompted_for_when_omitted() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .write_stdin(format!("\"{}\"\n2\n", input.display()))
        .assert()
        .success();

    let (_, excluded) = outputs(dir.path(), "march");
    assert_eq!(read_json(&excluded)?, json!([{"Valuation_ID": 3, "X": "c"}]));
    Ok(())
}

#[test]
fn custom_id_field_and_output_dir() -> Result<()> {
    let dir = TempDir::new()?;
    let out = TempDir::new()?;
    let input = write_input(
        &dir,
        "keys.json",
        r#"{"PropertyKey": "P-1", "Detail": {"Rooms": [1, 2, {"Bath": true}]}}"#,
    )?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--id-field", "PropertyKey", "--select", "0", "--compact"])
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success();

    let (included, excluded) = outputs(out.path(), "keys");
    assert_eq!(fs::read_to_string(&included)?, "[]\n");
    assert_eq!(
        read_json(&excluded)?,
        json!([{"PropertyKey": "P-1", "Detail": {"Rooms": [1, 2, {"Bath": true}]}}])
    );
    Ok(())
}

#[test]
fn dry_run_writes_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Records:    3"))
        .stdout(predicate::str::contains("march_PropertiesExcluded.json"));

    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn config_file_is_honored() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, "march.json", SCENARIO)?;
    fs::write(
        dir.path().join("valsplit.toml"),
        "[output]\nincluded_suffix = \"_Keep\"\nexcluded_suffix = \"_Drop\"\n",
    )?;

    valsplit_cmd()?
        .current_dir(dir.path())
        .arg(&input)
        .args(["--select", "0"])
        .assert()
        .success();

    assert!(dir.path().join("march_Keep.json").is_file());
    assert!(dir.path().join("march_Drop.json").is_file());
    Ok(())
}

#[test]
fn generate_config_writes_sample() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sample.toml");

    valsplit_cmd()?
        .arg("--generate-config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success();

    assert!(fs::read_to_string(&path)?.contains("id_field = \"Valuation_ID\""));
    Ok(())
}
