#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn notebox(data: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("notebox"));
    cmd.env("NOTEBOX_DATA", data.as_os_str());
    cmd
}

/// Run a create command and pull the new id out of "Created ... (<id>)".
fn created_id(data: &Path, args: &[&str]) -> String {
    let output = notebox(data).args(args).output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.rfind('(').unwrap() + 1;
    let end = stdout.rfind(')').unwrap();
    stdout[start..end].to_string()
}

#[test]
fn test_naked_run_shows_seeded_root() {
    let temp = TempDir::new().unwrap();
    notebox(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("My Documents"))
        .stdout(predicate::str::contains("root"));
    assert!(temp.path().join("folders.json").exists());
}

#[test]
fn test_create_write_show_workflow() {
    let temp = TempDir::new().unwrap();
    let data = temp.path();

    let folder = created_id(data, &["mkdir", "Journal"]);
    let file = created_id(data, &["new", "today.md", "--folder", &folder[..8]]);

    notebox(data)
        .args(["write", &file[..8], "# Monday"])
        .assert()
        .success();
    notebox(data)
        .args(["show", &file])
        .assert()
        .success()
        .stdout("# Monday\n");
    notebox(data)
        .args(["tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Journal"))
        .stdout(predicate::str::contains("today.md"));
}

#[test]
fn test_write_reads_stdin() {
    let temp = TempDir::new().unwrap();
    let data = temp.path();
    let file = created_id(data, &["new", "piped.md"]);

    notebox(data)
        .args(["write", &file])
        .write_stdin("from a pipe\n")
        .assert()
        .success();
    notebox(data)
        .args(["show", &file])
        .assert()
        .stdout("from a pipe\n");
}

#[test]
fn test_rmdir_guards_non_empty_and_root() {
    let temp = TempDir::new().unwrap();
    let data = temp.path();
    let folder = created_id(data, &["mkdir", "Full"]);
    created_id(data, &["new", "n.md", "--folder", &folder]);

    notebox(data)
        .args(["rmdir", &folder])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-empty"));
    notebox(data)
        .args(["rmdir", "root", "-r"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot delete root folder"));
    notebox(data)
        .args(["rmdir", &folder, "-r"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s)"));
}

#[test]
fn test_missing_file_is_reported() {
    let temp = TempDir::new().unwrap();
    notebox(temp.path())
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found: nope"));
}

#[test]
fn test_export_then_skip_import_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("store");
    let export = temp.path().join("export.json");
    let folder = created_id(&data, &["mkdir", "Recipes"]);
    created_id(&data, &["new", "miso.md", "-f", &folder, "-c", "dashi"]);

    notebox(&data)
        .args(["export", export.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 folder(s) and 1 file(s)"));
    let before = fs::read_to_string(data.join("files.json")).unwrap();

    notebox(&data)
        .args(["import", export.to_str().unwrap(), "--strategy", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 folder(s) and 1 file(s)."));

    assert_eq!(fs::read_to_string(data.join("files.json")).unwrap(), before);
}

#[test]
fn test_duplicate_import_adds_suffixed_copy() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("store");
    let export = temp.path().join("export.json");
    created_id(&data, &["new", "readme.md", "-c", "hi"]);
    notebox(&data)
        .args(["export", export.to_str().unwrap()])
        .assert()
        .success();

    notebox(&data)
        .args(["import", export.to_str().unwrap(), "-s", "duplicate"])
        .assert()
        .success();

    notebox(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("readme.md (imported)"));
}

#[test]
fn test_malformed_import_fails() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("store");
    let bad = temp.path().join("bad.json");
    fs::write(&bad, r#"{"version": "1.0", "exportedAt": 0, "files": []}"#).unwrap();

    notebox(&data)
        .args(["import", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid import data format"));
}

#[test]
fn test_doctor_on_clean_store() {
    let temp = TempDir::new().unwrap();
    notebox(temp.path())
        .args(["doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No inconsistencies found."));
}
