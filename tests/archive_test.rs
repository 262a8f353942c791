use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn seed_version_dir(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("mkdir version");
    fs::write(dir.join("data.txt"), name).expect("write data");
}

#[test]
fn archive_moves_only_versions_past_retention() {
    let tmp = tempdir().expect("tempdir");
    // Current project is v002; siblings are the original, v001, v002.
    seed_version_dir(tmp.path(), "Song");
    seed_version_dir(tmp.path(), "Song_v001");
    seed_version_dir(tmp.path(), "Song_v002");
    let project = tmp.path().join("Song_v002/Song_v002.proj");
    fs::write(&project, "project-data\n").expect("write project");
    let dest = tmp.path().join("vault");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env("VERSKEEP_PROJECT", &project)
        .arg("archive")
        .arg("--dest")
        .arg(&dest)
        .arg("--keep")
        .arg("1")
        .assert()
        .success()
        .stdout(predicates::str::contains("archived=1 skipped=0"));

    // Only the original copy falls past the cutoff; v001 and the current
    // version stay in place.
    assert!(!tmp.path().join("Song").exists());
    assert!(dest.join("Song/data.txt").is_file());
    assert!(tmp.path().join("Song_v001/data.txt").is_file());
    assert!(tmp.path().join("Song_v002").exists());
    assert!(dest.join("ledger.jsonl").is_file());
}

#[test]
fn archive_dry_run_moves_nothing() {
    let tmp = tempdir().expect("tempdir");
    seed_version_dir(tmp.path(), "Song");
    seed_version_dir(tmp.path(), "Song_v005");
    let project = tmp.path().join("Song_v005/Song_v005.proj");
    fs::write(&project, "project-data\n").expect("write project");
    let dest = tmp.path().join("vault");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env("VERSKEEP_PROJECT", &project)
        .arg("archive")
        .arg("--dest")
        .arg(&dest)
        .arg("--keep")
        .arg("1")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicates::str::contains("would archive Song"));

    assert!(tmp.path().join("Song/data.txt").is_file());
    assert!(!dest.exists());
}

#[test]
fn archive_with_no_versions_is_not_an_error() {
    let tmp = tempdir().expect("tempdir");
    // Directory name does not match the project base, so no sibling is a
    // version candidate, not even version 0.
    let project_dir = tmp.path().join("solo/Workdir");
    fs::create_dir_all(&project_dir).expect("mkdir");
    let project = project_dir.join("Piece.proj");
    fs::write(&project, "project-data\n").expect("write project");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env("VERSKEEP_PROJECT", &project)
        .arg("archive")
        .assert()
        .success()
        .stdout(predicates::str::contains("no versioned folders found"));
}

#[test]
fn archive_respects_protected_current_with_zero_keep() {
    let tmp = tempdir().expect("tempdir");
    seed_version_dir(tmp.path(), "Song_v001");
    seed_version_dir(tmp.path(), "Song_v002");
    let project = tmp.path().join("Song_v002/Song_v002.proj");
    fs::write(&project, "project-data\n").expect("write project");
    let dest = tmp.path().join("vault");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env("VERSKEEP_PROJECT", &project)
        .arg("archive")
        .arg("--dest")
        .arg(&dest)
        .arg("--keep")
        .arg("0")
        .assert()
        .success();

    // v001 goes; the current v002 is unconditionally protected.
    assert!(!tmp.path().join("Song_v001").exists());
    assert!(tmp.path().join("Song_v002/Song_v002.proj").is_file());
}
