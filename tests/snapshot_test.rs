use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn seed_project(root: &Path, dir_name: &str, file_name: &str) -> std::path::PathBuf {
    let dir = root.join(dir_name);
    fs::create_dir_all(&dir).expect("mkdir project");
    fs::write(dir.join("notes.txt"), "take two\n").expect("write notes");
    let project = dir.join(file_name);
    fs::write(&project, "project-data\n").expect("write project");
    project
}

#[test]
fn snapshot_creates_next_version_folder() {
    let tmp = tempdir().expect("tempdir");
    let project = seed_project(tmp.path(), "Song", "Song.proj");
    fs::create_dir(tmp.path().join("Song_v001")).expect("mkdir sibling");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env("VERSKEEP_PROJECT", &project)
        .arg("snapshot")
        .assert()
        .success()
        .stdout(predicates::str::contains("created Song_v002"));

    assert!(tmp.path().join("Song_v002/Song_v002.proj").is_file());
    assert!(tmp.path().join("Song_v002/notes.txt").is_file());
}

#[test]
fn snapshot_cancel_on_conflict_exits_cleanly() {
    let tmp = tempdir().expect("tempdir");
    let project = seed_project(tmp.path(), "Song_v002", "Song_v002.proj");
    fs::create_dir(tmp.path().join("Song_v003")).expect("mkdir conflict");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env("VERSKEEP_PROJECT", &project)
        .arg("snapshot")
        .arg("--on-conflict")
        .arg("cancel")
        .assert()
        .success()
        .stdout(predicates::str::contains("cancelled"));

    // The conflicting folder was left untouched.
    assert_eq!(
        fs::read_dir(tmp.path().join("Song_v003")).expect("read").count(),
        0
    );
}

#[test]
fn snapshot_without_project_fails_with_specific_message() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("verskeep")
        .current_dir(tmp.path())
        .env("VERSKEEP_CONFIG_PATH", tmp.path().join("none.toml"))
        .env_remove("VERSKEEP_PROJECT")
        .arg("snapshot")
        .assert()
        .failure()
        .stderr(predicates::str::contains("no project loaded"));
}
