use crate::error::KeeperError;
use crate::keeper::conflict::{self, DecisionProvider, SnapshotConflictChoice};
use crate::keeper::fsops;
use crate::keeper::host::ProjectHost;
use crate::keeper::resolve;
use crate::keeper::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SnapshotOutcome {
    pub folder_name: String,
    pub path: PathBuf,
    pub files_copied: usize,
    pub files_verified: usize,
}

/// Create the next version snapshot of the live project.
///
/// Resolving -> ConflictCheck -> Creating -> Copying -> Saving ->
/// Verifying. Every failure comes back as a structured [`KeeperError`];
/// cancellation at the conflict decision is `OperationCancelled`. There is
/// no automatic retry at any step, and a verification failure leaves the
/// partially written target in place for the caller to inspect.
///
/// Overwrite writes files over the existing target in place; stale files
/// that no longer exist in the source are not cleared first. This matches
/// the historical behavior and is a documented limitation.
pub fn create(
    host: &dyn ProjectHost,
    settings: &Settings,
    decisions: &dyn DecisionProvider,
) -> Result<SnapshotOutcome, KeeperError> {
    let codec = settings.codec();

    // Resolving
    let live = host.current_project_path();
    let info = resolve::project_info(live.as_deref(), &codec)?;
    let next = resolve::next_version(&info, &codec, settings.naming.start_version)?;

    let mut folder = format!("{}{}", info.base_name, codec.encode(next));
    let mut target = info.parent_directory.join(&folder);

    // ConflictCheck
    if target.exists() {
        match decisions.on_snapshot_conflict(&target) {
            SnapshotConflictChoice::Cancel => return Err(KeeperError::OperationCancelled),
            SnapshotConflictChoice::Alongside => {
                folder = conflict::alongside_name(&info.parent_directory, &folder)?;
                target = info.parent_directory.join(&folder);
            }
            SnapshotConflictChoice::Overwrite => {}
        }
    }

    // Creating
    fs::create_dir_all(&target).map_err(|err| KeeperError::DirectoryCreateFailed {
        path: target.display().to_string(),
        detail: err.to_string(),
    })?;

    // Copying: everything under the project directory except the live
    // project file itself, which the host regenerates at the new path.
    let source_files = fsops::walk_files(&info.directory).map_err(|err| {
        KeeperError::CopyFailed {
            copied: 0,
            failures: vec![format!("{err:#}")],
        }
    })?;
    let source_total = source_files.len();

    let mut copied = 0usize;
    let mut failures = Vec::new();
    for file in &source_files {
        if *file == info.full_path {
            continue;
        }
        let Ok(relative) = file.strip_prefix(&info.directory) else {
            failures.push(format!("{} is outside the project directory", file.display()));
            continue;
        };
        let dest = target.join(relative);
        if let Some(parent) = dest.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                failures.push(format!("failed to create {}: {err}", parent.display()));
                continue;
            }
        }
        match fs::copy(file, &dest) {
            Ok(_) => copied += 1,
            Err(err) => failures.push(format!(
                "failed to copy {} to {}: {err}",
                file.display(),
                dest.display()
            )),
        }
    }
    if !failures.is_empty() {
        return Err(KeeperError::CopyFailed { copied, failures });
    }

    // Saving
    let project_file = target.join(info.project_file_name(&folder));
    host.save_project_as(&project_file)
        .map_err(|err| KeeperError::SaveFailed {
            path: project_file.display().to_string(),
            detail: format!("{err:#}"),
        })?;

    // Verifying
    let (files_verified, reasons) = verify_target(&target, &project_file, source_total);
    if !reasons.is_empty() {
        return Err(KeeperError::VerificationFailed { reasons });
    }

    Ok(SnapshotOutcome {
        folder_name: folder,
        path: target,
        files_copied: copied,
        files_verified,
    })
}

/// Post-copy checks: the target directory exists, the regenerated project
/// file exists, and the target holds at least as many files as the source
/// did before copying.
fn verify_target(target: &Path, project_file: &Path, source_total: usize) -> (usize, Vec<String>) {
    let mut reasons = Vec::new();

    if !target.is_dir() {
        reasons.push(format!("target directory {} does not exist", target.display()));
    }
    if !project_file.is_file() {
        reasons.push(format!(
            "project file {} does not exist",
            project_file.display()
        ));
    }

    let found = match fsops::count_files(target) {
        Ok(found) => found,
        Err(err) => {
            reasons.push(format!("could not count files under target: {err:#}"));
            0
        }
    };
    if found < source_total {
        reasons.push(format!(
            "found {found} files under target but source had {source_total}"
        ));
    }

    (found, reasons)
}

#[cfg(test)]
mod tests {
    use super::{create, verify_target};
    use crate::error::KeeperError;
    use crate::keeper::conflict::{ArchiveConflictChoice, FixedDecisions, SnapshotConflictChoice};
    use crate::keeper::host::FileProjectHost;
    use crate::keeper::settings::Settings;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn decisions(snapshot: SnapshotConflictChoice) -> FixedDecisions {
        FixedDecisions {
            snapshot,
            archive: ArchiveConflictChoice::Skip,
        }
    }

    fn seed_project(root: &Path, dir_name: &str, file_name: &str) -> PathBuf {
        let dir = root.join(dir_name);
        fs::create_dir_all(dir.join("stems")).expect("mkdir");
        fs::write(dir.join("notes.txt"), b"notes").expect("write");
        fs::write(dir.join("stems/bass.wav"), b"audio").expect("write");
        let project = dir.join(file_name);
        fs::write(&project, b"project-data").expect("write project");
        project
    }

    #[test]
    fn unversioned_project_with_v001_sibling_snapshots_to_v002() {
        let tmp = tempdir().expect("tempdir");
        let project = seed_project(tmp.path(), "Song", "Song.proj");
        fs::create_dir(tmp.path().join("Song_v001")).expect("mkdir");

        let host = FileProjectHost::new(Some(project));
        let outcome = create(
            &host,
            &Settings::default(),
            &decisions(SnapshotConflictChoice::Cancel),
        )
        .expect("snapshot");

        assert_eq!(outcome.folder_name, "Song_v002");
        assert_eq!(outcome.path, tmp.path().join("Song_v002"));
        assert_eq!(outcome.files_copied, 2);
        assert_eq!(outcome.files_verified, 3);
        assert!(tmp.path().join("Song_v002/Song_v002.proj").is_file());
        assert!(tmp.path().join("Song_v002/stems/bass.wav").is_file());
        // Live project file is regenerated, not copied under its old name.
        assert!(!tmp.path().join("Song_v002/Song.proj").exists());
    }

    #[test]
    fn versioned_project_increments_its_own_number() {
        let tmp = tempdir().expect("tempdir");
        let project = seed_project(tmp.path(), "Song_v004", "Song_v004.proj");

        let host = FileProjectHost::new(Some(project));
        let outcome = create(
            &host,
            &Settings::default(),
            &decisions(SnapshotConflictChoice::Cancel),
        )
        .expect("snapshot");

        assert_eq!(outcome.folder_name, "Song_v005");
        assert!(tmp.path().join("Song_v005/Song_v005.proj").is_file());
    }

    #[test]
    fn cancel_decision_reports_operation_cancelled() {
        let tmp = tempdir().expect("tempdir");
        // A versioned project whose next number already exists on disk:
        // v002 is open, v003 was created earlier.
        let project = seed_project(tmp.path(), "Song_v002", "Song_v002.proj");
        fs::create_dir(tmp.path().join("Song_v003")).expect("mkdir");

        let host = FileProjectHost::new(Some(project));
        let err = create(
            &host,
            &Settings::default(),
            &decisions(SnapshotConflictChoice::Cancel),
        )
        .unwrap_err();

        assert!(matches!(err, KeeperError::OperationCancelled));
        // Nothing was written into the conflicting target.
        assert_eq!(
            fs::read_dir(tmp.path().join("Song_v003"))
                .expect("read")
                .count(),
            0
        );
    }

    #[test]
    fn alongside_decision_takes_first_free_suffix() {
        let tmp = tempdir().expect("tempdir");
        let project = seed_project(tmp.path(), "Song_v002", "Song_v002.proj");
        fs::create_dir(tmp.path().join("Song_v003")).expect("mkdir");
        fs::create_dir(tmp.path().join("Song_v003_a")).expect("mkdir");

        let host = FileProjectHost::new(Some(project));
        let outcome = create(
            &host,
            &Settings::default(),
            &decisions(SnapshotConflictChoice::Alongside),
        )
        .expect("snapshot");

        assert_eq!(outcome.folder_name, "Song_v003_b");
        assert!(tmp.path().join("Song_v003_b/Song_v003_b.proj").is_file());
    }

    #[test]
    fn overwrite_decision_leaves_stale_target_files_in_place() {
        let tmp = tempdir().expect("tempdir");
        let project = seed_project(tmp.path(), "Song_v002", "Song_v002.proj");
        let target = tmp.path().join("Song_v003");
        fs::create_dir(&target).expect("mkdir");
        fs::write(target.join("stale.txt"), b"old").expect("write");

        let host = FileProjectHost::new(Some(project));
        let outcome = create(
            &host,
            &Settings::default(),
            &decisions(SnapshotConflictChoice::Overwrite),
        )
        .expect("snapshot");

        assert_eq!(outcome.folder_name, "Song_v003");
        assert!(target.join("stale.txt").is_file());
        assert!(target.join("Song_v003.proj").is_file());
    }

    #[test]
    fn missing_project_is_no_project_loaded() {
        let host = FileProjectHost::new(None);
        let err = create(
            &host,
            &Settings::default(),
            &decisions(SnapshotConflictChoice::Cancel),
        )
        .unwrap_err();
        assert!(matches!(err, KeeperError::NoProjectLoaded));
    }

    #[test]
    fn verification_reports_itemized_count_mismatch() {
        let tmp = tempdir().expect("tempdir");
        let target = tmp.path().join("Song_v002");
        fs::create_dir(&target).expect("mkdir");
        let project_file = target.join("Song_v002.proj");
        fs::write(&project_file, b"project-data").expect("write");

        let (found, reasons) = verify_target(&target, &project_file, 5);
        assert_eq!(found, 1);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("found 1 files under target but source had 5"));
    }

    #[test]
    fn verification_flags_missing_project_file() {
        let tmp = tempdir().expect("tempdir");
        let target = tmp.path().join("Song_v002");
        fs::create_dir(&target).expect("mkdir");

        let (_, reasons) = verify_target(&target, &target.join("Song_v002.proj"), 0);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("does not exist"));
    }
}
