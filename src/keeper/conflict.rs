use crate::error::KeeperError;
use std::path::Path;

/// What to do when the snapshot target folder already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotConflictChoice {
    /// Create next to the existing folder under a `_a`..`_z` suffix.
    Alongside,
    /// Write into the existing folder in place. Stale files already
    /// present in the target are not cleared first.
    Overwrite,
    Cancel,
}

/// What to do when an archive destination folder already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveConflictChoice {
    Skip,
    Replace,
    Abort,
}

/// Synchronous source of conflict decisions: a blocking prompt, or a
/// pre-supplied policy for automation and tests. Each conflicting path is
/// decided once; decisions are never retried.
pub trait DecisionProvider {
    fn on_snapshot_conflict(&self, target: &Path) -> SnapshotConflictChoice;
    fn on_archive_conflict(&self, existing_name: &str) -> ArchiveConflictChoice;
}

/// Fixed policy taken from CLI flags; answers every conflict the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecisions {
    pub snapshot: SnapshotConflictChoice,
    pub archive: ArchiveConflictChoice,
}

impl DecisionProvider for FixedDecisions {
    fn on_snapshot_conflict(&self, _target: &Path) -> SnapshotConflictChoice {
        self.snapshot
    }

    fn on_archive_conflict(&self, _existing_name: &str) -> ArchiveConflictChoice {
        self.archive
    }
}

/// First `folder` + `_a`..`_z` name with no existing sibling under
/// `parent`. All 26 taken is a hard failure, not retried with another
/// scheme.
pub fn alongside_name(parent: &Path, folder: &str) -> Result<String, KeeperError> {
    for letter in 'a'..='z' {
        let candidate = format!("{folder}_{letter}");
        if !parent.join(&candidate).exists() {
            return Ok(candidate);
        }
    }
    Err(KeeperError::SuffixExhausted(folder.to_string()))
}
