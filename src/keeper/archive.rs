use crate::error::KeeperError;
use crate::keeper::conflict::{ArchiveConflictChoice, DecisionProvider};
use crate::keeper::fsops;
use crate::keeper::scan::VersionEntry;
use crate::keeper::warn;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One line of the append-only ledger kept in the archive destination.
/// The ledger is a record of what was moved and when; the directory names
/// on disk remain the source of truth for which versions exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveLedgerRecord {
    pub name: String,
    pub version: u32,
    pub source_path: String,
    pub archive_path: String,
    pub archived_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveRunOutcome {
    pub archived: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub aborted_at: Option<String>,
}

/// Versions eligible for archival: strictly older than
/// `current - keep`, with the current version unconditionally protected
/// even when `keep` is zero or negative. Entries come back in ascending
/// version order. An empty selection is a valid terminal outcome.
pub fn versions_to_archive(current: u32, keep: i64, entries: &[VersionEntry]) -> Vec<VersionEntry> {
    let cutoff = i64::from(current) - keep;
    entries
        .iter()
        .filter(|entry| i64::from(entry.version) < cutoff && entry.version != current)
        .cloned()
        .collect()
}

fn ledger_path(destination: &Path) -> PathBuf {
    destination.join("ledger.jsonl")
}

pub fn read_ledger(destination: &Path) -> Result<Vec<ArchiveLedgerRecord>> {
    let path = ledger_path(destination);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut out = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: ArchiveLedgerRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("failed to parse ledger line in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

fn append_ledger(destination: &Path, record: &ArchiveLedgerRecord) -> Result<()> {
    let path = ledger_path(destination);
    let line = format!("{}\n", serde_json::to_string(record)?);
    use std::io::Write;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("failed to append to {}", path.display()))?;
    Ok(())
}

/// Move each selected version into `destination`, ascending, with
/// copy-then-verify-then-delete semantics: a source directory is never
/// deleted before its copy is confirmed present at the destination.
///
/// Per-entry failures are recorded and skipped; Abort stops the run and
/// preserves partial progress. The run comes back as
/// `PartialArchiveFailure` when any entry failed, carrying the counts and
/// the ordered per-entry messages.
pub fn run(
    selection: &[VersionEntry],
    destination: &Path,
    decisions: &dyn DecisionProvider,
) -> Result<ArchiveRunOutcome, KeeperError> {
    fs::create_dir_all(destination).map_err(|err| KeeperError::DirectoryCreateFailed {
        path: destination.display().to_string(),
        detail: err.to_string(),
    })?;

    let mut outcome = ArchiveRunOutcome::default();

    for entry in selection {
        let dest = destination.join(&entry.name);

        if dest.exists() {
            match decisions.on_archive_conflict(&entry.name) {
                ArchiveConflictChoice::Abort => {
                    outcome.aborted_at = Some(entry.name.clone());
                    break;
                }
                ArchiveConflictChoice::Skip => {
                    outcome.skipped += 1;
                    continue;
                }
                ArchiveConflictChoice::Replace => {
                    if let Err(err) = fsops::remove_tree(&dest) {
                        warn::emit(
                            "REPLACE_DELETE_FAILED",
                            "archive",
                            &dest.display().to_string(),
                            &format!("{err:#}"),
                        );
                        outcome.errors.push(format!(
                            "{}: failed to replace existing destination: {err:#}",
                            entry.name
                        ));
                        continue;
                    }
                }
            }
        }

        if let Err(err) = fsops::copy_tree(&entry.path, &dest) {
            warn::emit(
                "COPY_FAILED",
                "archive",
                &entry.path.display().to_string(),
                &format!("{err:#}"),
            );
            outcome
                .errors
                .push(format!("{}: copy failed: {err:#}", entry.name));
            continue;
        }

        if !dest.exists() {
            outcome.errors.push(format!(
                "{}: destination missing after copy; source left in place",
                entry.name
            ));
            continue;
        }

        outcome.archived += 1;

        let record = ArchiveLedgerRecord {
            name: entry.name.clone(),
            version: entry.version,
            source_path: entry.path.display().to_string(),
            archive_path: dest.display().to_string(),
            archived_at: chrono::Utc::now().to_rfc3339(),
        };
        if let Err(err) = append_ledger(destination, &record) {
            warn::emit(
                "LEDGER_APPEND_FAILED",
                "archive",
                &ledger_path(destination).display().to_string(),
                &format!("{err:#}"),
            );
        }

        // Copy confirmed above; only now is the source removed.
        if let Err(err) = fsops::remove_tree(&entry.path) {
            outcome.errors.push(format!(
                "{}: archived but not removed from source: {err:#}",
                entry.name
            ));
        }
    }

    if outcome.errors.is_empty() {
        Ok(outcome)
    } else {
        Err(KeeperError::PartialArchiveFailure {
            archived: outcome.archived,
            skipped: outcome.skipped,
            errors: outcome.errors,
            aborted_at: outcome.aborted_at,
        })
    }
}
