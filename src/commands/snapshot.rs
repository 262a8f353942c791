use crate::commands::CommandReport;
use crate::error::KeeperError;
use crate::keeper::conflict::{ArchiveConflictChoice, FixedDecisions, SnapshotConflictChoice};
use crate::keeper::host::FileProjectHost;
use crate::keeper::settings;
use crate::keeper::snapshot;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct SnapshotOptions {
    pub project: Option<PathBuf>,
    pub on_conflict: Option<SnapshotConflictChoice>,
}

pub fn project_from(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        env::var("VERSKEEP_PROJECT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

pub fn run(opts: &SnapshotOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("snapshot");
    let settings = settings::load_settings()?;

    let host = FileProjectHost::new(project_from(opts.project.clone()));
    let decisions = FixedDecisions {
        snapshot: opts.on_conflict.unwrap_or(SnapshotConflictChoice::Cancel),
        archive: ArchiveConflictChoice::Skip,
    };

    match snapshot::create(&host, &settings, &decisions) {
        Ok(outcome) => {
            report.detail(format!("created {}", outcome.folder_name));
            report.detail(format!("path={}", outcome.path.display()));
            report.detail(format!(
                "files copied={} verified={}",
                outcome.files_copied, outcome.files_verified
            ));
        }
        Err(KeeperError::OperationCancelled) => {
            // A chosen outcome, not a failure.
            report.detail("snapshot cancelled at conflict decision");
        }
        Err(err) => {
            report.issue(err.to_string());
        }
    }

    Ok(report)
}
