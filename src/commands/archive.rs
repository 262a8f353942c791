use crate::commands::CommandReport;
use crate::commands::snapshot::project_from;
use crate::error::KeeperError;
use crate::keeper::archive;
use crate::keeper::conflict::{ArchiveConflictChoice, FixedDecisions, SnapshotConflictChoice};
use crate::keeper::resolve;
use crate::keeper::scan;
use crate::keeper::settings;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    pub project: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub keep: Option<i64>,
    pub on_conflict: Option<ArchiveConflictChoice>,
    pub dry_run: bool,
}

pub fn run(opts: &ArchiveOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("archive");
    let settings = settings::load_settings()?;
    let codec = settings.codec();

    let live = project_from(opts.project.clone());
    let info = match resolve::project_info(live.as_deref(), &codec) {
        Ok(info) => info,
        Err(err) => {
            report.issue(err.to_string());
            return Ok(report);
        }
    };

    let keep = opts.keep.unwrap_or(settings.archive.versions_to_keep);
    let destination = opts
        .dest
        .clone()
        .or_else(|| settings.archive.destination.clone())
        .unwrap_or_else(|| info.parent_directory.join("archive"));

    let entries = scan::list_version_entries(&info.parent_directory, &info.base_name, &codec);
    if entries.is_empty() {
        report.detail("no versioned folders found");
        return Ok(report);
    }

    // An unversioned project is the original copy: protect it as version 0.
    let current = info.current_version.unwrap_or(0);
    let selection = archive::versions_to_archive(current, keep, &entries);
    report.detail(format!(
        "current version={current} keep={keep} candidates={} eligible={}",
        entries.len(),
        selection.len()
    ));
    if selection.is_empty() {
        report.detail("no versioned folders eligible for archive");
        return Ok(report);
    }

    if opts.dry_run {
        for entry in &selection {
            report.detail(format!("would archive {} -> {}", entry.name, destination.display()));
        }
        return Ok(report);
    }

    let decisions = FixedDecisions {
        snapshot: SnapshotConflictChoice::Cancel,
        archive: opts.on_conflict.unwrap_or(ArchiveConflictChoice::Skip),
    };

    match archive::run(&selection, &destination, &decisions) {
        Ok(outcome) => {
            report.detail(format!(
                "archived={} skipped={} destination={}",
                outcome.archived,
                outcome.skipped,
                destination.display()
            ));
            if let Some(name) = outcome.aborted_at {
                report.detail(format!("aborted at {name}; later versions untouched"));
            }
        }
        Err(KeeperError::PartialArchiveFailure {
            archived,
            skipped,
            errors,
            aborted_at,
        }) => {
            report.detail(format!("archived={archived} skipped={skipped}"));
            if let Some(name) = aborted_at {
                report.detail(format!("aborted at {name}; later versions untouched"));
            }
            for message in errors {
                report.issue(message);
            }
        }
        Err(err) => {
            report.issue(err.to_string());
        }
    }

    Ok(report)
}
