use crate::commands::CommandReport;
use crate::commands::snapshot::project_from;
use crate::keeper::archive;
use crate::keeper::resolve;
use crate::keeper::scan;
use crate::keeper::settings;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub project: Option<PathBuf>,
}

pub fn run(opts: &StatusOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("status");
    let settings = settings::load_settings()?;
    let codec = settings.codec();

    report.detail(format!(
        "naming: prefix={} digits={} start={}",
        settings.naming.prefix, settings.naming.digits, settings.naming.start_version
    ));

    let live = project_from(opts.project.clone());
    let info = match resolve::project_info(live.as_deref(), &codec) {
        Ok(info) => info,
        Err(err) => {
            report.issue(err.to_string());
            return Ok(report);
        }
    };

    report.detail(format!("project={}", info.full_path.display()));
    report.detail(format!("base={}", info.base_name));
    report.detail(match info.current_version {
        Some(v) => format!("current version={v}"),
        None => "current version=none (unversioned)".to_string(),
    });
    match resolve::next_version(&info, &codec, settings.naming.start_version) {
        Ok(next) => report.detail(format!("next version={next}")),
        Err(err) => report.issue(err.to_string()),
    }

    let entries = scan::list_version_entries(&info.parent_directory, &info.base_name, &codec);
    report.detail(format!("versions on disk={}", entries.len()));
    for entry in &entries {
        report.detail(format!("  v{:03} {}", entry.version, entry.name));
    }

    let current = info.current_version.unwrap_or(0);
    let eligible =
        archive::versions_to_archive(current, settings.archive.versions_to_keep, &entries);
    report.detail(format!(
        "archive eligible (keep={})={}",
        settings.archive.versions_to_keep,
        eligible.len()
    ));
    for entry in &eligible {
        report.detail(format!("  would archive {}", entry.name));
    }

    Ok(report)
}
