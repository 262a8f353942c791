use crate::commands::CommandReport;
use crate::keeper::settings;
use anyhow::Result;

include!(concat!(env!("OUT_DIR"), "/verskeep_env_allowlist.rs"));

#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub write: bool,
}

pub fn run(opts: &ConfigOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("config");
    let loaded = settings::load_settings()?;

    match settings::settings_path() {
        Some(path) => {
            report.detail(format!("config path={}", path.display()));
            if !path.exists() {
                report.detail("config file not present; defaults and env apply");
            }
        }
        None => report.issue("config path could not be resolved (no home directory)"),
    }

    report.detail(format!(
        "naming: prefix={} digits={} start={}",
        loaded.naming.prefix, loaded.naming.digits, loaded.naming.start_version
    ));
    report.detail(format!(
        "archive: keep={} destination={}",
        loaded.archive.versions_to_keep,
        loaded
            .archive
            .destination
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<parent>/archive".to_string())
    ));
    report.detail(format!(
        "recognized env keys: {}",
        GENERATED_VERSKEEP_ENV_ALLOWLIST.join(", ")
    ));

    if opts.write {
        let path = settings::write_settings(&loaded)?;
        report.detail(format!("wrote {}", path.display()));
    }

    Ok(report)
}
