use crate::keeper::codec::NameCodec;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingSettings {
    pub prefix: String,
    pub digits: usize,
    pub start_version: u32,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            prefix: "_v".to_string(),
            digits: 3,
            start_version: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSettings {
    pub destination: Option<PathBuf>,
    pub versions_to_keep: i64,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            destination: None,
            versions_to_keep: 3,
        }
    }
}

/// Effective settings for one operation. Loaded fresh at the start of
/// each operation and passed in as an immutable snapshot, never cached
/// across operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub naming: NamingSettings,
    pub archive: ArchiveSettings,
}

impl Settings {
    pub fn codec(&self) -> NameCodec {
        NameCodec::new(self.naming.prefix.clone(), self.naming.digits)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialSettings {
    naming: Option<NamingSettings>,
    archive: Option<ArchiveSettings>,
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_i64(var: &str, fallback: i64) -> i64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<i64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_opt_path(var: &str, fallback: Option<PathBuf>) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => fallback,
    }
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.naming.prefix.is_empty() {
        return Err(anyhow!("invalid version prefix: cannot be empty"));
    }
    if settings.naming.digits == 0 {
        return Err(anyhow!("invalid version digits: must be >= 1"));
    }
    if settings.naming.start_version == 0 {
        return Err(anyhow!("invalid start version: must be >= 1"));
    }
    Ok(())
}

pub fn settings_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("VERSKEEP_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".verskeep").join("config.toml"))
}

fn merge_file_settings(base: &mut Settings) -> Result<()> {
    let Some(path) = settings_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialSettings = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse settings {}: {err}", path.display()))?;
    if let Some(naming) = parsed.naming {
        base.naming = naming;
    }
    if let Some(archive) = parsed.archive {
        base.archive = archive;
    }
    Ok(())
}

/// Defaults, overlaid with the TOML settings file, overlaid with
/// `VERSKEEP_*` env vars, then validated.
pub fn load_settings() -> Result<Settings> {
    let mut settings = Settings::default();
    merge_file_settings(&mut settings)?;

    settings.naming.prefix = env_or_string("VERSKEEP_VERSION_PREFIX", &settings.naming.prefix);
    settings.naming.digits = env_or_usize("VERSKEEP_VERSION_DIGITS", settings.naming.digits);
    settings.naming.start_version =
        env_or_u32("VERSKEEP_START_VERSION", settings.naming.start_version);
    settings.archive.versions_to_keep =
        env_or_i64("VERSKEEP_VERSIONS_TO_KEEP", settings.archive.versions_to_keep);
    settings.archive.destination =
        env_or_opt_path("VERSKEEP_ARCHIVE_DEST", settings.archive.destination.take());

    validate(&settings)?;
    Ok(settings)
}

/// Persist `settings` to the settings path, writing a temp file in the
/// same directory and renaming it over the target.
pub fn write_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path().context("settings path could not be resolved")?;
    let parent = path
        .parent()
        .context("settings path has no parent directory")?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let rendered = toml::to_string_pretty(settings).context("failed to render settings")?;
    let tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    fs::write(tmp.path(), rendered)
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.persist(&path)
        .with_context(|| format!("failed to persist {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{Settings, validate};

    #[test]
    fn defaults_pass_validation() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let mut settings = Settings::default();
        settings.naming.prefix.clear();
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn zero_digits_is_rejected() {
        let mut settings = Settings::default();
        settings.naming.digits = 0;
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn negative_keep_count_is_allowed() {
        let mut settings = Settings::default();
        settings.archive.versions_to_keep = -2;
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn default_codec_matches_naming() {
        let codec = Settings::default().codec();
        assert_eq!(codec.encode(2), "_v002");
    }
}
