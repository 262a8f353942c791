use crate::error::KeeperError;
use crate::keeper::codec::NameCodec;
use crate::keeper::scan;
use std::path::{Path, PathBuf};

/// Snapshot of where the live project sits and how its name decodes.
///
/// Computed fresh on demand and never cached across operations: the
/// active project may change between calls, and the directory names on
/// disk are the sole source of truth for which versions exist.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub full_path: PathBuf,
    pub directory: PathBuf,
    pub parent_directory: PathBuf,
    pub file_name: String,
    pub base_name: String,
    pub extension: String,
    pub current_version: Option<u32>,
}

impl ProjectInfo {
    /// File name for a project file belonging to version folder `folder`.
    pub fn project_file_name(&self, folder: &str) -> String {
        if self.extension.is_empty() {
            folder.to_string()
        } else {
            format!("{}.{}", folder, self.extension)
        }
    }
}

/// Derive [`ProjectInfo`] from the live project path, or fail with
/// `NoProjectLoaded` when the host has none.
pub fn project_info(live_path: Option<&Path>, codec: &NameCodec) -> Result<ProjectInfo, KeeperError> {
    let full_path = live_path.ok_or(KeeperError::NoProjectLoaded)?.to_path_buf();

    let directory = full_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| full_path.clone());
    // Keep version siblings alongside the project when it sits at a
    // filesystem root: parent falls back to the directory itself.
    let parent_directory = directory
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| directory.clone());

    let file_name = full_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let stem = full_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let extension = full_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let (base_name, current_version) = codec.split(stem);

    Ok(ProjectInfo {
        full_path,
        directory,
        parent_directory,
        file_name,
        base_name,
        extension,
        current_version,
    })
}

/// Highest strictly-positive version among `base`'s siblings, 0 when none.
///
/// An exact `base` sibling is a legitimate version-0 entry for listing and
/// archiving, but does not count toward "highest found" here: a project
/// whose only sibling is the original copy still starts numbering from
/// the configured start version.
pub fn find_highest_version(parent: &Path, base: &str, codec: &NameCodec) -> u32 {
    scan::list_version_entries(parent, base, codec)
        .iter()
        .map(|entry| entry.version)
        .filter(|v| *v > 0)
        .max()
        .unwrap_or(0)
}

/// Version number the next snapshot should get.
///
/// A versioned project always increments its own number, regardless of
/// what exists on disk: deleting higher siblings never causes a number
/// to be reused. An unversioned project continues from the highest
/// positive sibling, or starts at `start_version`. A version at the
/// numbering limit cannot be incremented and fails `VersionLimitReached`
/// rather than wrapping.
pub fn next_version(
    info: &ProjectInfo,
    codec: &NameCodec,
    start_version: u32,
) -> Result<u32, KeeperError> {
    if let Some(current) = info.current_version {
        return current
            .checked_add(1)
            .ok_or(KeeperError::VersionLimitReached(current));
    }

    let highest = find_highest_version(&info.parent_directory, &info.base_name, codec);
    if highest > 0 {
        highest
            .checked_add(1)
            .ok_or(KeeperError::VersionLimitReached(highest))
    } else {
        Ok(start_version)
    }
}
