use crate::keeper::codec::NameCodec;
use std::fs;
use std::path::{Path, PathBuf};

/// One sibling directory recognized as a version of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub name: String,
    pub version: u32,
    pub path: PathBuf,
}

/// Immediate subdirectory names under `parent`.
///
/// An absent or unreadable parent yields an empty list rather than an
/// error: a project with no prior versions is "zero versions found".
pub fn list_subdirectories(parent: &Path) -> Vec<String> {
    let Ok(read_dir) = fs::read_dir(parent) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for entry in read_dir.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            out.push(name.to_string());
        }
    }
    out
}

/// Sibling directories under `parent` that are versions of `base`,
/// sorted by version ascending.
///
/// Strict match: a directory counts only when its name is `base` exactly
/// (version 0, the original unsuffixed copy) or `base` plus a codec-valid
/// suffix with nothing in between — `Song_extra_v001` is not a version of
/// `Song`.
pub fn list_version_entries(parent: &Path, base: &str, codec: &NameCodec) -> Vec<VersionEntry> {
    let mut out = Vec::new();
    for name in list_subdirectories(parent) {
        let Some(remainder) = name.strip_prefix(base) else {
            continue;
        };
        let version = if remainder.is_empty() {
            0
        } else {
            match codec.suffix_version(remainder) {
                Some(v) => v,
                None => continue,
            }
        };
        out.push(VersionEntry {
            path: parent.join(&name),
            name,
            version,
        });
    }
    out.sort_by_key(|entry| entry.version);
    out
}
