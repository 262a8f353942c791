use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Every file under `root`, recursively, in directory-walk order.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk_into(root, &mut out)?;
    Ok(out)
}

fn walk_into(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let read_dir =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in read_dir {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            walk_into(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Number of files under `root`, recursively. Zero for an absent root.
pub fn count_files(root: &Path) -> Result<usize> {
    if !root.exists() {
        return Ok(0);
    }
    Ok(walk_files(root)?.len())
}

/// Recursively copy the tree at `src` into `dst`, creating directories as
/// needed. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let read_dir = fs::read_dir(src).with_context(|| format!("failed to read {}", src.display()))?;
    fs::create_dir_all(dst).with_context(|| format!("failed to create {}", dst.display()))?;

    let mut copied = 0usize;
    for entry in read_dir {
        let entry = entry.with_context(|| format!("failed to read entry in {}", src.display()))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).with_context(|| {
                format!("failed to copy {} to {}", from.display(), to.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Remove a directory tree (or single file) at `path`.
pub fn remove_tree(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path).with_context(|| format!("failed to remove {}", path.display()))
    } else {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))
    }
}
