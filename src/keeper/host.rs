use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The host application owning the live project: tells the core where the
/// project currently lives and persists the project data at a new path.
pub trait ProjectHost {
    fn current_project_path(&self) -> Option<PathBuf>;
    fn save_project_as(&self, new_path: &Path) -> Result<()>;
}

/// Standalone host used by the CLI: the "project" is a plain file, and
/// save-as copies the live file's bytes to the new location.
#[derive(Debug, Clone)]
pub struct FileProjectHost {
    project_file: Option<PathBuf>,
}

impl FileProjectHost {
    pub fn new(project_file: Option<PathBuf>) -> Self {
        Self { project_file }
    }
}

impl ProjectHost for FileProjectHost {
    fn current_project_path(&self) -> Option<PathBuf> {
        self.project_file.clone()
    }

    fn save_project_as(&self, new_path: &Path) -> Result<()> {
        let source = self
            .project_file
            .as_deref()
            .context("no live project file to save")?;
        fs::copy(source, new_path).with_context(|| {
            format!(
                "failed to save project from {} to {}",
                source.display(),
                new_path.display()
            )
        })?;
        Ok(())
    }
}
