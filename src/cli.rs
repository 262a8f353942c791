use crate::commands::archive::{self, ArchiveOptions};
use crate::commands::config::{self, ConfigOptions};
use crate::commands::snapshot::{self, SnapshotOptions};
use crate::commands::status::{self, StatusOptions};
use crate::commands::CommandReport;
use crate::keeper::conflict::{ArchiveConflictChoice, SnapshotConflictChoice};
use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "verskeep",
    version,
    about = "Project snapshot versioning: numbered version folders and retention-based archiving"
)]
struct Cli {
    /// Emit the command report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SnapshotConflictArg {
    Alongside,
    Overwrite,
    Cancel,
}

impl From<SnapshotConflictArg> for SnapshotConflictChoice {
    fn from(arg: SnapshotConflictArg) -> Self {
        match arg {
            SnapshotConflictArg::Alongside => Self::Alongside,
            SnapshotConflictArg::Overwrite => Self::Overwrite,
            SnapshotConflictArg::Cancel => Self::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArchiveConflictArg {
    Skip,
    Replace,
    Abort,
}

impl From<ArchiveConflictArg> for ArchiveConflictChoice {
    fn from(arg: ArchiveConflictArg) -> Self {
        match arg {
            ArchiveConflictArg::Skip => Self::Skip,
            ArchiveConflictArg::Replace => Self::Replace,
            ArchiveConflictArg::Abort => Self::Abort,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the next version snapshot of the project.
    Snapshot {
        /// Live project file; defaults to VERSKEEP_PROJECT.
        #[arg(long)]
        project: Option<PathBuf>,
        /// Decision when the target version folder already exists.
        #[arg(long = "on-conflict", value_enum)]
        on_conflict: Option<SnapshotConflictArg>,
    },
    /// Move versions older than the retention window to the archive.
    Archive {
        /// Live project file; defaults to VERSKEEP_PROJECT.
        #[arg(long)]
        project: Option<PathBuf>,
        /// Archive destination; defaults to settings, then <parent>/archive.
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Retention count override; may be zero or negative.
        #[arg(long, allow_hyphen_values = true)]
        keep: Option<i64>,
        /// Decision when a destination folder already exists.
        #[arg(long = "on-conflict", value_enum)]
        on_conflict: Option<ArchiveConflictArg>,
        /// Report the selection without moving anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show project info, versions on disk, and archive eligibility.
    Status {
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Show effective settings and recognized env keys.
    Config {
        /// Persist the effective settings to the config path.
        #[arg(long)]
        write: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match cli.command {
        Command::Snapshot {
            project,
            on_conflict,
        } => snapshot::run(&SnapshotOptions {
            project,
            on_conflict: on_conflict.map(Into::into),
        })?,
        Command::Archive {
            project,
            dest,
            keep,
            on_conflict,
            dry_run,
        } => archive::run(&ArchiveOptions {
            project,
            dest,
            keep,
            on_conflict: on_conflict.map(Into::into),
            dry_run,
        })?,
        Command::Status { project } => status::run(&StatusOptions { project })?,
        Command::Config { write } => config::run(&ConfigOptions { write })?,
    };

    render(&report, cli.json)?;
    if !report.ok {
        bail!(
            "{} reported {} issue(s)",
            report.command,
            report.issues.len()
        );
    }
    Ok(())
}

fn render(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    Ok(())
}
