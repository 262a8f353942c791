use thiserror::Error;

/// Failure taxonomy for snapshot and archive operations.
///
/// `OperationCancelled` is a user-chosen terminal outcome, not a fault;
/// callers render it as a normal result. Everything else identifies the
/// sub-step that failed and carries enough detail for a specific message.
#[derive(Debug, Error)]
pub enum KeeperError {
    #[error("no project loaded: set --project or VERSKEEP_PROJECT")]
    NoProjectLoaded,

    #[error("failed to create directory {path}: {detail}")]
    DirectoryCreateFailed { path: String, detail: String },

    #[error(
        "copy failed: {} of {} files could not be copied ({})",
        .failures.len(),
        .copied + .failures.len(),
        .failures.join("; ")
    )]
    CopyFailed {
        copied: usize,
        failures: Vec<String>,
    },

    #[error("project save failed at {path}: {detail}")]
    SaveFailed { path: String, detail: String },

    #[error(
        "verification failed ({}); copied files were left in place, nothing was rolled back",
        .reasons.join("; ")
    )]
    VerificationFailed { reasons: Vec<String> },

    #[error("no free alongside suffix for {0}: _a through _z are all taken")]
    SuffixExhausted(String),

    #[error("version numbering exhausted: cannot increment past version {0}")]
    VersionLimitReached(u32),

    #[error("operation cancelled")]
    OperationCancelled,

    #[error(
        "archive run finished with {} error(s): {archived} archived, {skipped} skipped{} ({})",
        .errors.len(),
        .aborted_at.as_deref().map(|name| format!(", aborted at {name}")).unwrap_or_default(),
        .errors.join("; ")
    )]
    PartialArchiveFailure {
        archived: usize,
        skipped: usize,
        errors: Vec<String>,
        aborted_at: Option<String>,
    },
}
