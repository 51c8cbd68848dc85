use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::Split;

/// Failures the loader and scanner can report.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The caption table could not be opened or decoded.
    #[error("caption source '{}' is unreadable: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// A split has no `complete` subtree. Non-fatal: the split is empty.
    #[error("split '{split}' has no instance directory at '{}'", path.display())]
    MissingInventoryRoot { split: Split, path: PathBuf },
    #[error("failed to list '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
