use std::io;

use thiserror::Error;

/// Everything a session can report to the user.
#[derive(Debug, Error)]
pub enum Error {
    /// The document has never been saved, so there is no directory to put
    /// the companion script in.
    #[error("document not saved: {0}")]
    Precondition(String),

    /// The configured editor could not be started. Non-fatal: the watcher
    /// still runs and the script can be edited by any other means.
    #[error("failed to launch editor `{editor}`: {source}")]
    EditorLaunch { editor: String, source: io::Error },

    /// A user script failed to parse or raised at runtime.
    #[error("script error: {0}")]
    Script(String),

    /// The file notification backend is unavailable.
    #[error("file watcher error: {0}")]
    Watcher(#[from] notify::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed document: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
