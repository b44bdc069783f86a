use std::fmt;
use std::path::PathBuf;

use archive_core::SelectionEntry;
use serde::Deserialize;
use thiserror::Error;

/// Metadata returned by `GET /file-info`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    pub name: String,
}

/// A selection entry paired with the name it will be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadableFile {
    pub filename: String,
    pub entry: SelectionEntry,
}

/// Progress lines reported while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchProgress {
    Offline,
    ResolvingInfo { current: usize, total: usize },
    Downloading { filename: String },
    Complete,
    Failed,
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchProgress::Offline => write!(f, "Server offline"),
            BatchProgress::ResolvingInfo { current, total } => {
                write!(f, "Getting info {current}/{total}")
            }
            BatchProgress::Downloading { filename } => write!(f, "Downloading: {filename}"),
            BatchProgress::Complete => write!(f, "Download complete ✓"),
            BatchProgress::Failed => write!(f, "Download failed ✗"),
        }
    }
}

/// The document that stopped a batch, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every document was fetched and saved, in selection order.
    Completed { saved: Vec<PathBuf> },
    /// The liveness gate was closed; the backend was not contacted.
    Offline,
    /// A transfer or save failed; later documents were not attempted.
    TransferFailed {
        saved: Vec<PathBuf>,
        failure: TransferFailure,
    },
    /// The batch task died before reporting an outcome.
    Aborted { reason: String },
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Completed { .. })
    }

    pub fn saved(&self) -> &[PathBuf] {
        match self {
            BatchOutcome::Completed { saved } | BatchOutcome::TransferFailed { saved, .. } => saved,
            BatchOutcome::Offline | BatchOutcome::Aborted { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Liveness(bool),
    Progress(BatchProgress),
    BatchFinished(BatchOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::InvalidResponse => write!(f, "invalid response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build backend client: {0}")]
    Backend(#[from] BackendError),
}
