//! Error types for design document and conflict operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the design store, the ADR resolver and the conflict engine.
#[derive(Error, Debug)]
pub enum DossierError {
    /// The task has no `design.md`.
    #[error("Design document for task {task_id} not found at '{}'", path.display())]
    DesignNotFound {
        task_id: String,
        path: PathBuf,
    },
    /// Filesystem failure other than a missing design document.
    #[error("Failed to {operation} for task {task_id} at '{}': {source}", path.display())]
    Io {
        operation: &'static str,
        task_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Section name outside overview, architecture, decisions, components.
    #[error(
        "Unknown design section '{0}' (expected overview, architecture, decisions, or components)"
    )]
    UnknownSection(String),
    /// The communication store could not be read.
    #[error("Communication store error for task {task_id}: {message}")]
    Communications {
        task_id: String,
        message: String,
    },
    /// Invalid settings file or environment override.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DossierError {
    /// Wraps an I/O error with the failing operation, task and path.
    pub fn io(
        operation: &'static str,
        task_id: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            task_id: task_id.into(),
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by an absent document or file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::DesignNotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns `true` when a file was read but its contents are not UTF-8.
    #[must_use]
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::InvalidData)
    }
}

/// Extension trait attaching operation and task context to I/O results.
pub trait IoResultExt<T> {
    /// Map an I/O error into [`DossierError::Io`].
    fn io_context(self, operation: &'static str, task_id: &str, path: &std::path::Path)
        -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn io_context(
        self,
        operation: &'static str,
        task_id: &str,
        path: &std::path::Path,
    ) -> Result<T> {
        self.map_err(|e| DossierError::io(operation, task_id, path, e))
    }
}

/// Result type alias for dossier operations.
pub type Result<T> = std::result::Result<T, DossierError>;
