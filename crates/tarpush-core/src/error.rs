//! Error types for archiving and upload operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PushError`.
pub type Result<T> = std::result::Result<T, PushError>;

/// Pipeline stage an error surfaced from.
///
/// The `Display` form is the human-readable context attached when an error
/// crosses a stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Creating the intermediate temporary archive file.
    CreateTempFile,
    /// Walking and encoding the source directory.
    Archive,
    /// Sending the finished archive to the endpoint.
    Upload,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateTempFile => write!(f, "failed to create temporary tar file"),
            Self::Archive => write!(f, "failed to tar current directory"),
            Self::Upload => write!(f, "failed to upload tar file"),
        }
    }
}

/// Errors that can occur while archiving a directory or uploading it.
#[derive(Error, Debug)]
pub enum PushError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed (permission denied, vanished entry, loop).
    #[error("cannot traverse {path}")]
    Walk {
        /// Path that could not be visited.
        path: PathBuf,
        /// Underlying walker error.
        #[source]
        source: walkdir::Error,
    },

    /// Archive root does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing root.
        path: PathBuf,
    },

    /// Archive root exists but is not a directory.
    #[error("source is not a directory: {path}")]
    NotADirectory {
        /// The offending root.
        path: PathBuf,
    },

    /// A selected file could not be opened or copied into the archive.
    #[error("cannot archive {path}")]
    ReadFile {
        /// Source file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, expected 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Archive produced by an earlier stage could not be opened for upload.
    #[error("failed to open file {path}")]
    OpenArchive {
        /// Archive path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Connection-level failure talking to the endpoint.
    #[error("failed to upload file to {url}")]
    Transport {
        /// Destination URL.
        url: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint answered with something other than 200 OK.
    #[error("upload resulted in status code {status}")]
    UnexpectedStatus {
        /// Numeric HTTP status code.
        status: u16,
    },

    /// Error annotated with the stage it escaped from.
    #[error("{stage}")]
    Stage {
        /// Stage that failed.
        stage: Stage,
        /// Original cause.
        #[source]
        source: Box<PushError>,
    },
}

impl PushError {
    /// Wraps this error with stage context.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarpush_core::PushError;
    /// use tarpush_core::Stage;
    ///
    /// let err = PushError::UnexpectedStatus { status: 500 }.in_stage(Stage::Upload);
    /// assert_eq!(err.to_string(), "failed to upload tar file");
    /// assert_eq!(err.stage(), Some(Stage::Upload));
    /// assert_eq!(err.status_code(), Some(500));
    /// ```
    #[must_use]
    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Returns the outermost stage tag, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns the innermost error, skipping stage wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Stage { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the HTTP status code for an unexpected-status failure.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self.root_cause() {
            Self::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the failure happened at the transport level.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.root_cause(), Self::Transport { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_stage_messages() {
        assert_eq!(
            Stage::CreateTempFile.to_string(),
            "failed to create temporary tar file"
        );
        assert_eq!(Stage::Archive.to_string(), "failed to tar current directory");
        assert_eq!(Stage::Upload.to_string(), "failed to upload tar file");
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = PushError::UnexpectedStatus { status: 404 };
        assert_eq!(err.to_string(), "upload resulted in status code 404");
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PushError = io_err.into();
        assert!(matches!(err, PushError::Io(_)));
    }

    #[test]
    fn test_in_stage_preserves_cause() {
        let inner = PushError::ReadFile {
            path: PathBuf::from("src/main.rs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let err = inner.in_stage(Stage::Archive);

        assert_eq!(err.stage(), Some(Stage::Archive));
        assert!(matches!(err.root_cause(), PushError::ReadFile { .. }));

        let source = err.source().unwrap();
        assert!(source.to_string().contains("src/main.rs"));
    }

    #[test]
    fn test_root_cause_without_stage() {
        let err = PushError::SourceNotFound {
            path: PathBuf::from("/missing"),
        };
        assert!(err.stage().is_none());
        assert!(matches!(err.root_cause(), PushError::SourceNotFound { .. }));
        assert!(err.status_code().is_none());
    }

    #[test]
    fn test_invalid_compression_level_display() {
        let err = PushError::InvalidCompressionLevel { level: 12 };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("1-9"));
    }
}
