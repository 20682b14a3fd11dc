//! High-level archive-then-upload pipeline.

use crate::PushError;
use crate::Result;
use crate::Stage;
use crate::archive::ArchiveConfig;
use crate::archive::ArchiveReport;
use crate::archive::write_archive;
use crate::upload::UploadConfig;
use crate::upload::UploadReport;
use crate::upload::Uploader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Prefix of the intermediate archive file in the system temp directory.
pub const TEMP_FILE_PREFIX: &str = "tar-";

/// Environment variable that keeps the intermediate archive when truthy.
pub const KEEP_ARCHIVE_ENV: &str = "TARPUSH_KEEP_ARCHIVE";

/// Settings for a full push.
///
/// # Examples
///
/// ```
/// use tarpush_core::PushConfig;
/// use tarpush_core::upload::UploadConfig;
///
/// let config = PushConfig::default()
///     .with_upload(UploadConfig::default().with_endpoint("http://127.0.0.1:9000"))
///     .with_keep_archive(true);
/// assert!(config.keep_archive);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PushConfig {
    /// How the directory is archived.
    pub archive: ArchiveConfig,

    /// Where the archive is sent.
    pub upload: UploadConfig,

    /// Keep the intermediate archive instead of deleting it afterwards.
    ///
    /// Default: `false`.
    pub keep_archive: bool,

    /// Directory for the intermediate archive.
    ///
    /// Default: `None` (the system temp directory).
    pub temp_dir: Option<PathBuf>,
}

impl PushConfig {
    /// Builds a config from `TARPUSH_ENDPOINT` and `TARPUSH_KEEP_ARCHIVE`.
    #[must_use]
    pub fn from_env() -> Self {
        let keep_archive = std::env::var(KEEP_ARCHIVE_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self {
            archive: ArchiveConfig::default(),
            upload: UploadConfig::from_env(),
            keep_archive,
            temp_dir: None,
        }
    }

    /// Sets the archive configuration.
    #[must_use]
    pub fn with_archive(mut self, archive: ArchiveConfig) -> Self {
        self.archive = archive;
        self
    }

    /// Sets the upload configuration.
    #[must_use]
    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// Sets whether the intermediate archive is kept.
    #[must_use]
    pub fn with_keep_archive(mut self, keep: bool) -> Self {
        self.keep_archive = keep;
        self
    }

    /// Places the intermediate archive in `dir` instead of the system temp
    /// directory.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

/// Result of a successful push.
#[derive(Debug, Clone)]
pub struct PushReport {
    /// Archiving statistics.
    pub archive: ArchiveReport,

    /// Upload outcome.
    pub upload: UploadReport,

    /// Location of the intermediate archive when it was kept.
    pub kept_archive: Option<PathBuf>,
}

/// Archives `root` into a temporary file and uploads it for `identifier`.
///
/// Stages run strictly in sequence: temp file creation, archiving, upload.
/// The first failure is returned wrapped with its [`Stage`]; nothing is
/// retried. The temporary file is deleted on return unless
/// `config.keep_archive` is set, in which case it is kept whether or not the
/// push succeeded.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarpush_core::PushConfig;
/// use tarpush_core::tar_and_upload;
///
/// let report = tar_and_upload(Path::new("."), "billing", &PushConfig::from_env())?;
/// println!("Uploaded {} files", report.archive.files_added);
/// # Ok::<(), tarpush_core::PushError>(())
/// ```
///
/// # Errors
///
/// Returns a `PushError::Stage` whose cause is the original failure.
pub fn tar_and_upload(root: &Path, identifier: &str, config: &PushConfig) -> Result<PushReport> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_FILE_PREFIX);
    let mut temp = match &config.temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| PushError::Io(e).in_stage(Stage::CreateTempFile))?;

    debug!(path = %temp.path().display(), "created temporary archive");

    let outcome = archive_and_upload(root, identifier, config, &mut temp);

    let kept = if config.keep_archive {
        temp.keep()
            .map(|(_, path)| {
                info!(path = %path.display(), "kept temporary archive");
                Some(path)
            })
            .map_err(|e| PushError::Io(e.error).in_stage(Stage::CreateTempFile))
    } else {
        Ok(None)
    };

    let ((archive, upload), kept_archive) = settle(outcome, kept)?;

    Ok(PushReport {
        archive,
        upload,
        kept_archive,
    })
}

/// Combines the push outcome with the result of keeping the archive.
///
/// A failed push wins over a failed keep, which is only logged.
fn settle<T>(outcome: Result<T>, kept: Result<Option<PathBuf>>) -> Result<(T, Option<PathBuf>)> {
    match (outcome, kept) {
        (Ok(value), Ok(path)) => Ok((value, path)),
        (Ok(_), Err(keep_err)) => Err(keep_err),
        (Err(err), Ok(_)) => Err(err),
        (Err(err), Err(keep_err)) => {
            warn!(error = %keep_err.root_cause(), "failed to keep temporary archive");
            Err(err)
        }
    }
}

fn archive_and_upload(
    root: &Path,
    identifier: &str,
    config: &PushConfig,
    temp: &mut NamedTempFile,
) -> Result<(ArchiveReport, UploadReport)> {
    let archive = write_archive(root, &mut [temp.as_file_mut()], &config.archive)
        .map_err(|e| e.in_stage(Stage::Archive))?;
    temp.as_file_mut()
        .flush()
        .map_err(|e| PushError::Io(e).in_stage(Stage::Archive))?;

    let upload = Uploader::new(config.upload.clone())
        .and_then(|uploader| uploader.upload(identifier, temp.path()))
        .map_err(|e| e.in_stage(Stage::Upload))?;

    Ok((archive, upload))
}

/// Parses a boolean-ish environment value (`1`, `true`, `yes`).
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
