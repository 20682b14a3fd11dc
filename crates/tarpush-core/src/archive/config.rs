//! Configuration for directory archiving.

use crate::PushError;
use crate::Result;

/// Directory basenames pruned from every archive unless overridden.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

/// Configuration for archiving a directory tree.
///
/// The exclusion set is carried here rather than in process-wide state, so
/// each call can use its own set.
///
/// # Examples
///
/// ```
/// use tarpush_core::archive::ArchiveConfig;
///
/// let config = ArchiveConfig::default();
/// assert!(config.is_excluded(".git"));
/// assert!(config.is_excluded("node_modules"));
///
/// let custom = ArchiveConfig::default()
///     .with_exclude_dirs(vec!["target".to_string()])
///     .with_compression_level(9);
/// assert!(custom.is_excluded("target"));
/// assert!(!custom.is_excluded(".git"));
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Directory basenames whose whole subtree is skipped, at any depth.
    ///
    /// Matching is exact and case-sensitive against the final path
    /// component. The archive root itself is never pruned.
    ///
    /// Default: `[".git", "node_modules"]`.
    pub exclude_dirs: Vec<String>,

    /// Gzip compression level (1-9).
    ///
    /// `None` uses the encoder default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Record file mode, owner and modification time in entry headers.
    ///
    /// When disabled, entries get mode `0o644` and mtime `0`, which makes
    /// the archive bytes independent of filesystem metadata.
    ///
    /// Default: `true`.
    pub preserve_metadata: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|dir| (*dir).to_string())
                .collect(),
            compression_level: Some(6),
            preserve_metadata: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the excluded directory names.
    #[must_use]
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    /// Adds one directory name to the exclusion set.
    #[must_use]
    pub fn exclude_dir(mut self, dir: impl Into<String>) -> Self {
        self.exclude_dirs.push(dir.into());
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the compression level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = Some(level);
        self
    }

    /// Sets whether header metadata is copied from the filesystem.
    #[must_use]
    pub fn with_preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }

    /// Returns `true` if a directory with this basename is pruned.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is set but not in 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(PushError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
