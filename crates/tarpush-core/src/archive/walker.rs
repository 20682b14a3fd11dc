//! Directory tree walking with subtree pruning.
//!
//! The walker yields only regular files. Excluded directories are pruned
//! before descent, so nothing below them is ever visited, and other
//! non-regular entries are passed over without interrupting traversal.

use crate::PushError;
use crate::Result;
use crate::archive::config::ArchiveConfig;
use crate::archive::filters;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

/// Walks a directory tree, selecting the regular files to archive.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarpush_core::archive::ArchiveConfig;
/// use tarpush_core::archive::FilteredWalker;
///
/// let config = ArchiveConfig::default();
/// let walker = FilteredWalker::new(Path::new("./project"), &config);
///
/// for entry in walker.walk() {
///     let entry = entry?;
///     println!("Would add: {}", entry.archive_path.display());
/// }
/// # Ok::<(), tarpush_core::PushError>(())
/// ```
pub struct FilteredWalker<'a> {
    root: &'a Path,
    config: &'a ArchiveConfig,
}

impl<'a> FilteredWalker<'a> {
    /// Creates a new filtered walker for the given root directory.
    #[must_use]
    pub fn new(root: &'a Path, config: &'a ArchiveConfig) -> Self {
        Self { root, config }
    }

    /// Returns an iterator over the regular files under the root.
    ///
    /// Symlinks are not followed. Traversal order is the natural directory
    /// order, not sorted. The first error is yielded as `Some(Err(_))`;
    /// callers are expected to stop there.
    pub fn walk(&self) -> Walk<'a> {
        Walk {
            inner: WalkDir::new(self.root).follow_links(false).into_iter(),
            root: self.root,
            config: self.config,
            dirs_excluded: 0,
            entries_skipped: 0,
        }
    }
}

/// Iterator returned by [`FilteredWalker::walk`].
///
/// Keeps running counts of what it left out, readable while or after
/// iterating.
pub struct Walk<'a> {
    inner: walkdir::IntoIter,
    root: &'a Path,
    config: &'a ArchiveConfig,
    dirs_excluded: usize,
    entries_skipped: usize,
}

impl Walk<'_> {
    /// Directories pruned so far.
    #[must_use]
    pub fn dirs_excluded(&self) -> usize {
        self.dirs_excluded
    }

    /// Symlinks, devices, sockets and other non-regular, non-directory
    /// entries passed over so far.
    #[must_use]
    pub fn entries_skipped(&self) -> usize {
        self.entries_skipped
    }

    fn build_entry(&self, entry: &walkdir::DirEntry) -> Result<ArchiveEntry> {
        let path = entry.path().to_path_buf();
        let metadata = entry.metadata().map_err(|e| self.walk_error(e))?;
        let archive_path = filters::compute_archive_path(&path, self.root)?;

        Ok(ArchiveEntry {
            path,
            archive_path,
            size: metadata.len(),
        })
    }

    fn walk_error(&self, err: walkdir::Error) -> PushError {
        let path = err
            .path()
            .map_or_else(|| self.root.to_path_buf(), Path::to_path_buf);
        PushError::Walk { path, source: err }
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.walk_error(err))),
            };

            let file_type = entry.file_type();

            if file_type.is_dir() {
                if entry.depth() > 0 && filters::is_excluded_dir(entry.path(), self.config) {
                    debug!(path = %entry.path().display(), "skipping excluded directory");
                    self.inner.skip_current_dir();
                    self.dirs_excluded += 1;
                }
                continue;
            }

            if !file_type.is_file() {
                debug!(path = %entry.path().display(), "skipping non-regular file");
                self.entries_skipped += 1;
                continue;
            }

            return Some(self.build_entry(&entry));
        }
    }
}

/// A regular file selected for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full filesystem path to the file.
    pub path: PathBuf,

    /// Name stored in the archive, relative to the root.
    pub archive_path: PathBuf,

    /// Size in bytes at traversal time.
    pub size: u64,
}

/// Verifies that `root` exists and is a directory.
///
/// # Errors
///
/// Returns `SourceNotFound` or `NotADirectory`.
pub fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(PushError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(PushError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Collects every selected entry under `root` into a vector.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarpush_core::archive::ArchiveConfig;
/// use tarpush_core::archive::walker::collect_entries;
///
/// let entries = collect_entries(Path::new("."), &ArchiveConfig::default())?;
/// println!("Total entries: {}", entries.len());
/// # Ok::<(), tarpush_core::PushError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the root is missing or traversal fails.
pub fn collect_entries(root: &Path, config: &ArchiveConfig) -> Result<Vec<ArchiveEntry>> {
    check_root(root)?;
    FilteredWalker::new(root, config).walk().collect()
}
