//! Path filtering and naming rules for archiving.

use crate::PushError;
use crate::Result;
use crate::archive::config::ArchiveConfig;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Checks if a directory should be pruned from the walk.
///
/// Only the final path component is compared, so an excluded name matches at
/// any depth, and a file that happens to share the name is not affected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarpush_core::archive::ArchiveConfig;
/// use tarpush_core::archive::filters;
///
/// let config = ArchiveConfig::default();
/// assert!(filters::is_excluded_dir(Path::new("project/.git"), &config));
/// assert!(filters::is_excluded_dir(Path::new("a/b/node_modules"), &config));
/// assert!(!filters::is_excluded_dir(Path::new(".git/objects"), &config));
/// ```
#[must_use]
pub fn is_excluded_dir(path: &Path, config: &ArchiveConfig) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| config.is_excluded(name))
}

/// Computes the name a file is stored under in the archive.
///
/// The root prefix is removed, and only normal components are kept, so the
/// result never starts with a separator or `./`. Separators are normalized to
/// `/` by the tar header encoding.
///
/// # Errors
///
/// Returns an error if `source_path` is not under `root` or if nothing is
/// left after stripping the root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarpush_core::archive::filters;
///
/// let root = Path::new("/home/user/project");
/// let source = Path::new("/home/user/project/src/main.rs");
///
/// let name = filters::compute_archive_path(source, root).unwrap();
/// assert_eq!(name, Path::new("src/main.rs"));
///
/// let name = filters::compute_archive_path(Path::new("./foo.txt"), Path::new(".")).unwrap();
/// assert_eq!(name, Path::new("foo.txt"));
/// ```
pub fn compute_archive_path(source_path: &Path, root: &Path) -> Result<PathBuf> {
    let relative = source_path.strip_prefix(root).map_err(|_| {
        PushError::Io(std::io::Error::other(format!(
            "path {} is not under root directory: {}",
            source_path.display(),
            root.display()
        )))
    })?;

    let name: PathBuf = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if name.as_os_str().is_empty() {
        return Err(PushError::Io(std::io::Error::other(format!(
            "cannot derive an archive name for {}",
            source_path.display()
        ))));
    }

    Ok(name)
}
