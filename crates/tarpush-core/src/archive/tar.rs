//! Gzip-compressed TAR encoding of a directory tree.
//!
//! The stream is layered as tar → gzip → fan-out, so every sink receives the
//! same compressed bytes. Entry bodies are held to their header size.

use crate::PushError;
use crate::Result;
use crate::archive::config::ArchiveConfig;
use crate::archive::report::ArchiveReport;
use crate::archive::walker;
use crate::archive::walker::ArchiveEntry;
use crate::archive::walker::FilteredWalker;
use crate::io::ExactReader;
use crate::io::FanOutWriter;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tar::Builder;
use tar::Header;
use tracing::debug;
use tracing::info;

/// Writes a gzip-compressed TAR archive of `root` to every sink.
///
/// Only regular files are stored, under names relative to `root`.
/// Directories named in `config.exclude_dirs` are pruned at any depth.
/// Each source file is opened, copied and closed before the next one is
/// touched.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use std::io::Write;
/// use std::path::Path;
/// use tarpush_core::archive::ArchiveConfig;
/// use tarpush_core::archive::write_archive;
///
/// let mut file = File::create("project.tar.gz")?;
/// let mut copy = Vec::new();
/// let report = write_archive(
///     Path::new("."),
///     &mut [&mut file as &mut dyn Write, &mut copy],
///     &ArchiveConfig::default(),
/// )?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), tarpush_core::PushError>(())
/// ```
///
/// # Errors
///
/// Returns an error on the first failure; whatever was already written to
/// the sinks is left there. Failures include:
/// - Invalid configuration or no sinks
/// - Root missing or not a directory
/// - Traversal error (permission denied, vanished entry)
/// - A file that cannot be opened or read
/// - A sink write error
pub fn write_archive(
    root: &Path,
    sinks: &mut [&mut dyn Write],
    config: &ArchiveConfig,
) -> Result<ArchiveReport> {
    config.validate()?;
    walker::check_root(root)?;
    if sinks.is_empty() {
        return Err(PushError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no output sinks for archive",
        )));
    }

    let start = Instant::now();
    let mut report = ArchiveReport::default();

    let fanout = FanOutWriter::new(sinks.iter_mut().collect());
    let level = compression_level_to_flate2(config.compression_level);
    let mut builder = Builder::new(GzEncoder::new(fanout, level));

    let mut walk = FilteredWalker::new(root, config).walk();
    for entry in walk.by_ref() {
        let entry = entry?;
        add_file_to_tar(&mut builder, &entry, config, &mut report)?;
    }
    report.dirs_excluded = walk.dirs_excluded();
    report.entries_skipped = walk.entries_skipped();

    // Writes the two zero blocks that terminate the tar stream.
    let encoder = builder.into_inner()?;
    let mut fanout = encoder.finish()?;
    fanout.flush()?;

    report.bytes_written = fanout.total_bytes();
    report.duration = start.elapsed();

    info!(
        root = %root.display(),
        files = report.files_added,
        excluded_dirs = report.dirs_excluded,
        bytes = report.bytes_written,
        "archive written"
    );

    Ok(report)
}

/// Creates a gzip-compressed TAR archive file at `output`.
///
/// # Errors
///
/// Returns an error if `output` cannot be created or archiving fails. A
/// partially written file is left in place.
pub fn create_archive_file(
    root: &Path,
    output: &Path,
    config: &ArchiveConfig,
) -> Result<ArchiveReport> {
    let mut file = File::create(output)?;
    let report = write_archive(root, &mut [&mut file], config)?;
    file.sync_all()?;
    Ok(report)
}

/// Adds a single regular file to the TAR archive.
///
/// The handle is dropped on return, so at most one source file is open.
fn add_file_to_tar<W: Write>(
    builder: &mut Builder<W>,
    entry: &ArchiveEntry,
    config: &ArchiveConfig,
    report: &mut ArchiveReport,
) -> Result<()> {
    let read_error = |source| PushError::ReadFile {
        path: entry.path.clone(),
        source,
    };

    let file = File::open(&entry.path).map_err(read_error)?;
    let metadata = file.metadata().map_err(read_error)?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    if config.preserve_metadata {
        set_metadata(&mut header, &metadata);
    } else {
        header.set_mode(0o644);
        header.set_mtime(0);
    }

    append_body(builder, &mut header, &entry.archive_path, file).map_err(read_error)?;

    debug!(path = %entry.archive_path.display(), size, "added file");

    report.files_added += 1;
    report.bytes_read += size;

    Ok(())
}

/// Appends one entry whose body must be exactly `header.size()` bytes.
///
/// A source that grows mid-copy is cut at the header size; one that shrinks
/// fails with `UnexpectedEof` instead of leaving a misaligned stream.
fn append_body<W: Write, R: std::io::Read>(
    builder: &mut Builder<W>,
    header: &mut Header,
    name: &Path,
    body: R,
) -> std::io::Result<()> {
    let size = header.size()?;
    builder.append_data(header, name, ExactReader::new(body, size))
}

/// Sets mode, ownership and mtime in a TAR header from metadata.
#[cfg(unix)]
fn set_metadata(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode());
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)] // Intentional: clamped to non-negative
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_metadata(header: &mut Header, metadata: &std::fs::Metadata) {
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    header.set_mode(mode);

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}

/// Converts compression level (1-9) to flate2 compression level.
fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    level.map_or_else(flate2::Compression::default, |n| {
        flate2::Compression::new(u32::from(n))
    })
}
