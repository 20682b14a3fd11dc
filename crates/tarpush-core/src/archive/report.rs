//! Archive operation reporting.

use std::time::Duration;

/// Statistics gathered while writing an archive.
///
/// # Examples
///
/// ```
/// use tarpush_core::archive::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.files_added = 3;
/// report.bytes_read = 4096;
/// report.bytes_written = 1024;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Regular files written to the archive.
    pub files_added: usize,

    /// Directories pruned because their name is in the exclusion set.
    pub dirs_excluded: usize,

    /// Symlinks, devices and other non-regular, non-directory entries
    /// passed over.
    pub entries_skipped: usize,

    /// Uncompressed file content copied into the archive.
    pub bytes_read: u64,

    /// Compressed bytes delivered to each sink.
    pub bytes_written: u64,

    /// Wall-clock time spent archiving.
    pub duration: Duration,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_written == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.bytes_written as f64
    }

    /// Returns `true` if no file made it into the archive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files_added == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_default() {
        let report = ArchiveReport::new();
        assert_eq!(report.files_added, 0);
        assert_eq!(report.dirs_excluded, 0);
        assert_eq!(report.bytes_written, 0);
        assert_eq!(report.duration, Duration::default());
        assert!(report.is_empty());
    }

    #[test]
    fn test_compression_ratio_edge_cases() {
        let mut report = ArchiveReport::new();
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.bytes_read = 1000;
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.bytes_written = 1000;
        assert!((report.compression_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
