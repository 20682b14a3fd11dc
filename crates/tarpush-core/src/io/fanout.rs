//! Writer that duplicates every byte to several sinks.

use std::io::Write;

/// Wrapper writer that forwards identical bytes to every sink it holds.
///
/// Each `write` call is delivered in full to every sink (via `write_all`)
/// before it returns, so all sinks always hold the same prefix of the stream.
/// The first sink error aborts the write and is returned unchanged.
///
/// [`total_bytes`](Self::total_bytes) counts bytes delivered to every sink,
/// which for the archiver is the compressed archive size.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use tarpush_core::io::FanOutWriter;
///
/// let mut file_like = Vec::new();
/// let mut hash_like = Vec::new();
/// {
///     let mut writer = FanOutWriter::new(vec![&mut file_like, &mut hash_like]);
///     writer.write_all(b"payload")?;
///     assert_eq!(writer.total_bytes(), 7);
/// }
/// assert_eq!(file_like, hash_like);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct FanOutWriter<W> {
    sinks: Vec<W>,
    bytes_written: u64,
}

impl<W> FanOutWriter<W> {
    /// Creates a fan-out writer over `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<W>) -> Self {
        Self {
            sinks,
            bytes_written: 0,
        }
    }

    /// Bytes every sink has accepted so far.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }
}

impl<W: Write> Write for FanOutWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        for sink in &mut self.sinks {
            sink.write_all(buf)?;
        }
        self.bytes_written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}
