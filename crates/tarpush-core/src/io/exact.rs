//! Reader that yields exactly a declared number of bytes.

use std::io;
use std::io::Read;

/// Reader adapter bound to the size recorded in an archive header.
///
/// Stops after `expected` bytes even if the source has grown, and fails
/// with `UnexpectedEof` if the source ends early. A tar entry body must
/// match its header size, otherwise every following header is misaligned.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use tarpush_core::io::ExactReader;
///
/// let mut reader = ExactReader::new(&b"abcdef"[..], 4);
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out)?;
/// assert_eq!(out, b"abcd");
///
/// let mut short = ExactReader::new(&b"ab"[..], 4);
/// let err = short.read_to_end(&mut Vec::new()).unwrap_err();
/// assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ExactReader<R> {
    inner: R,
    expected: u64,
    remaining: u64,
}

impl<R> ExactReader<R> {
    /// Wraps `inner`, which must supply exactly `expected` bytes.
    #[must_use]
    pub fn new(inner: R, expected: u64) -> Self {
        Self {
            inner,
            expected,
            remaining: expected,
        }
    }
}

impl<R: Read> Read for ExactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let limit = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.inner.read(&mut buf[..limit])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "source ended after {} of {} bytes",
                    self.expected - self.remaining,
                    self.expected
                ),
            ));
        }

        self.remaining -= n as u64;
        Ok(n)
    }
}
