//! Newline-delimited record reader.
use std::io::{self, BufRead, ErrorKind};
use tracing::{trace, warn};

/// Longest record accepted, terminator excluded.
pub const MAX_RECORD_LEN: usize = 64 * 1024;

/// Splits a byte stream into newline-delimited records.
///
/// Read timeouts are not end-of-stream: a serial port configured with a
/// timeout reports one whenever the sensor is quiet, so the reader keeps the
/// partial record and waits again. A trailing `\r` is stripped.
///
/// A record longer than [`MAX_RECORD_LEN`] is dropped with a warning and the
/// reader resynchronises at the next newline.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(256),
        }
    }

    /// Next record without its line terminator.
    ///
    /// `Ok(None)` means the stream ended. A final record without a newline is
    /// still returned before that.
    pub fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.buf.clear();
        // Bytes of an oversized record thrown away so far.
        let mut discarded: Option<usize> = None;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    trace!(partial = self.buf.len(), "Read timed out, waiting for more data");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if available.is_empty() {
                if let Some(bytes) = discarded {
                    warn!(bytes, "Discarding oversized record at end of stream");
                }
                break;
            }

            let (chunk_len, used, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i, i + 1, true),
                None => (available.len(), available.len(), false),
            };

            match discarded.as_mut() {
                Some(bytes) => *bytes += chunk_len,
                None if self.buf.len() + chunk_len > MAX_RECORD_LEN => {
                    discarded = Some(self.buf.len() + chunk_len);
                    self.buf.clear();
                }
                None => self.buf.extend_from_slice(&available[..chunk_len]),
            }
            self.inner.consume(used);

            if complete {
                match discarded.take() {
                    Some(bytes) => {
                        warn!(
                            bytes,
                            max = MAX_RECORD_LEN,
                            "Discarding oversized record, resyncing at next newline"
                        );
                    }
                    None => return Ok(Some(self.take_record())),
                }
            }
        }

        if self.buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.take_record()))
    }

    fn take_record(&mut self) -> Vec<u8> {
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        self.buf.clone()
    }
}
