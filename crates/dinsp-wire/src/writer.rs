use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use num::complex::Complex64;

use crate::error::WireError;

/// Sequential writer of length-bracketed records.
///
/// The inverse of [`RecordReader`](crate::RecordReader): every call to
/// [`write_record`](Self::write_record) emits `len | payload | len` with
/// little-endian `i32` markers.
pub struct RecordWriter<W> {
    inner: W,
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Io`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WireError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> RecordWriter<W> {
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one record.
    ///
    /// # Returns
    ///
    /// Total number of bytes written, markers included.
    ///
    /// # Errors
    ///
    /// - [`WireError::RecordTooLarge`] if the payload does not fit an
    ///   `i32` marker.
    /// - [`WireError::Io`] on write failure.
    pub fn write_record(&mut self, payload: &[u8]) -> Result<usize, WireError> {
        let marker = i32::try_from(payload.len()).map_err(|_| WireError::RecordTooLarge {
            length: payload.len(),
        })?;
        let marker = marker.to_le_bytes();

        self.inner.write_all(&marker)?;
        self.inner.write_all(payload)?;
        self.inner.write_all(&marker)?;

        Ok(payload.len() + 2 * marker.len())
    }

    /// Bytes written so far, for in-memory writers.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Io`] if flushing fails.
    pub fn finish(mut self) -> Result<W, WireError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Packs fields back to back into a record payload.
///
/// ```rust
/// use dinsp_wire::RecordBuilder;
///
/// let mut record = RecordBuilder::new();
/// record.int4(1).int4(2).real8(0.5);
/// assert_eq!(record.len(), 16);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordBuilder {
    buf: Vec<u8>,
}

impl RecordBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` as a fixed-width field: truncated to `width` bytes or
    /// padded with spaces.
    pub fn text(&mut self, text: &[u8], width: usize) -> &mut Self {
        let kept = text.len().min(width);
        self.buf.extend_from_slice(&text[..kept]);
        self.buf.resize(self.buf.len() + (width - kept), b' ');
        self
    }

    pub fn int4(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn int8(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn real8(&mut self, value: f64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn complex8(&mut self, value: Complex64) -> &mut Self {
        self.real8(value.re).real8(value.im)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Reset for the next record, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
