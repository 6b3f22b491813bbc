use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, trace};

use crate::error::WireError;
use crate::field::FieldBuf;
use crate::layout::{Count, Layout};

/// Size of each record length marker in bytes.
pub const MARKER_SIZE: usize = 4;

const MARKER_LEN: u64 = MARKER_SIZE as u64;

/// Position and payload length of one record on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordInfo {
    /// Byte offset of the head marker.
    pub offset: u64,
    /// Payload length in bytes (markers excluded).
    pub length: usize,
}

/// Outcome of a successful [`RecordReader::read`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadCount {
    /// Number of layout fields fully decoded. Less than the layout length
    /// when the record ended before the next field.
    pub fields: usize,
    /// Payload bytes the layout did not consume.
    pub trailing: usize,
}

/// Sequential reader over a file of length-bracketed records.
///
/// ```text
/// ┌────────────┬──────────────────────────┬────────────┐
/// │ len (i32)  │ payload [len bytes]      │ len (i32)  │  record 0
/// ├────────────┼──────────────────────────┼────────────┤
/// │ len (i32)  │ payload [len bytes]      │ len (i32)  │  record 1
/// └────────────┴──────────────────────────┴────────────┘
/// ```
///
/// Markers are little-endian. Fields inside a payload are packed back to
/// back with no delimiters, so the reader needs a [`Layout`] to split
/// them. A layout may consume less than the whole payload; the rest of
/// the record is skipped.
///
/// The handle is single-owner and forward-only apart from
/// [`backspace`](Self::backspace), which steps back exactly one record.
/// Any failed operation sets a sticky error flag ([`error`](Self::error));
/// once set, further reads return [`WireError::Poisoned`].
pub struct RecordReader<R> {
    inner: R,
    /// Offset of the next record's head marker.
    offset: u64,
    /// Payload of the most recent record, reused across reads.
    payload: Vec<u8>,
    failed: bool,
}

impl RecordReader<BufReader<File>> {
    /// Open `path` for sequential reading.
    ///
    /// # Errors
    ///
    /// [`WireError::NotFound`] if the file does not exist, or
    /// [`WireError::Io`] for any other open failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WireError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                WireError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                WireError::Io(e)
            }
        })?;
        debug!("opened record file {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> RecordReader<R> {
    /// Wrap a reader positioned at the first record.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            payload: Vec::new(),
            failed: false,
        }
    }

    /// Read the next record and decode it into `out` according to `layout`.
    ///
    /// `out` must hold one buffer per layout field, of the matching
    /// variant (see [`Layout::buffers`]). Each decoded field replaces the
    /// previous contents of its buffer.
    ///
    /// # Errors
    ///
    /// - [`WireError::EndOfFile`] when no record is left.
    /// - [`WireError::UnexpectedEof`] / [`WireError::MarkerMismatch`] /
    ///   [`WireError::UnsupportedSubrecord`] for damaged framing.
    /// - [`WireError::NegativeCount`] / [`WireError::BufferMismatch`] for
    ///   field decoding problems.
    /// - [`WireError::Poisoned`] if an earlier operation failed.
    pub fn read(&mut self, layout: &Layout, out: &mut [FieldBuf]) -> Result<ReadCount, WireError> {
        if self.failed {
            return Err(WireError::Poisoned);
        }
        let result = self
            .next_record()
            .and_then(|_| decode_fields(&self.payload, layout, out));
        self.track(result)
    }

    /// Advance over one record without decoding it.
    ///
    /// Returns `None` at end of file. The payload stays available through
    /// [`last_payload`](Self::last_payload) until the next read.
    ///
    /// # Errors
    ///
    /// Same framing errors as [`read`](Self::read).
    pub fn skip(&mut self) -> Result<Option<RecordInfo>, WireError> {
        if self.failed {
            return Err(WireError::Poisoned);
        }
        match self.next_record() {
            Ok(info) => Ok(Some(info)),
            Err(WireError::EndOfFile { .. }) => Ok(None),
            Err(e) => self.track(Err(e)),
        }
    }

    /// Reposition to the start of the record read most recently, so the
    /// next read decodes it again.
    ///
    /// # Errors
    ///
    /// [`WireError::NothingToBackspace`] at the start of the stream, or
    /// framing/I/O errors while locating the previous record.
    pub fn backspace(&mut self) -> Result<(), WireError> {
        if self.failed {
            return Err(WireError::Poisoned);
        }
        let result = self.seek_previous();
        self.track(result)
    }

    /// Sticky error indicator.
    #[must_use]
    pub fn error(&self) -> bool {
        self.failed
    }

    /// Offset of the next record's head marker.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Raw payload of the most recently read record.
    #[must_use]
    pub fn last_payload(&self) -> &[u8] {
        &self.payload
    }

    /// Release the underlying handle.
    pub fn close(self) {
        debug!("closing record stream at offset {}", self.offset);
    }

    fn track<T>(&mut self, result: Result<T, WireError>) -> Result<T, WireError> {
        if let Err(ref e) = result
            && !matches!(e, WireError::EndOfFile { .. })
        {
            self.failed = true;
        }
        result
    }

    fn next_record(&mut self) -> Result<RecordInfo, WireError> {
        let start = self.offset;
        let head = self
            .read_marker(start)?
            .ok_or(WireError::EndOfFile { offset: start })?;

        let length = usize::try_from(head).map_err(|_| WireError::UnsupportedSubrecord {
            offset: start,
            marker: head,
        })?;

        // take() bounds the read so a corrupt length cannot force a huge
        // allocation before the data runs out.
        self.payload.clear();
        let got = self
            .inner
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut self.payload)?;
        if got < length {
            return Err(WireError::UnexpectedEof {
                offset: start + MARKER_LEN + got as u64,
            });
        }

        let tail_at = start + MARKER_LEN + length as u64;
        let tail = self
            .read_marker(tail_at)?
            .ok_or(WireError::UnexpectedEof { offset: tail_at })?;
        if tail != head {
            return Err(WireError::MarkerMismatch {
                offset: start,
                head,
                tail,
            });
        }

        self.offset = tail_at + MARKER_LEN;
        trace!("record at {start}: {length} bytes");
        Ok(RecordInfo {
            offset: start,
            length,
        })
    }

    fn seek_previous(&mut self) -> Result<(), WireError> {
        let Some(tail_at) = self.offset.checked_sub(MARKER_LEN) else {
            return Err(WireError::NothingToBackspace);
        };
        if tail_at < MARKER_LEN {
            return Err(WireError::NothingToBackspace);
        }

        self.inner.seek(SeekFrom::Start(tail_at))?;
        let tail = self
            .read_marker(tail_at)?
            .ok_or(WireError::UnexpectedEof { offset: tail_at })?;
        let length = u64::try_from(tail).map_err(|_| WireError::UnsupportedSubrecord {
            offset: tail_at,
            marker: tail,
        })?;
        let start = tail_at
            .checked_sub(length + MARKER_LEN)
            .ok_or(WireError::NothingToBackspace)?;

        self.inner.seek(SeekFrom::Start(start))?;
        self.offset = start;
        debug!("backspaced to record at offset {start}");
        Ok(())
    }

    /// Read one length marker. `Ok(None)` means clean end of file.
    fn read_marker(&mut self, at: u64) -> Result<Option<i32>, WireError> {
        let mut buf = [0u8; MARKER_SIZE];
        let mut filled = 0;
        while filled < MARKER_SIZE {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => Ok(None),
            MARKER_SIZE => Ok(Some(i32::from_le_bytes(buf))),
            n => Err(WireError::UnexpectedEof {
                offset: at + n as u64,
            }),
        }
    }
}

/// Split `payload` into the fields of `layout`, left to right.
fn decode_fields(
    payload: &[u8],
    layout: &Layout,
    out: &mut [FieldBuf],
) -> Result<ReadCount, WireError> {
    let mut cursor = 0usize;

    for (index, spec) in layout.fields().iter().enumerate() {
        let elements = match spec.count {
            Count::One => 1,
            Count::Fixed(n) => n,
            Count::FieldRef(k) => {
                let count = out.get(k).and_then(FieldBuf::first_int).ok_or(
                    WireError::BufferMismatch {
                        field: k,
                        expected: "integer",
                    },
                )?;
                usize::try_from(count).map_err(|_| WireError::NegativeCount {
                    field: index,
                    count,
                })?
            }
        };

        let end = elements
            .checked_mul(spec.kind.element_size())
            .and_then(|size| cursor.checked_add(size));
        let Some(bytes) = end.and_then(|end| payload.get(cursor..end)) else {
            return Ok(ReadCount {
                fields: index,
                trailing: payload.len() - cursor,
            });
        };

        let buf = out
            .get_mut(index)
            .filter(|buf| buf.accepts(spec.kind))
            .ok_or(WireError::BufferMismatch {
                field: index,
                expected: spec.kind.family(),
            })?;
        buf.fill(spec.kind, bytes);
        cursor += bytes.len();
    }

    Ok(ReadCount {
        fields: layout.len(),
        trailing: payload.len() - cursor,
    })
}
