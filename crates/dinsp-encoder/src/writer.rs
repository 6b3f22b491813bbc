use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dinsp_types::{IntegerWidth, IntegralBlock, IntegralValues, TIMESTAMP_LEN, ValueKind};
use dinsp_wire::{Complex64, RecordBuilder, RecordWriter};

use crate::error::EncodeError;

/// Which record the writer expects next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Header,
    Blocks,
    Done,
}

/// Writes integral files record by record.
///
/// Records must come in file order: one header, any number of blocks,
/// then the sentinel. The sentinel is optional so that truncated files
/// can be produced on purpose.
///
/// ```text
///   header(timestamp, pairs)     c18, iW, iW[2N]
///   real_block / complex_block   iW, iW, iW, (k,l)[n], value[n]   (repeat)
///   sentinel()                   0, 0, 0
/// ```
///
/// # Example
///
/// ```rust
/// use dinsp_encoder::IntegralFileWriter;
/// use dinsp_types::{IntegerWidth, ValueKind};
///
/// let mut file = IntegralFileWriter::new(IntegerWidth::Narrow, ValueKind::Real);
/// file.header("2024-01-01 00:00", &[(1, 2)])?
///     .real_block(1, 1, &[(1, 2)], &[0.25])?
///     .sentinel()?;
/// let bytes = file.finish()?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), dinsp_encoder::EncodeError>(())
/// ```
pub struct IntegralFileWriter<W> {
    out: RecordWriter<W>,
    record: RecordBuilder,
    width: IntegerWidth,
    kind: ValueKind,
    stage: Stage,
    blocks: u64,
}

impl IntegralFileWriter<Vec<u8>> {
    /// Writer that collects the file in memory.
    #[must_use]
    pub fn new(width: IntegerWidth, kind: ValueKind) -> Self {
        Self::with_writer(Vec::new(), width, kind)
    }

    /// The file as written so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.out.get_ref()
    }
}

impl IntegralFileWriter<BufWriter<File>> {
    /// Create (or truncate) `path`.
    ///
    /// # Errors
    ///
    /// [`EncodeError::Wire`] if the file cannot be created.
    pub fn create(
        path: impl AsRef<Path>,
        width: IntegerWidth,
        kind: ValueKind,
    ) -> Result<Self, EncodeError> {
        let out = RecordWriter::create(path)?;
        Ok(Self::from_records(out, width, kind))
    }
}

impl<W: Write> IntegralFileWriter<W> {
    #[must_use]
    pub fn with_writer(inner: W, width: IntegerWidth, kind: ValueKind) -> Self {
        Self::from_records(RecordWriter::new(inner), width, kind)
    }

    fn from_records(out: RecordWriter<W>, width: IntegerWidth, kind: ValueKind) -> Self {
        Self {
            out,
            record: RecordBuilder::new(),
            width,
            kind,
            stage: Stage::Header,
            blocks: 0,
        }
    }

    /// Write the leading record: timestamp, pair count and pair table.
    ///
    /// The timestamp is space-padded or truncated to 18 bytes.
    ///
    /// # Errors
    ///
    /// [`EncodeError::HeaderRepeated`] after the first call, or
    /// [`EncodeError::IndexOutOfRange`] for values a narrow file cannot hold.
    pub fn header(&mut self, timestamp: &str, pairs: &[(i64, i64)]) -> Result<&mut Self, EncodeError> {
        if self.stage != Stage::Header {
            return Err(EncodeError::HeaderRepeated);
        }
        self.record.clear();
        self.record.text(timestamp.as_bytes(), TIMESTAMP_LEN);
        self.int(len_i64(pairs.len()))?;
        for &(a, b) in pairs {
            self.int(a)?;
            self.int(b)?;
        }
        self.emit()?;
        self.stage = Stage::Blocks;
        Ok(self)
    }

    /// Write a block of real integrals.
    ///
    /// # Errors
    ///
    /// Record-order errors, [`EncodeError::KindMismatch`] in a complex
    /// file, and [`EncodeError::LengthMismatch`].
    pub fn real_block(
        &mut self,
        row_index: i64,
        col_index: i64,
        pairs: &[(i64, i64)],
        values: &[f64],
    ) -> Result<&mut Self, EncodeError> {
        self.begin_block(row_index, col_index, pairs, values.len(), ValueKind::Real)?;
        for &v in values {
            self.record.real8(v);
        }
        self.emit()?;
        self.blocks += 1;
        Ok(self)
    }

    /// Write a block of complex integrals.
    ///
    /// # Errors
    ///
    /// Same as [`real_block`](Self::real_block), with the kinds swapped.
    pub fn complex_block(
        &mut self,
        row_index: i64,
        col_index: i64,
        pairs: &[(i64, i64)],
        values: &[Complex64],
    ) -> Result<&mut Self, EncodeError> {
        self.begin_block(row_index, col_index, pairs, values.len(), ValueKind::Complex)?;
        for &v in values {
            self.record.complex8(v);
        }
        self.emit()?;
        self.blocks += 1;
        Ok(self)
    }

    /// Write an owned block, dispatching on its value kind.
    ///
    /// # Errors
    ///
    /// See [`real_block`](Self::real_block).
    pub fn block(&mut self, block: &IntegralBlock) -> Result<&mut Self, EncodeError> {
        let pairs: Vec<(i64, i64)> = block.index_pairs.iter().map(|p| (p.k, p.l)).collect();
        match &block.values {
            IntegralValues::Real(v) => self.real_block(block.row_index, block.col_index, &pairs, v),
            IntegralValues::Complex(v) => {
                self.complex_block(block.row_index, block.col_index, &pairs, v)
            }
        }
    }

    /// Write the `(0, 0, 0)` end-of-stream record.
    ///
    /// # Errors
    ///
    /// [`EncodeError::HeaderMissing`] or [`EncodeError::AfterSentinel`].
    pub fn sentinel(&mut self) -> Result<&mut Self, EncodeError> {
        self.check_blocks_open()?;
        self.record.clear();
        for _ in 0..3 {
            self.int(0)?;
        }
        self.emit()?;
        self.stage = Stage::Done;
        Ok(self)
    }

    /// Data blocks written so far.
    #[must_use]
    pub fn blocks_written(&self) -> u64 {
        self.blocks
    }

    /// Flush and hand back the underlying writer.
    ///
    /// # Errors
    ///
    /// [`EncodeError::Wire`] if flushing fails.
    pub fn finish(self) -> Result<W, EncodeError> {
        Ok(self.out.finish()?)
    }

    fn begin_block(
        &mut self,
        row_index: i64,
        col_index: i64,
        pairs: &[(i64, i64)],
        values: usize,
        given: ValueKind,
    ) -> Result<(), EncodeError> {
        self.check_blocks_open()?;
        if given != self.kind {
            return Err(EncodeError::KindMismatch {
                expected: self.kind,
                given,
            });
        }
        if pairs.len() != values {
            return Err(EncodeError::LengthMismatch {
                pairs: pairs.len(),
                values,
            });
        }
        if row_index == 0 && col_index == 0 {
            return Err(EncodeError::SentinelIndices);
        }

        self.record.clear();
        self.int(row_index)?;
        self.int(col_index)?;
        self.int(len_i64(values))?;
        for &(k, l) in pairs {
            self.int(k)?;
            self.int(l)?;
        }
        Ok(())
    }

    fn check_blocks_open(&self) -> Result<(), EncodeError> {
        match self.stage {
            Stage::Header => Err(EncodeError::HeaderMissing),
            Stage::Blocks => Ok(()),
            Stage::Done => Err(EncodeError::AfterSentinel),
        }
    }

    /// Append one integer at the file's width.
    fn int(&mut self, value: i64) -> Result<(), EncodeError> {
        match self.width {
            IntegerWidth::Narrow => {
                let narrow =
                    i32::try_from(value).map_err(|_| EncodeError::IndexOutOfRange { value })?;
                self.record.int4(narrow);
            }
            IntegerWidth::Wide => {
                self.record.int8(value);
            }
        }
        Ok(())
    }

    fn emit(&mut self) -> Result<(), EncodeError> {
        self.out.write_record(self.record.as_bytes())?;
        Ok(())
    }
}

fn len_i64(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dinsp_decoder::{IntegralFileParser, SessionConfig};
    use dinsp_types::IndexPair;
    use dinsp_wire::RecordReader;

    use super::*;

    #[test]
    fn narrow_real_file_layout() {
        let mut file = IntegralFileWriter::new(IntegerWidth::Narrow, ValueKind::Real);
        file.header("stamp", &[(1, 2)]).unwrap();
        file.real_block(1, 1, &[(1, 2)], &[0.5]).unwrap();
        file.sentinel().unwrap();
        let bytes = file.finish().unwrap();

        // header: 18 + 4 + 8, block: 12 + 8 + 8, sentinel: 12, 8 marker bytes each
        assert_eq!(bytes.len(), (30 + 8) + (28 + 8) + (12 + 8));
        assert_eq!(&bytes[..4], &30i32.to_le_bytes());
        assert_eq!(&bytes[4..22], b"stamp             ");
    }

    #[test]
    fn written_blocks_read_back() {
        let block = IntegralBlock {
            row_index: 2,
            col_index: 1,
            index_pairs: vec![IndexPair { k: 3, l: 4 }, IndexPair { k: 1, l: 1 }],
            values: IntegralValues::Complex(vec![Complex64::new(1.0, -1.0), Complex64::new(0.0, 2.0)]),
        };
        let mut file = IntegralFileWriter::new(IntegerWidth::Wide, ValueKind::Complex);
        file.header("t", &[(1, 2), (3, 4)]).unwrap();
        file.block(&block).unwrap().sentinel().unwrap();

        let reader = RecordReader::new(Cursor::new(file.finish().unwrap()));
        let mut parser = IntegralFileParser::new(
            reader,
            SessionConfig::new(IntegerWidth::Wide, ValueKind::Complex),
        )
        .unwrap();
        let session = parser.read_header().unwrap();
        let mut stream = parser.blocks(&session.header);
        let decoded = stream.next().unwrap().unwrap().to_block();
        assert_eq!(decoded, block);
    }

    #[test]
    fn record_order_is_enforced() {
        let mut file = IntegralFileWriter::new(IntegerWidth::Narrow, ValueKind::Real);
        assert!(matches!(file.sentinel(), Err(EncodeError::HeaderMissing)));
        file.header("t", &[]).unwrap();
        assert!(matches!(file.header("t", &[]), Err(EncodeError::HeaderRepeated)));
        file.sentinel().unwrap();
        assert!(matches!(
            file.real_block(1, 1, &[], &[]),
            Err(EncodeError::AfterSentinel)
        ));
    }

    #[test]
    fn block_consistency_checks() {
        let mut file = IntegralFileWriter::new(IntegerWidth::Narrow, ValueKind::Real);
        file.header("t", &[(1, 2)]).unwrap();
        assert!(matches!(
            file.complex_block(1, 1, &[(1, 1)], &[Complex64::new(0.0, 0.0)]),
            Err(EncodeError::KindMismatch { .. })
        ));
        assert!(matches!(
            file.real_block(1, 1, &[(1, 1)], &[]),
            Err(EncodeError::LengthMismatch { pairs: 1, values: 0 })
        ));
        assert!(matches!(
            file.real_block(0, 0, &[], &[]),
            Err(EncodeError::SentinelIndices)
        ));
        assert!(matches!(
            file.real_block(i64::from(i32::MAX) + 1, 1, &[], &[]),
            Err(EncodeError::IndexOutOfRange { .. })
        ));
        assert_eq!(file.blocks_written(), 0);
    }
}
