use std::io::{Read, Seek};

use dinsp_types::{
  IndexPair, IntegerWidth, IntegralBlock, IntegralValues, ParseSummary, StreamEvent,
  StreamState, ValueKind, is_sentinel,
};
use dinsp_wire::{Complex64, FieldBuf, Layout, RecordReader};
use log::{debug, error, trace, warn};

use crate::error::{DecodeError, RecordFault};
use crate::layouts::block_field;

/// Integral values of the current block, borrowed from the stream's
/// scratch buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValuesRef<'a> {
  Real(&'a [f64]),
  Complex(&'a [Complex64]),
}

impl ValuesRef<'_> {
  #[must_use]
  pub fn kind(&self) -> ValueKind {
    match self {
      Self::Real(_) => ValueKind::Real,
      Self::Complex(_) => ValueKind::Complex,
    }
  }

  #[must_use]
  pub fn len(&self) -> usize {
    match self {
      Self::Real(v) => v.len(),
      Self::Complex(v) => v.len(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// A decoded block, valid until the stream advances.
///
/// Index pairs stay packed as read from the file; [`pairs`](Self::pairs)
/// decodes them on the fly and [`to_block`](Self::to_block) copies
/// everything out when the block has to outlive the iteration.
#[derive(Clone, Copy, Debug)]
pub struct BlockRef<'a> {
  pub row_index: i64,
  pub col_index: i64,
  pub block_size: usize,
  pub values: ValuesRef<'a>,
  width: IntegerWidth,
  pair_bytes: &'a [u8],
}

impl<'a> BlockRef<'a> {
  pub fn pairs(&self) -> impl Iterator<Item = IndexPair> + 'a {
    IndexPair::decode_all(self.width, self.pair_bytes)
  }

  #[must_use]
  pub fn to_block(&self) -> IntegralBlock {
    let values = match self.values {
      ValuesRef::Real(v) => IntegralValues::Real(v.to_vec()),
      ValuesRef::Complex(v) => IntegralValues::Complex(v.to_vec()),
    };
    IntegralBlock {
      row_index: self.row_index,
      col_index: self.col_index,
      index_pairs: self.pairs().collect(),
      values,
    }
  }
}

/// Lazy sequence of integral blocks, ending at the sentinel record.
///
/// The stream is finite and cannot be restarted. Each call to
/// [`next`](Self::next) decodes one record into scratch buffers that
/// were sized once for the largest possible block and are reused for
/// every record:
///
/// ```text
///   next() ─▶ read 3iW,c(2W)[#2],v[#2]
///               │
///               ├─ short / error ──▶ Some(Err)  → Failed
///               ├─ (0, 0, ..)    ──▶ None       → Terminated
///               └─ block         ──▶ Some(Ok)   → total += size
/// ```
///
/// A failed record contributes nothing to the totals. After `Failed` or
/// `Terminated` every call returns `None`.
pub struct BlockStream<'r, R> {
  reader: &'r mut RecordReader<R>,
  layout: Layout,
  width: IntegerWidth,
  buffers: Vec<FieldBuf>,
  /// Elements the scratch buffers were sized for.
  capacity: usize,
  state: StreamState,
  total_non_zero_count: i64,
  blocks_read: u64,
}

impl<'r, R: Read + Seek> BlockStream<'r, R> {
  /// Start streaming from the reader's current position, which must be
  /// the first block record.
  ///
  /// `layout` is the session's block layout; `capacity` is the largest
  /// block size expected (the square of the spinor count).
  pub fn new(
    reader: &'r mut RecordReader<R>,
    layout: Layout,
    width: IntegerWidth,
    capacity: usize,
  ) -> Self {
    debug!("block stream: layout {layout}, scratch capacity {capacity}");
    let buffers = layout.buffers(capacity);
    Self {
      reader,
      layout,
      width,
      buffers,
      capacity,
      state: StreamState::default(),
      total_non_zero_count: 0,
      blocks_read: 0,
    }
  }

  /// Decode the next block.
  ///
  /// Returns `None` once the sentinel has been read or after an error
  /// has been returned.
  pub fn next(&mut self) -> Option<Result<BlockRef<'_>, DecodeError>> {
    if self.state.is_terminal() {
      return None;
    }

    let block = self.blocks_read + 1;
    let (row_index, col_index, block_size) = match self.read_block(block) {
      Ok(head) => head,
      Err(e) => {
        self.state = self.state.advance(StreamEvent::Failure);
        error!("{e}");
        return Some(Err(e));
      }
    };

    if is_sentinel(row_index, col_index) {
      self.state = self.state.advance(StreamEvent::Sentinel);
      debug!(
        "sentinel after {} blocks, {} non-zero integrals",
        self.blocks_read, self.total_non_zero_count
      );
      return None;
    }

    self.state = self.state.advance(StreamEvent::Block);
    self.total_non_zero_count += i64::try_from(block_size).unwrap_or(i64::MAX);
    self.blocks_read = block;
    self.state = self.state.advance(StreamEvent::Accumulated);
    trace!("block {block}: ({row_index}, {col_index}) size {block_size}");

    Some(Ok(BlockRef {
      row_index,
      col_index,
      block_size,
      values: self.values(),
      width: self.width,
      pair_bytes: self.buffers[block_field::PAIRS]
        .as_text()
        .unwrap_or_default(),
    }))
  }

  /// Run the stream to its end, handing every block to `visit`.
  ///
  /// # Errors
  ///
  /// The first decode error, after which the stream is exhausted.
  pub fn for_each_block(
    &mut self,
    mut visit: impl FnMut(&BlockRef<'_>),
  ) -> Result<(), DecodeError> {
    while let Some(item) = self.next() {
      visit(&item?);
    }
    Ok(())
  }

  /// Consume the stream into `summary`'s counters without materializing
  /// any block.
  ///
  /// # Errors
  ///
  /// The summary, filled up to the failing record, and the decode error.
  pub fn fold_summary(
    mut self,
    mut summary: ParseSummary,
  ) -> Result<ParseSummary, (ParseSummary, DecodeError)> {
    let result = self.for_each_block(|_| {});
    self.record_into(&mut summary);
    match result {
      Ok(()) => Ok(summary),
      Err(e) => Err((summary, e)),
    }
  }

  /// Copy the running counters and state into `summary`.
  pub fn record_into(&self, summary: &mut ParseSummary) {
    summary.total_non_zero_count = self.total_non_zero_count;
    summary.blocks_read = self.blocks_read;
    summary.state = self.state;
  }

  /// Sum of block sizes over the non-sentinel blocks decoded so far.
  #[must_use]
  pub fn total_non_zero_count(&self) -> i64 {
    self.total_non_zero_count
  }

  #[must_use]
  pub fn blocks_read(&self) -> u64 {
    self.blocks_read
  }

  #[must_use]
  pub fn state(&self) -> StreamState {
    self.state
  }

  /// Decode one block record and return `(row, col, size)`.
  ///
  /// The field count is checked before the sentinel test, so a short
  /// record never passes for the end of the stream. A negative size is
  /// rejected by the reader before any of these checks.
  fn read_block(&mut self, block: u64) -> Result<(i64, i64, usize), DecodeError> {
    let fault = |fault: RecordFault| DecodeError::BlockDecode { block, fault };

    let count = self
      .reader
      .read(&self.layout, &mut self.buffers)
      .map_err(|e| fault(e.into()))?;
    if count.fields < block_field::COUNT {
      return Err(fault(RecordFault::ShortRecord {
        decoded: count.fields,
        expected: block_field::COUNT,
      }));
    }

    let int = |field: usize| self.buffers[field].first_int().unwrap_or_default();
    let (row_index, col_index) = (int(block_field::ROW), int(block_field::COL));
    if is_sentinel(row_index, col_index) {
      return Ok((row_index, col_index, 0));
    }

    if count.trailing != 0 {
      return Err(DecodeError::ShapeMismatch {
        block,
        trailing: count.trailing,
      });
    }

    // A negative size already failed in the reader when resolving `[#2]`.
    let block_size = self.buffers[block_field::VALUES].len();
    if block_size > self.capacity {
      warn!(
        "block {block} holds {block_size} integrals, more than the {} the scratch buffers were sized for",
        self.capacity
      );
      self.capacity = block_size;
    }

    Ok((row_index, col_index, block_size))
  }

  fn values(&self) -> ValuesRef<'_> {
    match &self.buffers[block_field::VALUES] {
      FieldBuf::Complex(v) => ValuesRef::Complex(v),
      other => ValuesRef::Real(other.as_reals().unwrap_or_default()),
    }
  }
}
