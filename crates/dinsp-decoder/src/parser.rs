use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::time::Instant;

use dinsp_types::{FileHeader, KramersPairTable, ParseSummary, SessionMetadata};
use dinsp_wire::{RecordReader, WireError};
use log::{debug, info};

use crate::config::SessionConfig;
use crate::error::{DecodeError, ParseFailure};
use crate::header::read_header_and_pairs;
use crate::layouts::SessionLayouts;
use crate::stream::{BlockRef, BlockStream};

/// Largest number of elements reserved up front per scratch buffer.
pub const SCRATCH_LIMIT: usize = 1 << 22;

/// Header and Kramers pair table of an open session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionHeader {
  pub header: FileHeader,
  pub pairs: KramersPairTable,
}

/// Owns one integral file for the duration of a session.
///
/// A session runs in a fixed order and cannot be rewound:
///
/// ```text
///   open ──▶ read_header ──▶ blocks ... sentinel ──▶ close
///    │           │              │
///    └───────────┴──────────────┴──▶ error: close, keep partial totals
/// ```
///
/// [`parse`](Self::parse) drives the whole sequence. The lower-level
/// [`read_header`](Self::read_header) and [`blocks`](Self::blocks) are for
/// callers that want to look at individual blocks; stopping early is
/// allowed between blocks, never inside one.
///
/// # Example
///
/// ```rust,no_run
/// use dinsp_decoder::IntegralFileParser;
/// use dinsp_types::SessionMetadata;
///
/// let metadata = SessionMetadata { integer_size: 4, group_arith: 1, is_spinfree: false };
/// let summary = IntegralFileParser::open("MDCINT", Some(&metadata))?.parse()?;
/// println!("{} non-zero integrals", summary.total_non_zero_count);
/// # Ok::<(), dinsp_decoder::ParseFailure>(())
/// ```
pub struct IntegralFileParser<R> {
  reader: RecordReader<R>,
  config: SessionConfig,
  layouts: SessionLayouts,
}

impl IntegralFileParser<BufReader<File>> {
  /// Negotiate the session from `metadata`, then open `path`.
  ///
  /// Metadata is checked first so that a missing configuration is
  /// reported without touching the file.
  ///
  /// # Errors
  ///
  /// An empty [`ParseFailure`] carrying
  /// [`DecodeError::ConfigurationMissing`],
  /// [`DecodeError::InvalidMetadata`] or [`DecodeError::FileNotFound`].
  pub fn open(
    path: impl AsRef<Path>,
    metadata: Option<&SessionMetadata>,
  ) -> Result<Self, ParseFailure> {
    let config = SessionConfig::negotiate(metadata).map_err(ParseFailure::empty)?;
    let reader = RecordReader::open(path).map_err(|e| {
      ParseFailure::empty(match e {
        WireError::NotFound { path } => DecodeError::FileNotFound { path },
        other => DecodeError::HeaderDecode(other.into()),
      })
    })?;
    Self::new(reader, config).map_err(ParseFailure::empty)
  }
}

impl<R: Read + Seek> IntegralFileParser<R> {
  /// Wrap a record reader positioned at the start of an integral file.
  ///
  /// # Errors
  ///
  /// [`DecodeError::HeaderDecode`] if the session layouts cannot be built.
  pub fn new(reader: RecordReader<R>, config: SessionConfig) -> Result<Self, DecodeError> {
    let layouts = SessionLayouts::new(config).map_err(|e| DecodeError::HeaderDecode(e.into()))?;
    Ok(Self {
      reader,
      config,
      layouts,
    })
  }

  #[must_use]
  pub fn config(&self) -> SessionConfig {
    self.config
  }

  /// Read the leading record and its Kramers pair table.
  ///
  /// # Errors
  ///
  /// See [`read_header_and_pairs`].
  pub fn read_header(&mut self) -> Result<SessionHeader, DecodeError> {
    let (header, pairs) = read_header_and_pairs(&mut self.reader, &self.layouts)?;
    Ok(SessionHeader { header, pairs })
  }

  /// Stream the block records that follow the header.
  ///
  /// Scratch buffers are sized for a block covering every spinor pair
  /// of the file described by `header`, up to [`SCRATCH_LIMIT`] elements.
  pub fn blocks(&mut self, header: &FileHeader) -> BlockStream<'_, R> {
    let spinors = header.spinor_count();
    BlockStream::new(
      &mut self.reader,
      self.layouts.block.clone(),
      self.config.width,
      spinors.saturating_mul(spinors).min(SCRATCH_LIMIT),
    )
  }

  /// Read the whole file and summarize it.
  ///
  /// # Errors
  ///
  /// A [`ParseFailure`] with the totals of every block decoded before the
  /// failing record.
  pub fn parse(self) -> Result<ParseSummary, ParseFailure> {
    self.parse_with(|_| {})
  }

  /// Like [`parse`](Self::parse), handing each block to `visit` as it is
  /// decoded.
  ///
  /// # Errors
  ///
  /// Same as [`parse`](Self::parse).
  pub fn parse_with(
    mut self,
    visit: impl FnMut(&BlockRef<'_>),
  ) -> Result<ParseSummary, ParseFailure> {
    let outcome = self.run(visit);
    self.reader.close();
    outcome
  }

  fn run(&mut self, visit: impl FnMut(&BlockRef<'_>)) -> Result<ParseSummary, ParseFailure> {
    let SessionHeader { header, pairs } = self.read_header().map_err(ParseFailure::empty)?;

    let mut summary = ParseSummary::default();
    let started = Instant::now();
    let result = {
      let mut stream = self.blocks(&header);
      let result = stream.for_each_block(visit);
      stream.record_into(&mut summary);
      result
    };
    summary.elapsed = started.elapsed();
    summary.header = Some(header);
    summary.kramers_pairs = pairs;

    match result {
      Ok(()) => {
        info!(
          "read {} blocks, {} non-zero integrals in {:.3}s",
          summary.blocks_read,
          summary.total_non_zero_count,
          summary.elapsed_seconds()
        );
        Ok(summary)
      }
      Err(error) => {
        debug!("session failed after {} blocks", summary.blocks_read);
        Err(ParseFailure {
          partial: summary,
          error,
        })
      }
    }
  }
}

/// Open `path` with `metadata` and parse it to the end.
///
/// # Errors
///
/// See [`IntegralFileParser::open`] and [`IntegralFileParser::parse`].
pub fn parse_file(
  path: impl AsRef<Path>,
  metadata: Option<&SessionMetadata>,
) -> Result<ParseSummary, ParseFailure> {
  IntegralFileParser::open(path, metadata)?.parse()
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use dinsp_encoder::IntegralFileWriter;
  use dinsp_types::{IntegerWidth, StreamState, ValueKind};

  use super::*;

  fn parser(bytes: Vec<u8>, width: IntegerWidth, kind: ValueKind) -> IntegralFileParser<Cursor<Vec<u8>>> {
    IntegralFileParser::new(
      RecordReader::new(Cursor::new(bytes)),
      SessionConfig::new(width, kind),
    )
    .unwrap()
  }

  fn sample(width: IntegerWidth) -> Vec<u8> {
    let mut file = IntegralFileWriter::new(width, ValueKind::Real);
    file.header("2024-01-01 00:00", &[(1, 2), (3, 4)]).unwrap();
    file
      .real_block(1, 1, &[(1, 1), (1, 2), (2, 2)], &[0.1, 0.2, 0.3])
      .unwrap();
    file.real_block(1, 2, &[(1, 3), (2, 4)], &[0.4, 0.5]).unwrap();
    file.sentinel().unwrap();
    file.finish().unwrap()
  }

  #[test]
  fn full_session() {
    let summary = parser(sample(IntegerWidth::Narrow), IntegerWidth::Narrow, ValueKind::Real)
      .parse()
      .unwrap();
    assert_eq!(summary.total_non_zero_count, 5);
    assert_eq!(summary.blocks_read, 2);
    assert_eq!(summary.state, StreamState::Terminated);
    assert_eq!(summary.kramers_pairs.len(), 2);
    assert_eq!(
      summary.header.map(|h| h.timestamp).as_deref(),
      Some("2024-01-01 00:00")
    );
  }

  #[test]
  fn visitor_sees_every_block_in_order() {
    let mut seen = Vec::new();
    parser(sample(IntegerWidth::Wide), IntegerWidth::Wide, ValueKind::Real)
      .parse_with(|block| seen.push((block.row_index, block.col_index, block.block_size)))
      .unwrap();
    assert_eq!(seen, vec![(1, 1, 3), (1, 2, 2)]);
  }

  #[test]
  fn manual_session_can_stop_between_blocks() {
    let mut parser = parser(sample(IntegerWidth::Narrow), IntegerWidth::Narrow, ValueKind::Real);
    let session = parser.read_header().unwrap();
    let mut stream = parser.blocks(&session.header);
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.block_size, 3);
    assert_eq!(stream.state(), StreamState::AwaitingBlock);
  }

  #[test]
  fn header_failure_has_empty_summary() {
    let failure = parser(Vec::new(), IntegerWidth::Narrow, ValueKind::Real)
      .parse()
      .unwrap_err();
    assert!(matches!(failure.error, DecodeError::HeaderDecode(_)));
    assert_eq!(failure.partial.state, StreamState::Failed);
    assert!(failure.partial.header.is_none());
  }

  #[test]
  fn open_checks_metadata_before_the_file() {
    let failure = IntegralFileParser::open("/nonexistent/MDCINT", None).err().unwrap();
    assert!(matches!(failure.error, DecodeError::ConfigurationMissing));

    let metadata = SessionMetadata {
      integer_size: 4,
      group_arith: 1,
      is_spinfree: false,
    };
    let failure = IntegralFileParser::open("/nonexistent/MDCINT", Some(&metadata))
      .err()
      .unwrap();
    assert!(matches!(failure.error, DecodeError::FileNotFound { .. }));
    assert_eq!(failure.partial.total_non_zero_count, 0);
  }
}
