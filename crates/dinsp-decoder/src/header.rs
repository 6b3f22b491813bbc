use std::io::{Read, Seek};

use dinsp_types::{FileHeader, KramersPairTable};
use dinsp_wire::{FieldBuf, Layout, RecordReader};
use log::debug;

use crate::error::{DecodeError, RecordFault};
use crate::layouts::SessionLayouts;

/// Read the leading record twice: once to learn the Kramers pair count,
/// then, after stepping back one record, again with the pair table.
///
/// ```text
///   read  c18,iW          → timestamp, N
///   backspace
///   read  c18,iW,iW[2N]   → timestamp, N, flat pair table
/// ```
///
/// # Errors
///
/// - [`DecodeError::HeaderDecode`] if the first read fails or comes back
///   short, or the pair count is negative.
/// - [`DecodeError::PairTableDecode`] if the rewind or the second read
///   fails or comes back short.
pub fn read_header_and_pairs<R: Read + Seek>(
    reader: &mut RecordReader<R>,
    layouts: &SessionLayouts,
) -> Result<(FileHeader, KramersPairTable), DecodeError> {
    let mut out = layouts.header.buffers(0);
    read_exact_fields(reader, &layouts.header, &mut out).map_err(DecodeError::HeaderDecode)?;
    let header = FileHeader::from_raw(text(&out[0]), int(&out[1]))
        .map_err(|e| DecodeError::HeaderDecode(e.into()))?;
    debug!(
        "header: {:?}, {} Kramers pairs",
        header.timestamp, header.kramers_pair_count
    );

    // A corrupt count must not size the pair-table buffers.
    let available = reader.last_payload().len();
    let fits = layouts
        .pair_table_bytes(header.kramers_pair_count)
        .is_some_and(|needed| needed <= available);
    if !fits {
        return Err(DecodeError::PairTableDecode(RecordFault::ShortRecord {
            decoded: 2,
            expected: 3,
        }));
    }

    reader.backspace().map_err(|e| DecodeError::PairTableDecode(e.into()))?;

    let layout = layouts
        .pair_table(header.kramers_pair_count)
        .map_err(|e| DecodeError::PairTableDecode(e.into()))?;
    let mut out = layout.buffers(0);
    read_exact_fields(reader, &layout, &mut out).map_err(DecodeError::PairTableDecode)?;
    let flat = out[2].as_ints().unwrap_or_default();
    let pairs = KramersPairTable::from_flat(flat).map_err(|e| DecodeError::PairTableDecode(e.into()))?;

    Ok((header, pairs))
}

/// Read one record and require every layout field to be present.
fn read_exact_fields<R: Read + Seek>(
    reader: &mut RecordReader<R>,
    layout: &Layout,
    out: &mut [FieldBuf],
) -> Result<(), RecordFault> {
    let count = reader.read(layout, out)?;
    if count.fields < layout.len() {
        return Err(RecordFault::ShortRecord {
            decoded: count.fields,
            expected: layout.len(),
        });
    }
    Ok(())
}

fn text(buf: &FieldBuf) -> &[u8] {
    buf.as_text().unwrap_or_default()
}

fn int(buf: &FieldBuf) -> i64 {
    buf.first_int().unwrap_or_default()
}
