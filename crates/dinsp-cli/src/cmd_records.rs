/// Implementation of `dinsp records`.
///
/// Lists the records of any file written as length-bracketed sequential
/// records, without interpreting their contents. Useful to see where a
/// damaged integral file goes wrong before any metadata is at hand.
///
/// # Output format
///
/// ```text
/// record 0: offset 0, 30 bytes
///            0000  32 30 32 34 2d 30 31 2d 30 31 20 30 30 3a 30 30  2024-01-01 00:00
/// record 1: offset 38, 28 bytes
/// ---
/// 2 records, 94 bytes
/// ```
use std::io::{self, Read, Seek, Write};

use anyhow::{Context, Result};
use dinsp_wire::RecordReader;

use crate::RecordsArgs;

/// Bytes shown per record with `--show-hex`.
const PREVIEW: usize = 16;

/// Run the `dinsp records` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a record's framing is
/// damaged (after listing the records before it).
pub fn run(args: &RecordsArgs) -> Result<()> {
    let mut reader = RecordReader::open(&args.file)
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    let stdout = io::stdout();
    let result = list(&mut reader, args.limit, args.show_hex, &mut stdout.lock())
        .with_context(|| format!("cannot list records of {}", args.file.display()));
    reader.close();
    result
}

/// Write the record listing of `reader` to `out`.
///
/// The `--limit` note is printed only when a record past the limit
/// actually exists.
fn list<R: Read + Seek>(
    reader: &mut RecordReader<R>,
    limit: Option<usize>,
    show_hex: bool,
    out: &mut impl Write,
) -> Result<()> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut count = 0usize;
    while count < limit {
        let Some(info) = reader
            .skip()
            .with_context(|| format!("damaged record {count}"))?
        else {
            break;
        };
        writeln!(out, "record {count}: offset {}, {} bytes", info.offset, info.length)?;
        if show_hex {
            let payload = reader.last_payload();
            let preview = &payload[..payload.len().min(PREVIEW)];
            writeln!(out, "           0000  {:<48}  {}", hex_preview(preview), ascii(preview))?;
        }
        count += 1;
    }

    let listed = reader.offset();
    let truncated = count == limit && matches!(reader.skip(), Ok(Some(_)));

    writeln!(out, "---")?;
    writeln!(out, "{count} record{}, {listed} bytes", if count == 1 { "" } else { "s" })?;
    if truncated {
        writeln!(out, "(listing stopped at --limit {limit})")?;
    }
    Ok(())
}

/// Space-separated hex bytes.
fn hex_preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dinsp_wire::RecordWriter;

    use super::*;

    fn reader(records: &[&[u8]]) -> RecordReader<Cursor<Vec<u8>>> {
        let mut writer = RecordWriter::new(Vec::new());
        for record in records {
            writer.write_record(record).unwrap();
        }
        RecordReader::new(Cursor::new(writer.finish().unwrap()))
    }

    fn listing(records: &[&[u8]], limit: Option<usize>, show_hex: bool) -> String {
        let mut out = Vec::new();
        list(&mut reader(records), limit, show_hex, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn limit_equal_to_record_count_is_not_reported() {
        let text = listing(&[b"ab", b"cd"], Some(2), false);
        assert!(text.contains("2 records, 20 bytes"), "{text}");
        assert!(!text.contains("--limit"), "{text}");
    }

    #[test]
    fn limit_below_record_count_is_reported() {
        let text = listing(&[b"ab", b"cd", b"ef"], Some(2), false);
        assert!(text.contains("2 records, 20 bytes"), "{text}");
        assert!(text.contains("(listing stopped at --limit 2)"), "{text}");
    }

    #[test]
    fn hex_preview_is_space_separated() {
        assert_eq!(hex_preview(&[0x00, 0x2d, 0xff]), "00 2d ff");
        let text = listing(&[b"2024"], None, true);
        assert!(text.contains("0000  32 30 32 34"), "{text}");
        assert!(text.contains("  2024"), "{text}");
    }
}
