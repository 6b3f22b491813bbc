/// Implementation of `dinsp validate`.
///
/// Walks the integral file stage by stage and prints a checkmark (`✓`)
/// per stage, or a diagnostic line (`✗`) at the first failure. Exits with
/// code 0 on a complete file and code 1 otherwise.
///
/// # Success output
///
/// ```text
/// ✓ Metadata: int4 integers, real integrals
/// ✓ Header: "2024-01-01 00:00", 2 Kramers pairs
/// ✓ Blocks: 2 blocks, 5 non-zero integrals
/// ✓ Sentinel: end-of-stream record present
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: error while reading integral block 2: unexpected end of input at offset 120
///   partial count: 3 non-zero integrals in 1 block (file appears truncated)
/// ```
use anyhow::{Result, anyhow};
use dinsp_decoder::{DecodeError, IntegralFileParser};

use crate::ValidateArgs;

/// Run the `dinsp validate` command.
///
/// # Errors
///
/// Returns an error on any failed stage, after printing its diagnostic.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let metadata = args.metadata.load()?;

    let mut parser = match IntegralFileParser::open(&args.file, metadata.as_ref()) {
        Ok(parser) => parser,
        Err(failure) => return fail(&failure.error),
    };
    let config = parser.config();
    println!(
        "✓ Metadata: {} integers, {} integrals",
        config.width, config.kind
    );

    let session = match parser.read_header() {
        Ok(session) => session,
        Err(e) => return fail(&e),
    };
    println!(
        "✓ Header: {:?}, {} Kramers pair{}",
        session.header.timestamp,
        session.pairs.len(),
        plural(session.pairs.len())
    );

    let mut stream = parser.blocks(&session.header);
    let result = stream.for_each_block(|_| {});
    let (blocks, total) = (stream.blocks_read(), stream.total_non_zero_count());

    match result {
        Ok(()) => {
            println!(
                "✓ Blocks: {blocks} block{}, {total} non-zero integrals",
                plural(blocks)
            );
            println!("✓ Sentinel: end-of-stream record present");
            Ok(())
        }
        Err(e) => {
            println!("✗ Error: {e}");
            println!(
                "  partial count: {total} non-zero integrals in {blocks} block{}{}",
                plural(blocks),
                if e.is_truncation() {
                    " (file appears truncated)"
                } else {
                    ""
                }
            );
            Err(anyhow!("validation failed"))
        }
    }
}

fn fail(e: &DecodeError) -> Result<()> {
    println!("✗ Error: {e}");
    Err(anyhow!("validation failed"))
}

fn plural<N: PartialEq + From<u8>>(n: N) -> &'static str {
    if n == N::from(1) { "" } else { "s" }
}
