/// Implementation of `dinsp synth`.
///
/// Writes a synthetic integral file with a predictable non-zero count and
/// prints the metadata needed to read it back, so the inspector can be
/// exercised without a quantum chemistry run:
///
/// ```text
/// $ dinsp synth -o MDCINT --int-size 8 --arith complex --blocks 3
/// wrote MDCINT: 4 Kramers pairs, 3 blocks, 6 non-zero integrals
/// metadata: {"integer_size":8,"group_arith":2,"is_spinfree":false}
/// ```
use std::fs;

use anyhow::{Context, Result};
use dinsp_encoder::{SynthOptions, synthetic_file};
use dinsp_types::{IntegerWidth, SessionMetadata};

use crate::SynthArgs;

/// Run the `dinsp synth` command.
///
/// # Errors
///
/// Returns an error for an unsupported integer size, or if the file cannot
/// be encoded or written.
pub fn run(args: &SynthArgs) -> Result<()> {
    let width = IntegerWidth::from_bytes(args.int_size).context("invalid --int-size")?;
    let metadata = SessionMetadata {
        integer_size: args.int_size,
        group_arith: args.arith.group(),
        is_spinfree: false,
    };
    let options = SynthOptions {
        width,
        kind: metadata.value_kind(),
        kramers_pairs: args.pairs,
        blocks: args.blocks,
        truncate: args.truncate,
        ..SynthOptions::default()
    };

    let bytes = synthetic_file(&options).context("cannot encode synthetic file")?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    let written = if args.pairs == 0 { 0 } else { args.blocks };
    println!(
        "wrote {}: {} Kramers pairs, {written} blocks, {} non-zero integrals{}",
        args.output.display(),
        args.pairs,
        options.expected_non_zero_count(),
        if args.truncate { " (no sentinel)" } else { "" }
    );
    println!(
        "metadata: {}",
        serde_json::to_string(&metadata).context("cannot serialize metadata")?
    );
    Ok(())
}
