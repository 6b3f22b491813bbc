/// Integral file inspector: read, validate and synthesize two-electron
/// integral files (Fortran unformatted sequential records).
///
/// # Command overview
///
/// ```text
/// dinsp <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print header, Kramers pairs and the non-zero integral count
///   validate   Check that the block stream decodes up to its sentinel
///   records    List the raw records of any sequential file
///   synth      Write a synthetic integral file
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder diagnostics to stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                       |
/// |------|-----------------------------------------------|
/// | 0    | Success                                       |
/// | 1    | Error (missing metadata, decode failure, I/O) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

mod cmd_inspect;
mod cmd_records;
mod cmd_synth;
mod cmd_validate;
mod metadata;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Two-electron integral file inspector.
#[derive(Parser)]
#[command(name = "dinsp", version, about = "Two-electron integral file inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder diagnostics (debug level). `RUST_LOG` overrides.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print header, Kramers pair table and non-zero integral count.
    Inspect(InspectArgs),
    /// Check that an integral file decodes up to its sentinel.
    Validate(ValidateArgs),
    /// List the raw records of a sequential file.
    Records(RecordsArgs),
    /// Write a synthetic integral file.
    Synth(SynthArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Integer width and value kind for the session.
///
/// The file itself does not record either, so one of the two sources is
/// required:
///
/// ```text
/// ┌──────────────────────┬─────────────────────────────────────────────┐
/// │ Flag                 │ Effect                                      │
/// ├──────────────────────┼─────────────────────────────────────────────┤
/// │ --metadata FILE      │ JSON: integer_size, group_arith, is_spinfree│
/// │ --int-size 4|8       │ integer width (requires --arith)            │
/// │ --arith real|complex │ integral value kind (requires --int-size)   │
/// │ --spinfree           │ spin-free run: values are always real       │
/// └──────────────────────┴─────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct MetadataArgs {
    /// JSON file with the run metadata.
    #[arg(long, conflicts_with_all = ["int_size", "arith"])]
    pub metadata: Option<PathBuf>,

    /// Integer size in bytes.
    #[arg(long, requires = "arith")]
    pub int_size: Option<u8>,

    /// Arithmetic of the integrals.
    #[arg(long, value_enum, requires = "int_size")]
    pub arith: Option<Arith>,

    /// Spin-free run.
    #[arg(long)]
    pub spinfree: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Arith {
    Real,
    Complex,
}

/// Arguments for `dinsp inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the integral file.
    pub file: PathBuf,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    /// List row, column and size of every block.
    #[arg(long)]
    pub blocks: bool,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `dinsp validate`.
///
/// Parses the whole file and prints checkmarks for each stage. Exits with
/// code 1 on the first failure, after printing the partial count.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the integral file.
    pub file: PathBuf,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

/// Arguments for `dinsp records`.
///
/// Needs no metadata: only the record framing is interpreted.
#[derive(clap::Args)]
pub struct RecordsArgs {
    /// Path to the sequential file.
    pub file: PathBuf,

    /// Stop after this many records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Show the first 16 payload bytes of each record in hex.
    #[arg(long)]
    pub show_hex: bool,
}

/// Arguments for `dinsp synth`.
#[derive(clap::Args)]
pub struct SynthArgs {
    /// Output file path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Integer size in bytes (4 or 8).
    #[arg(long, default_value_t = 4)]
    pub int_size: u8,

    /// Arithmetic of the integrals.
    #[arg(long, value_enum, default_value = "real")]
    pub arith: Arith,

    /// Number of Kramers pairs in the header.
    #[arg(long, default_value_t = 4)]
    pub pairs: usize,

    /// Number of integral blocks before the sentinel.
    #[arg(long, default_value_t = 16)]
    pub blocks: usize,

    /// Leave out the sentinel record.
    #[arg(long)]
    pub truncate: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Records(args) => cmd_records::run(&args),
        Commands::Synth(args) => cmd_synth::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
