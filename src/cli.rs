//! CLI argument definitions for `dotslash-gen`.
//!
//! Kept apart from the entrypoint so the binary stays focused on
//! orchestration and the argument surface can be unit tested.

use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Generate DotSlash manifests from versioned URL templates.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dotslash-gen")]
#[command(version, about)]
#[command(long_about = concat!(
    "Generate DotSlash manifests from versioned URL templates.\n\n",
    "Reads a TOML file describing one or more binaries, downloads each ",
    "platform's artefact once, records its size and SHA-256 digest, infers ",
    "its archive format from the URL, and writes a DotSlash file per binary.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Print every manifest to stdout:\n",
    "    $ dotslash-gen --config dotslash.toml\n\n",
    "  Write DotSlash files into bin/:\n",
    "    $ dotslash-gen --config dotslash.toml --output-dir bin\n\n",
    "  Regenerate a single binary:\n",
    "    $ dotslash-gen --config dotslash.toml -o bin --binary tool",
))]
pub struct Cli {
    /// Path to the TOML description of the binaries.
    #[arg(short, long, value_name = "FILE")]
    pub config: Utf8PathBuf,

    /// Directory to write DotSlash files into [default: print to stdout].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Generate only the named binary (can be repeated).
    #[arg(short, long, value_name = "NAME")]
    pub binary: Vec<String>,

    /// Per-download network timeout in seconds.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Return the log level implied by `-q` and `-v`.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
