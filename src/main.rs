//! `dotslash-gen` CLI entrypoint.
//!
//! Loads the configuration, builds each selected binary's manifest, and
//! writes DotSlash files to the output directory or stdout. Exits non-zero
//! when the configuration is unusable or any binary failed.

use clap::Parser;
use dotslash_gen::cli::Cli;
use dotslash_gen::config;
use dotslash_gen::error::Result;
use dotslash_gen::fetch::HttpFetcher;
use dotslash_gen::output::{ensure_output_dir, write_stderr_line};
use dotslash_gen::pipeline::{GenerationReport, PipelineContext, generate, select_targets};
use std::io::Write;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install `env_logger` at the level implied by the flags; `RUST_LOG` wins.
fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env();
    if builder.try_init().is_err() {
        // A logger is already installed; keep it.
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<GenerationReport> {
    let targets = config::load(&cli.config)?.binaries()?;
    let targets = select_targets(targets, &cli.binary)?;
    if let Some(dir) = &cli.output_dir {
        ensure_output_dir(dir)?;
    }

    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(cli.timeout));
    let context = PipelineContext {
        fetcher: &fetcher,
        output_dir: cli.output_dir.as_deref(),
        quiet: cli.quiet,
    };
    Ok(generate(&context, &targets, stdout, stderr))
}

fn exit_code_for_run_result(result: Result<GenerationReport>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(report) if report.is_success() => 0,
        Ok(_) => 1,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
