//! Generation pipeline orchestration.
//!
//! Builds every selected binary's manifest through
//! [`DotslashBinary::build`](crate::manifest::DotslashBinary::build) and
//! writes the result either into an output directory or to stdout. Binaries
//! are independent: one failing does not stop the others, and nothing is
//! written for the one that failed.

use crate::config::BinaryTarget;
use crate::error::{GeneratorError, Result};
use crate::fetch::ArtefactFetcher;
use crate::output::{render_dotslash_file, summary_message, write_dotslash_file, write_stderr_line};
use camino::Utf8Path;
use log::debug;
use std::collections::HashSet;
use std::io::Write;

/// Context for one generation run.
pub struct PipelineContext<'a> {
    /// Retrieves provider URLs.
    pub fetcher: &'a dyn ArtefactFetcher,
    /// Directory manifests are written to; stdout when absent.
    pub output_dir: Option<&'a Utf8Path>,
    /// Suppress progress output (errors still shown).
    pub quiet: bool,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Manifest names successfully generated, in run order.
    pub generated: Vec<String>,
    /// Binaries that failed, with the error that stopped them.
    pub failed: Vec<(String, GeneratorError)>,
}

impl GenerationReport {
    /// Return true when every binary was generated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Restrict `targets` to the binaries named in `names`.
///
/// An empty `names` keeps every target. Order follows the configuration.
///
/// # Errors
///
/// Returns [`GeneratorError::UnknownBinary`] for the first name that matches
/// no target.
pub fn select_targets(targets: Vec<BinaryTarget>, names: &[String]) -> Result<Vec<BinaryTarget>> {
    if names.is_empty() {
        return Ok(targets);
    }
    let known: HashSet<&str> = targets.iter().map(|t| t.binary.name()).collect();
    if let Some(unknown) = names.iter().find(|name| !known.contains(name.as_str())) {
        return Err(GeneratorError::UnknownBinary {
            name: unknown.clone(),
        });
    }
    Ok(targets
        .into_iter()
        .filter(|target| names.iter().any(|name| name == target.binary.name()))
        .collect())
}

/// Generate every target's manifest.
///
/// Progress and per-binary failures are reported on `stderr`; manifests go
/// to `stdout` when the context has no output directory.
pub fn generate(
    context: &PipelineContext<'_>,
    targets: &[BinaryTarget],
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> GenerationReport {
    let mut report = GenerationReport::default();
    for target in targets {
        let name = target.binary.dotslash_name();
        if !context.quiet {
            write_stderr_line(
                stderr,
                format!(
                    "Generating {name} ({} platform(s))...",
                    target.binary.platforms().len()
                ),
            );
        }
        match generate_one(context, target, stdout) {
            Ok(()) => report.generated.push(name),
            Err(err) => {
                debug!("{name}: {err:?}");
                write_stderr_line(stderr, format!("error: {name}: {}", error_chain(&err)));
                report.failed.push((name, err));
            }
        }
    }
    if !context.quiet {
        write_stderr_line(
            stderr,
            summary_message(report.generated.len(), report.failed.len()),
        );
    }
    report
}

fn generate_one(
    context: &PipelineContext<'_>,
    target: &BinaryTarget,
    stdout: &mut dyn Write,
) -> Result<()> {
    let manifest = target.binary.build(context.fetcher)?;
    match context.output_dir {
        Some(dir) => write_dotslash_file(&manifest, &dir.join(&target.file)),
        None => {
            let contents = render_dotslash_file(&manifest)?;
            stdout
                .write_all(contents.as_bytes())
                .map_err(|source| GeneratorError::WriteFailed {
                    path: "<stdout>".into(),
                    source,
                })
        }
    }
}

/// Join an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::fetch::StubFetcher;
    use rstest::{fixture, rstest};

    const CONFIG: &str = r#"
        [[binary]]
        name = "tool"
        version = "1.2.3"

        [[binary.platform]]
        name = "linux"
        path = "tool"
        url = "https://example.com/v{version}/tool.tar.gz"

        [[binary]]
        name = "helper"
        version = "2.0.0"

        [[binary.platform]]
        name = "linux"
        path = "helper"
        url = "https://example.com/helper/v{version}/helper.zip"
    "#;

    const TOOL_URL: &str = "https://example.com/v1.2.3/tool.tar.gz";
    const HELPER_URL: &str = "https://example.com/helper/v2.0.0/helper.zip";

    #[fixture]
    fn targets() -> Vec<BinaryTarget> {
        config::parse(CONFIG)
            .expect("valid config")
            .binaries()
            .expect("valid binaries")
    }

    fn names(targets: &[BinaryTarget]) -> Vec<&str> {
        targets.iter().map(|t| t.binary.name()).collect()
    }

    #[rstest]
    fn select_with_no_names_keeps_everything(targets: Vec<BinaryTarget>) {
        let selected = select_targets(targets, &[]).expect("selects");
        assert_eq!(names(&selected), ["tool", "helper"]);
    }

    #[rstest]
    fn select_filters_by_name(targets: Vec<BinaryTarget>) {
        let selected = select_targets(targets, &["helper".to_owned()]).expect("selects");
        assert_eq!(names(&selected), ["helper"]);
    }

    #[rstest]
    fn select_rejects_unknown_names(targets: Vec<BinaryTarget>) {
        let err = select_targets(targets, &["nope".to_owned()]).expect_err("should fail");
        assert!(matches!(err, GeneratorError::UnknownBinary { ref name } if name == "nope"));
    }

    #[rstest]
    fn writes_manifests_to_stdout_without_output_dir(targets: Vec<BinaryTarget>) {
        let fetcher = StubFetcher::new()
            .with_body(TOOL_URL, b"tool".to_vec())
            .with_body(HELPER_URL, b"helper".to_vec());
        let context = PipelineContext {
            fetcher: &fetcher,
            output_dir: None,
            quiet: true,
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let report = generate(&context, &targets, &mut stdout, &mut stderr);

        assert!(report.is_success());
        assert_eq!(report.generated, ["tool-v1.2.3", "helper-v2.0.0"]);
        let text = String::from_utf8(stdout).expect("utf-8");
        assert_eq!(text.matches("#!/usr/bin/env dotslash").count(), 2);
        assert!(stderr.is_empty());
    }

    #[rstest]
    fn failure_does_not_stop_other_binaries(targets: Vec<BinaryTarget>) {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = Utf8Path::from_path(dir.path()).expect("utf-8");
        let fetcher = StubFetcher::new()
            .with_failure(TOOL_URL, "connection reset")
            .with_body(HELPER_URL, b"helper".to_vec());
        let context = PipelineContext {
            fetcher: &fetcher,
            output_dir: Some(out),
            quiet: false,
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let report = generate(&context, &targets, &mut stdout, &mut stderr);

        assert!(!report.is_success());
        assert_eq!(report.generated, ["helper-v2.0.0"]);
        assert!(!out.join("tool").exists());
        assert!(out.join("helper").exists());

        let messages = String::from_utf8(stderr).expect("utf-8");
        assert!(messages.contains("error: tool-v1.2.3"), "{messages}");
        assert!(messages.contains("connection reset"), "{messages}");
        assert!(messages.contains("Generated 1 manifest; 1 failed"), "{messages}");
        assert!(stdout.is_empty());
    }

    #[rstest]
    fn quiet_failure_is_reported_once(targets: Vec<BinaryTarget>) {
        let fetcher = StubFetcher::new()
            .with_failure(TOOL_URL, "connection reset")
            .with_body(HELPER_URL, b"helper".to_vec());
        let context = PipelineContext {
            fetcher: &fetcher,
            output_dir: None,
            quiet: true,
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let report = generate(&context, &targets, &mut stdout, &mut stderr);

        assert_eq!(report.failed.len(), 1);
        let messages = String::from_utf8(stderr).expect("utf-8");
        assert_eq!(messages.lines().count(), 1, "{messages}");
        assert_eq!(messages.matches("connection reset").count(), 1, "{messages}");
    }

    #[test]
    fn error_chain_includes_sources() {
        let err = GeneratorError::WriteFailed {
            path: "out/tool".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(error_chain(&err), "failed to write out/tool: disk full");
    }
}
