//! DotSlash file rendering and writing.
//!
//! A DotSlash file is the manifest's pretty-printed JSON preceded by the
//! `#!/usr/bin/env dotslash` shebang and a blank line. On Unix the written
//! file is marked executable so it can stand in for the binary it describes.

use crate::error::{GeneratorError, Result};
use crate::manifest::Manifest;
use camino::Utf8Path;
use log::debug;
use std::io::Write;

/// First line of every DotSlash file.
pub const SHEBANG: &str = "#!/usr/bin/env dotslash";

/// Render `manifest` as the full contents of a DotSlash file.
///
/// # Errors
///
/// Returns [`GeneratorError::Serialization`] if the manifest cannot be
/// encoded.
///
/// # Examples
///
/// ```
/// use dotslash_gen::fetch::{ArtefactFetcher, FetchError};
/// use dotslash_gen::manifest::DotslashBinary;
/// use dotslash_gen::output::render_dotslash_file;
/// use dotslash_gen::version::DotslashVersion;
///
/// # struct Offline;
/// # impl ArtefactFetcher for Offline {
/// #     fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
/// #         Err(FetchError::NotFound { url: url.to_owned() })
/// #     }
/// # }
/// let manifest = DotslashBinary::new("tool", DotslashVersion::new(1, 0, 0), Vec::new())
///     .build(&Offline)
///     .expect("builds");
/// let text = render_dotslash_file(&manifest).expect("renders");
/// assert!(text.starts_with("#!/usr/bin/env dotslash\n\n{"));
/// assert!(text.ends_with("}\n"));
/// ```
pub fn render_dotslash_file(manifest: &Manifest) -> Result<String> {
    let json = manifest.to_json_pretty()?;
    Ok(format!("{SHEBANG}\n\n{json}\n"))
}

/// Write `manifest` as a DotSlash file at `path`.
///
/// The file is created or truncated; on Unix its mode is set to `0o755`.
///
/// # Errors
///
/// Returns [`GeneratorError::Serialization`] if the manifest cannot be
/// encoded and [`GeneratorError::WriteFailed`] if the file cannot be written.
pub fn write_dotslash_file(manifest: &Manifest, path: &Utf8Path) -> Result<()> {
    let contents = render_dotslash_file(manifest)?;
    let write_failed = |source| GeneratorError::WriteFailed {
        path: path.to_owned(),
        source,
    };
    std::fs::write(path, contents).map_err(write_failed)?;
    set_executable(path).map_err(write_failed)?;
    debug!("wrote {path}");
    Ok(())
}

/// Create `dir` and any missing parents.
///
/// # Errors
///
/// Returns [`GeneratorError::WriteFailed`] if the directory cannot be
/// created, for example because a file already occupies the path.
pub fn ensure_output_dir(dir: &Utf8Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| GeneratorError::WriteFailed {
        path: dir.to_owned(),
        source,
    })
}

#[cfg(unix)]
fn set_executable(path: &Utf8Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Utf8Path) -> std::io::Result<()> {
    Ok(())
}

/// Format the end-of-run summary.
#[must_use]
pub fn summary_message(generated: usize, failed: usize) -> String {
    let plural = if generated == 1 { "manifest" } else { "manifests" };
    if failed == 0 {
        format!("Generated {generated} {plural}")
    } else {
        format!("Generated {generated} {plural}; {failed} failed")
    }
}

/// Write a line to `stderr`, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; nothing useful to do on failure.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StubFetcher;
    use crate::manifest::DotslashBinary;
    use crate::platform::DotslashPlatform;
    use crate::template::Template;
    use crate::version::DotslashVersion;
    use rstest::{fixture, rstest};

    #[fixture]
    fn manifest() -> Manifest {
        let platform = DotslashPlatform::new(
            "linux",
            Template::literal("tool"),
            Template::literal("https://example.com/tool.tgz"),
        );
        DotslashBinary::new("tool", DotslashVersion::new(2, 0, 1), vec![platform])
            .build(&StubFetcher::new().with_body("https://example.com/tool.tgz", b"x".to_vec()))
            .expect("builds")
    }

    #[rstest]
    fn dotslash_file_is_shebang_then_json(manifest: Manifest) {
        let text = render_dotslash_file(&manifest).expect("renders");
        let body = text
            .strip_prefix("#!/usr/bin/env dotslash\n\n")
            .expect("shebang header");
        let value: serde_json::Value = serde_json::from_str(body).expect("json body");
        assert_eq!(value["name"], "tool-v2.0.1");
        assert_eq!(value["platforms"]["linux"]["format"], "tar.gz");
        assert!(text.ends_with("}\n"));
    }

    #[rstest]
    fn writes_file_to_disk(manifest: Manifest) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8Path::from_path(dir.path()).expect("utf-8").join("tool");

        write_dotslash_file(&manifest, &path).expect("writes");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, render_dotslash_file(&manifest).expect("renders"));
    }

    #[cfg(unix)]
    #[rstest]
    fn written_file_is_executable(manifest: Manifest) {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8Path::from_path(dir.path()).expect("utf-8").join("tool");
        write_dotslash_file(&manifest, &path).expect("writes");

        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[rstest]
    fn missing_directory_reports_write_failure(manifest: Manifest) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8Path::from_path(dir.path())
            .expect("utf-8")
            .join("absent")
            .join("tool");

        let err = write_dotslash_file(&manifest, &path).expect_err("should fail");
        assert!(matches!(err, GeneratorError::WriteFailed { .. }));
    }

    #[test]
    fn ensure_output_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let nested = Utf8Path::from_path(dir.path())
            .expect("utf-8")
            .join("dist")
            .join("bin");

        ensure_output_dir(&nested).expect("creates");
        ensure_output_dir(&nested).expect("existing directory is fine");
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_output_dir_rejects_file_in_the_way() {
        let dir = tempfile::tempdir().expect("temp dir");
        let occupied = Utf8Path::from_path(dir.path()).expect("utf-8").join("bin");
        std::fs::write(&occupied, b"not a directory").expect("write file");

        let err = ensure_output_dir(&occupied).expect_err("should fail");
        assert!(matches!(err, GeneratorError::WriteFailed { ref path, .. } if path == &occupied));
    }

    #[rstest]
    #[case(1, 0, "Generated 1 manifest")]
    #[case(3, 0, "Generated 3 manifests")]
    #[case(2, 1, "Generated 2 manifests; 1 failed")]
    fn summary_message_counts(#[case] generated: usize, #[case] failed: usize, #[case] expected: &str) {
        assert_eq!(summary_message(generated, failed), expected);
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut stderr = Vec::new();
        write_stderr_line(&mut stderr, "hello");
        assert_eq!(stderr, b"hello\n");
    }
}
