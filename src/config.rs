//! TOML description of the binaries to generate manifests for.
//!
//! A configuration file lists one or more `[[binary]]` tables, each with its
//! own `[[binary.platform]]` entries:
//!
//! ```toml
//! [[binary]]
//! name = "tool"
//! version = "1.2.3"
//!
//! [[binary.platform]]
//! name = "linux-x86_64"
//! path = "tool-{version}/tool"
//! url = "https://example.com/v{version}/tool-linux.tar.gz"
//! ```
//!
//! Path and URL strings use the placeholder syntax described in
//! [`crate::template::parser`]. Unknown keys are rejected so that typos do
//! not silently produce a manifest missing a platform.

use crate::error::{GeneratorError, Result};
use crate::manifest::DotslashBinary;
use crate::platform::DotslashPlatform;
use crate::template::Template;
use crate::version::DotslashVersion;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;

/// Top-level configuration document.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// The binaries to generate manifests for, in file order.
    #[serde(default, rename = "binary")]
    pub binaries: Vec<BinaryConfig>,
}

/// One `[[binary]]` table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BinaryConfig {
    /// Base name of the binary; the manifest is named `{name}-v{version}`.
    pub name: String,
    /// Version string in `major.minor.patch` form.
    pub version: String,
    /// Output file name; defaults to [`Self::name`].
    #[serde(default)]
    pub file: Option<String>,
    /// Platform entries in resolution order.
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformConfig>,
}

/// One `[[binary.platform]]` table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Platform name, used as the manifest key.
    pub name: String,
    /// Install-path template.
    pub path: String,
    /// Provider-URL template.
    pub url: String,
}

/// A binary ready to build, paired with the file its manifest is written to.
#[derive(Debug, Clone)]
pub struct BinaryTarget {
    /// The resolved builder.
    pub binary: DotslashBinary,
    /// Output file name relative to the output directory.
    pub file: Utf8PathBuf,
}

impl GeneratorConfig {
    /// Convert every binary table into a [`BinaryTarget`].
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Config`] for a malformed version or
    /// template, or an output file name that escapes the output directory,
    /// and [`GeneratorError::DuplicateOutputFile`] when two binaries would write
    /// the same file.
    pub fn binaries(&self) -> Result<Vec<BinaryTarget>> {
        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(self.binaries.len());
        for binary in &self.binaries {
            let target = binary.to_target()?;
            if !seen.insert(target.file.clone()) {
                return Err(GeneratorError::DuplicateOutputFile { file: target.file });
            }
            targets.push(target);
        }
        Ok(targets)
    }
}

impl BinaryConfig {
    /// Return the output file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or(&self.name)
    }

    fn to_target(&self) -> Result<BinaryTarget> {
        let version: DotslashVersion =
            self.version.parse().map_err(|err| GeneratorError::Config {
                reason: format!("binary {}: {err}", self.name),
            })?;
        let platforms = self
            .platforms
            .iter()
            .map(|platform| platform.to_platform(&self.name))
            .collect::<Result<Vec<_>>>()?;
        let file = validate_file_name(&self.name, self.file_name())?;

        Ok(BinaryTarget {
            binary: DotslashBinary::new(self.name.clone(), version, platforms),
            file,
        })
    }
}

impl PlatformConfig {
    fn to_platform(&self, binary: &str) -> Result<DotslashPlatform> {
        let parse = |field: &str, source: &str| {
            Template::parse(source).map_err(|err| GeneratorError::Config {
                reason: format!("binary {binary}, platform {}: {field}: {err}", self.name),
            })
        };
        Ok(DotslashPlatform::new(
            self.name.clone(),
            parse("path", &self.path)?,
            parse("url", &self.url)?,
        ))
    }
}

/// Output files are plain names inside the output directory.
fn validate_file_name(binary: &str, file: &str) -> Result<Utf8PathBuf> {
    let path = Utf8Path::new(file);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(camino::Utf8Component::Normal(_)), None) => Ok(path.to_owned()),
        _ => Err(GeneratorError::Config {
            reason: format!("binary {binary}: output file {file:?} must be a plain file name"),
        }),
    }
}

/// Parse a configuration document.
///
/// # Errors
///
/// Returns [`GeneratorError::Config`] when the TOML is malformed or contains
/// unknown keys.
///
/// # Examples
///
/// ```
/// use dotslash_gen::config;
///
/// let config = config::parse(r#"
/// [[binary]]
/// name = "tool"
/// version = "1.2.3"
///
/// [[binary.platform]]
/// name = "linux"
/// path = "tool"
/// url = "https://example.com/v{version}/tool.tar.gz"
/// "#).expect("valid config");
/// assert_eq!(config.binaries.len(), 1);
/// ```
pub fn parse(source: &str) -> Result<GeneratorConfig> {
    toml::from_str(source).map_err(|err| GeneratorError::Config {
        reason: err.to_string(),
    })
}

/// Read and parse the configuration file at `path`.
///
/// # Errors
///
/// Returns [`GeneratorError::ConfigRead`] when the file cannot be read and
/// [`GeneratorError::Config`] when its contents are invalid.
pub fn load(path: &Utf8Path) -> Result<GeneratorConfig> {
    debug!("loading configuration from {path}");
    let source = std::fs::read_to_string(path).map_err(|source| GeneratorError::ConfigRead {
        path: path.to_owned(),
        source,
    })?;
    parse(&source)
}
