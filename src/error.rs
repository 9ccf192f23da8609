//! Error types for manifest generation.
//!
//! Each stage has its own error enum ([`TemplateError`], [`FetchError`],
//! [`VersionError`]); [`GeneratorError`] aggregates them with the platform or
//! binary they occurred in, so a failed build names what it was resolving.
//! Every variant is fatal to the manifest being built.

use crate::fetch::FetchError;
use crate::template::TemplateError;
use crate::version::VersionError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while generating DotSlash manifests.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A path or URL template failed to render for a platform.
    #[error("failed to render {field} template for platform {platform}")]
    Render {
        /// The platform being resolved.
        platform: String,
        /// Which template failed (`path` or `url`).
        field: &'static str,
        /// The underlying template failure.
        #[source]
        source: TemplateError,
    },

    /// Retrieving a provider URL failed for a platform.
    #[error("failed to fetch artefact for platform {platform}")]
    Fetch {
        /// The platform being resolved.
        platform: String,
        /// The underlying retrieval failure.
        #[source]
        source: FetchError,
    },

    /// Two descriptors of the same binary share a platform name.
    #[error("binary {binary} declares platform {platform} more than once")]
    DuplicatePlatform {
        /// The binary's name.
        binary: String,
        /// The repeated platform name.
        platform: String,
    },

    /// Two binaries in one configuration would write the same output file.
    #[error("output file {file} is written by more than one binary")]
    DuplicateOutputFile {
        /// The shared output file name.
        file: Utf8PathBuf,
    },

    /// A binary requested by name is not in the configuration.
    #[error("binary {name} not found in configuration")]
    UnknownBinary {
        /// The requested name.
        name: String,
    },

    /// A version string in the configuration is malformed.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    ConfigRead {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is syntactically or semantically invalid.
    #[error("invalid configuration: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },

    /// The manifest could not be serialised to JSON.
    #[error("failed to serialise manifest")]
    Serialization(#[from] serde_json::Error),

    /// Writing a manifest to its destination failed.
    #[error("failed to write {path}")]
    WriteFailed {
        /// The destination that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`GeneratorError`].
pub type Result<T> = std::result::Result<T, GeneratorError>;
