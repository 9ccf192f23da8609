//! DotSlash manifest generator.
//!
//! Turns a small declarative description of a binary (name, version, and
//! per-platform path and URL templates) into a DotSlash manifest. Each
//! platform's artefact is downloaded once, measured, hashed with SHA-256, and
//! classified by its URL's archive extension. The `dotslash-gen` binary drives
//! the library from a TOML configuration file.
//!
//! # Example
//!
//! ```
//! use dotslash_gen::fetch::{ArtefactFetcher, FetchError};
//! use dotslash_gen::manifest::DotslashBinary;
//! use dotslash_gen::platform::DotslashPlatform;
//! use dotslash_gen::template::Template;
//! use dotslash_gen::version::DotslashVersion;
//!
//! let linux = DotslashPlatform::new(
//!     "linux",
//!     Template::parse("tool/{version}/linux/tool").expect("valid template"),
//!     Template::parse("https://example.com/v{version}/tool.tar.zst").expect("valid template"),
//! );
//! let binary = DotslashBinary::new("tool", DotslashVersion::new(1, 2, 3), vec![linux]);
//!
//! struct Canned;
//!
//! impl ArtefactFetcher for Canned {
//!     fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
//!         Ok(b"bytes".to_vec())
//!     }
//! }
//!
//! let manifest = binary.build(&Canned).expect("builds");
//! assert_eq!(manifest.name(), "tool-v1.2.3");
//! assert_eq!(manifest.platform("linux").map(|record| record.size()), Some(5));
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - TOML configuration loading
//! - [`digest`] - SHA-256 digest computation
//! - [`error`] - Aggregate error type
//! - [`fetch`] - Artefact retrieval over HTTP
//! - [`format`] - Archive format inference from URL suffixes
//! - [`manifest`] - Manifest assembly across platforms
//! - [`output`] - DotSlash file rendering and writing
//! - [`pipeline`] - Multi-binary generation orchestration
//! - [`platform`] - Per-platform resolution
//! - [`template`] - Version-aware path and URL templates
//! - [`version`] - `major.minor.patch` version value

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod format;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod template;
pub mod version;
