//! Per-platform resolution: render, classify, fetch, hash, assemble.
//!
//! A [`DotslashPlatform`] is the caller's static description of one platform.
//! A [`PlatformResolver`] pairs it with the binary's version and produces the
//! [`PlatformRecord`] that lands in the manifest. Resolution performs exactly
//! one fetch; size and digest are computed from that single body.

use crate::digest::{self, Sha256Digest};
use crate::error::{GeneratorError, Result};
use crate::fetch::ArtefactFetcher;
use crate::format::{ArchiveFormat, infer_format};
use crate::template::Template;
use crate::version::DotslashVersion;
use log::{debug, info};
use serde::Serialize;

/// Static description of one platform's artefact.
#[derive(Debug, Clone)]
pub struct DotslashPlatform {
    name: String,
    path_template: Template,
    provider_url_template: Template,
}

impl DotslashPlatform {
    /// Describe a platform by name, install-path template, and provider-URL
    /// template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path_template: Template,
        provider_url_template: Template,
    ) -> Self {
        Self {
            name: name.into(),
            path_template,
            provider_url_template,
        }
    }

    /// Return the platform name used as the manifest key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the install-path template.
    #[must_use]
    pub fn path_template(&self) -> &Template {
        &self.path_template
    }

    /// Return the provider-URL template.
    #[must_use]
    pub fn provider_url_template(&self) -> &Template {
        &self.provider_url_template
    }
}

/// The hash scheme recorded for every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HashAlgorithm {
    /// SHA-256, hex-encoded.
    #[serde(rename = "sha256")]
    Sha256,
}

/// A location from which a platform's artefact can be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// The fully rendered URL.
    pub url: String,
}

/// The resolved manifest entry for one platform.
///
/// Serialises with the keys DotSlash expects, in this order: `size`, `hash`,
/// `digest`, `format` (omitted when unknown), `path`, `providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformRecord {
    size: u64,
    hash: HashAlgorithm,
    digest: Sha256Digest,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<ArchiveFormat>,
    path: String,
    providers: Vec<Provider>,
}

impl PlatformRecord {
    /// Return the artefact size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Return the hash algorithm.
    #[must_use]
    pub const fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /// Return the artefact digest.
    #[must_use]
    pub const fn digest(&self) -> &Sha256Digest {
        &self.digest
    }

    /// Return the inferred archive format, if any.
    #[must_use]
    pub const fn format(&self) -> Option<ArchiveFormat> {
        self.format
    }

    /// Return the rendered install path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Return the providers.
    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }
}

/// Resolves one [`DotslashPlatform`] against a version.
#[derive(Debug, Clone, Copy)]
pub struct PlatformResolver<'a> {
    version: &'a DotslashVersion,
    platform: &'a DotslashPlatform,
}

impl<'a> PlatformResolver<'a> {
    /// Pair a platform with the version it is being resolved for.
    #[must_use]
    pub const fn new(version: &'a DotslashVersion, platform: &'a DotslashPlatform) -> Self {
        Self { version, platform }
    }

    /// Render the install path.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Render`] if a substitution fails.
    pub fn path(&self) -> Result<String> {
        self.render("path", &self.platform.path_template)
    }

    /// Render the provider URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Render`] if a substitution fails.
    pub fn provider_url(&self) -> Result<String> {
        self.render("url", &self.platform.provider_url_template)
    }

    /// Fetch the artefact once and assemble the platform's record.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Render`] if either template fails and
    /// [`GeneratorError::Fetch`] if retrieval fails. Templates are rendered
    /// before any network traffic.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotslash_gen::fetch::{ArtefactFetcher, FetchError};
    /// use dotslash_gen::format::ArchiveFormat;
    /// use dotslash_gen::platform::{DotslashPlatform, PlatformResolver};
    /// use dotslash_gen::template::Template;
    /// use dotslash_gen::version::DotslashVersion;
    ///
    /// let version = DotslashVersion::new(1, 2, 3);
    /// let platform = DotslashPlatform::new(
    ///     "linux",
    ///     Template::parse("tool-{version}/tool").expect("valid"),
    ///     Template::parse("https://x.test/v{version}/tool.tar.zst").expect("valid"),
    /// );
    /// # struct Canned;
    /// # impl ArtefactFetcher for Canned {
    /// #     fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
    /// #         Ok(b"abc".to_vec())
    /// #     }
    /// # }
    ///
    /// let record = PlatformResolver::new(&version, &platform)
    ///     .resolve(&Canned)
    ///     .expect("resolves");
    /// assert_eq!(record.size(), 3);
    /// assert_eq!(record.format(), Some(ArchiveFormat::TarZst));
    /// assert_eq!(record.path(), "tool-1.2.3/tool");
    /// ```
    pub fn resolve(&self, fetcher: &dyn ArtefactFetcher) -> Result<PlatformRecord> {
        let path = self.path()?;
        let url = self.provider_url()?;
        let format = infer_format(&url);
        debug!(
            "platform {}: url {url}, format {}",
            self.platform.name,
            format.map_or("none", ArchiveFormat::as_str)
        );

        let bytes = fetcher
            .fetch(&url)
            .map_err(|source| GeneratorError::Fetch {
                platform: self.platform.name.clone(),
                source,
            })?;
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        let digest = digest::compute(&bytes);
        info!("platform {}: {size} bytes, sha256 {digest}", self.platform.name);

        Ok(PlatformRecord {
            size,
            hash: HashAlgorithm::Sha256,
            digest,
            format,
            path,
            providers: vec![Provider { url }],
        })
    }

    fn render(&self, field: &'static str, template: &Template) -> Result<String> {
        template
            .render(self.version)
            .map_err(|source| GeneratorError::Render {
                platform: self.platform.name.clone(),
                field,
                source,
            })
    }
}
