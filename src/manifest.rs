//! Manifest assembly across every platform of one binary.
//!
//! [`DotslashBinary`] holds the name, version, and ordered platform
//! descriptors; [`DotslashBinary::build`] resolves each platform in order and
//! returns the [`Manifest`] document. The first failure aborts the build, so
//! a manifest is either complete or absent.

use crate::error::{GeneratorError, Result};
use crate::fetch::ArtefactFetcher;
use crate::platform::{DotslashPlatform, PlatformRecord, PlatformResolver};
use crate::version::DotslashVersion;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// A named, versioned binary and the platforms it ships for.
#[derive(Debug, Clone)]
pub struct DotslashBinary {
    name: String,
    version: DotslashVersion,
    platforms: Vec<DotslashPlatform>,
}

impl DotslashBinary {
    /// Describe a binary.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: DotslashVersion,
        platforms: Vec<DotslashPlatform>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            platforms,
        }
    }

    /// Return the binary's base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the version every platform is resolved against.
    #[must_use]
    pub const fn version(&self) -> DotslashVersion {
        self.version
    }

    /// Return the platform descriptors in resolution order.
    #[must_use]
    pub fn platforms(&self) -> &[DotslashPlatform] {
        &self.platforms
    }

    /// Return the manifest name, `{name}-v{version}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotslash_gen::manifest::DotslashBinary;
    /// use dotslash_gen::version::DotslashVersion;
    ///
    /// let binary = DotslashBinary::new("tool", DotslashVersion::new(1, 2, 3), Vec::new());
    /// assert_eq!(binary.dotslash_name(), "tool-v1.2.3");
    /// ```
    #[must_use]
    pub fn dotslash_name(&self) -> String {
        format!("{}-v{}", self.name, self.version)
    }

    /// Resolve every platform and assemble the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::DuplicatePlatform`] before any fetch if two
    /// descriptors share a name, and otherwise the first error raised while
    /// resolving a platform.
    pub fn build(&self, fetcher: &dyn ArtefactFetcher) -> Result<Manifest> {
        self.ensure_unique_platforms()?;

        let mut platforms = BTreeMap::new();
        for platform in &self.platforms {
            let record = PlatformResolver::new(&self.version, platform).resolve(fetcher)?;
            platforms.insert(platform.name().to_owned(), record);
        }

        let name = self.dotslash_name();
        info!("built manifest {name} with {} platform(s)", platforms.len());
        Ok(Manifest { name, platforms })
    }

    fn ensure_unique_platforms(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for platform in &self.platforms {
            if !seen.insert(platform.name()) {
                return Err(GeneratorError::DuplicatePlatform {
                    binary: self.name.clone(),
                    platform: platform.name().to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// A complete DotSlash manifest.
///
/// Platforms serialise in name order so that output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    name: String,
    platforms: BTreeMap<String, PlatformRecord>,
}

impl Manifest {
    /// Return the manifest name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the per-platform records keyed by platform name.
    #[must_use]
    pub const fn platforms(&self) -> &BTreeMap<String, PlatformRecord> {
        &self.platforms
    }

    /// Return the record for `platform`, if present.
    #[must_use]
    pub fn platform(&self, platform: &str) -> Option<&PlatformRecord> {
        self.platforms.get(platform)
    }

    /// Serialise to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialise to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Serialization`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
