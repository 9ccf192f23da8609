//! Archive format inference from provider URL suffixes.
//!
//! DotSlash records how a provider's bytes are packaged through the optional
//! `format` field. The generator infers it from the rendered URL's extension.
//! Multi-segment extensions must win over their single-segment tails, so the
//! candidate table is sorted by extension length (longest first) once and
//! then scanned linearly: `tool.tar.gz` is `tar.gz`, never `gz`.

use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;
use std::sync::OnceLock;

/// A canonical archive or compression format understood by DotSlash.
///
/// Serialises as its canonical extension string (for example `"tar.zst"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ArchiveFormat {
    /// Bzip2-compressed tarball.
    #[serde(rename = "tar.bz2")]
    TarBz2,
    /// Gzip-compressed tarball.
    #[serde(rename = "tar.gz")]
    TarGz,
    /// XZ-compressed tarball.
    #[serde(rename = "tar.xz")]
    TarXz,
    /// Zstandard-compressed tarball.
    #[serde(rename = "tar.zst")]
    TarZst,
    /// Uncompressed tarball.
    #[serde(rename = "tar")]
    Tar,
    /// Zip archive.
    #[serde(rename = "zip")]
    Zip,
    /// Single bzip2-compressed file.
    #[serde(rename = "bz2")]
    Bz2,
    /// Single gzip-compressed file.
    #[serde(rename = "gz")]
    Gz,
    /// Single XZ-compressed file.
    #[serde(rename = "xz")]
    Xz,
    /// Single Zstandard-compressed file.
    #[serde(rename = "zst")]
    Zst,
}

/// Canonical formats and the additional extensions that alias them.
const FORMAT_TABLE: &[(ArchiveFormat, &[&str])] = &[
    (ArchiveFormat::TarBz2, &[]),
    (ArchiveFormat::TarGz, &["tgz"]),
    (ArchiveFormat::TarXz, &[]),
    (ArchiveFormat::TarZst, &[]),
    (ArchiveFormat::Tar, &[]),
    (ArchiveFormat::Zip, &[]),
    (ArchiveFormat::Bz2, &[]),
    (ArchiveFormat::Gz, &[]),
    (ArchiveFormat::Xz, &[]),
    (ArchiveFormat::Zst, &[]),
];

impl ArchiveFormat {
    /// Return the canonical extension, without a leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotslash_gen::format::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::TarZst.as_str(), "tar.zst");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TarBz2 => "tar.bz2",
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Tar => "tar",
            Self::Zip => "zip",
            Self::Bz2 => "bz2",
            Self::Gz => "gz",
            Self::Xz => "xz",
            Self::Zst => "zst",
        }
    }

    /// Return every canonical format in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        FORMAT_TABLE.iter().map(|&(format, _)| format)
    }

    /// Return the alias extensions that map to this format.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        FORMAT_TABLE
            .iter()
            .find(|&&(format, _)| format == self)
            .map(|&(_, aliases)| aliases)
            .unwrap_or_default()
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return the `(extension, format)` candidates in lookup order.
///
/// Built on first use: one pair per canonical extension mapped to itself, one
/// per alias mapped to its canonical format, sorted by descending extension
/// length with ties broken alphabetically.
fn candidates() -> &'static [(&'static str, ArchiveFormat)] {
    static CANDIDATES: OnceLock<Vec<(&'static str, ArchiveFormat)>> = OnceLock::new();
    CANDIDATES.get_or_init(|| {
        let mut pairs: Vec<(&'static str, ArchiveFormat)> = FORMAT_TABLE
            .iter()
            .flat_map(|&(format, aliases)| {
                std::iter::once((format.as_str(), format))
                    .chain(aliases.iter().map(move |&alias| (alias, format)))
            })
            .collect();
        pairs.sort_by_key(|&(extension, _)| (Reverse(extension.len()), extension));
        pairs
    })
}

/// Infer the archive format of `url` from its suffix.
///
/// Returns `None` when no known extension, preceded by a dot, ends the URL.
/// Matching is case-sensitive and considers the URL as given, so a query
/// string after the extension prevents a match.
///
/// # Examples
///
/// ```
/// use dotslash_gen::format::{ArchiveFormat, infer_format};
///
/// assert_eq!(infer_format("https://x.test/tool.tar.gz"), Some(ArchiveFormat::TarGz));
/// assert_eq!(infer_format("https://x.test/tool.tgz"), Some(ArchiveFormat::TarGz));
/// assert_eq!(infer_format("https://x.test/tool.exe"), None);
/// ```
#[must_use]
pub fn infer_format(url: &str) -> Option<ArchiveFormat> {
    candidates().iter().find_map(|&(extension, format)| {
        url.strip_suffix(extension)
            .filter(|stem| stem.ends_with('.'))
            .map(|_| format)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::tar_gz("https://example.com/tool.tar.gz", Some(ArchiveFormat::TarGz))]
    #[case::tgz_alias("https://example.com/tool.tgz", Some(ArchiveFormat::TarGz))]
    #[case::tar_bz2("https://example.com/tool.tar.bz2", Some(ArchiveFormat::TarBz2))]
    #[case::tar_xz("https://example.com/tool.tar.xz", Some(ArchiveFormat::TarXz))]
    #[case::tar_zst("https://example.com/tool.tar.zst", Some(ArchiveFormat::TarZst))]
    #[case::tar("https://example.com/tool.tar", Some(ArchiveFormat::Tar))]
    #[case::zip("https://example.com/tool.zip", Some(ArchiveFormat::Zip))]
    #[case::bz2("https://example.com/tool.bz2", Some(ArchiveFormat::Bz2))]
    #[case::gz("https://example.com/tool.gz", Some(ArchiveFormat::Gz))]
    #[case::xz("https://example.com/tool.xz", Some(ArchiveFormat::Xz))]
    #[case::zst("https://example.com/tool.zst", Some(ArchiveFormat::Zst))]
    #[case::exe("https://example.com/tool.exe", None)]
    #[case::bare("https://example.com/tool", None)]
    #[case::no_dot("https://example.com/toolzip", None)]
    #[case::query_string("https://example.com/tool.tar.gz?download=1", None)]
    #[case::upper_case("https://example.com/TOOL.TAR.GZ", None)]
    fn infers_format_from_suffix(#[case] url: &str, #[case] expected: Option<ArchiveFormat>) {
        assert_eq!(infer_format(url), expected);
    }

    #[test]
    fn longest_suffix_wins_over_single_segment_tail() {
        let url = "https://example.com/release.tar.gz";
        assert!(url.ends_with(".gz"));
        assert_eq!(infer_format(url), Some(ArchiveFormat::TarGz));
    }

    #[test]
    fn candidates_are_sorted_by_descending_length() {
        let lengths: Vec<usize> = candidates().iter().map(|(ext, _)| ext.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by_key(|&len| Reverse(len));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn candidates_include_every_format_and_alias() {
        let expected = ArchiveFormat::all()
            .map(|format| 1 + format.aliases().len())
            .sum::<usize>();
        assert_eq!(candidates().len(), expected);
        assert!(candidates().contains(&("tgz", ArchiveFormat::TarGz)));
    }

    #[test]
    fn equal_length_ties_break_alphabetically() {
        let three: Vec<&str> = candidates()
            .iter()
            .map(|&(ext, _)| ext)
            .filter(|ext| ext.len() == 3)
            .collect();
        assert_eq!(three, vec!["bz2", "tar", "tgz", "zip", "zst"]);
    }

    #[test]
    fn serialises_as_canonical_extension() {
        let json = serde_json::to_string(&ArchiveFormat::TarZst).expect("serialise");
        assert_eq!(json, "\"tar.zst\"");
    }

    #[test]
    fn display_matches_as_str() {
        for format in ArchiveFormat::all() {
            assert_eq!(format.to_string(), format.as_str());
        }
    }

    #[test]
    fn aliases_lookup() {
        assert_eq!(ArchiveFormat::TarGz.aliases(), &["tgz"]);
        assert!(ArchiveFormat::Zip.aliases().is_empty());
    }
}
