//! Artefact retrieval for provider URLs.
//!
//! Provides a trait-based abstraction over "fetch this URL into memory" so
//! that manifest assembly can be exercised without network access. The
//! production implementation holds a `ureq` agent built with a global
//! timeout. Retrieval is never retried here: a failure propagates so that no
//! manifest is ever emitted with a guessed digest.

use log::{debug, trace};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::sync::OnceLock;
use std::time::Duration;

/// Default network timeout for a single artefact download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for retrieving the full body behind a provider URL.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```
/// use dotslash_gen::fetch::HttpFetcher;
///
/// let fetcher = HttpFetcher::default();
/// // Use fetcher.fetch("https://example.com/tool.tar.gz") in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactFetcher {
    /// Fetch every byte served at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error for any non-success outcome, including a body that
    /// ends before its declared length.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Errors arising from artefact retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The body ended before the length the server declared.
    #[error("truncated download for {url}: expected {expected} bytes, received {received}")]
    Truncated {
        /// The URL that was requested.
        url: String,
        /// The declared `Content-Length`.
        expected: u64,
        /// The number of bytes actually read.
        received: u64,
    },

    /// I/O error while reading the response body.
    #[error("I/O error reading {url}")]
    Io {
        /// The URL being read.
        url: String,
        /// The underlying read failure.
        #[source]
        source: std::io::Error,
    },
}

/// HTTP-based fetcher using `ureq`.
///
/// The agent is built once per fetcher, so every download through it shares
/// one connection pool. The default timeout reuses a process-wide agent.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with a custom global request timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use dotslash_gen::fetch::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::with_timeout(Duration::from_secs(120));
    /// assert_eq!(fetcher.timeout(), Duration::from_secs(120));
    /// ```
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = if timeout == DEFAULT_TIMEOUT {
            shared_agent().clone()
        } else {
            build_agent(timeout)
        };
        Self { agent, timeout }
    }

    /// Return the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ArtefactFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("fetching {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        let mut body = response.into_body();
        let declared = body.content_length();
        let mut bytes = Vec::new();
        if let Err(source) = body.as_reader().read_to_end(&mut bytes) {
            return Err(map_read_error(url, declared, &bytes, source));
        }
        check_declared_length(url, declared, &bytes)?;

        trace!("fetched {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Shared `ureq` agent for the default timeout.
fn shared_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| build_agent(DEFAULT_TIMEOUT))
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Reject a body shorter (or longer) than the declared `Content-Length`.
fn check_declared_length(url: &str, declared: Option<u64>, bytes: &[u8]) -> Result<(), FetchError> {
    match declared {
        Some(expected) if expected != byte_count(bytes) => Err(FetchError::Truncated {
            url: url.to_owned(),
            expected,
            received: byte_count(bytes),
        }),
        _ => Ok(()),
    }
}

/// Map a body read failure, treating an early end against a declared length
/// as truncation.
fn map_read_error(
    url: &str,
    declared: Option<u64>,
    bytes: &[u8],
    source: std::io::Error,
) -> FetchError {
    match declared {
        Some(expected) if source.kind() == ErrorKind::UnexpectedEof => FetchError::Truncated {
            url: url.to_owned(),
            expected,
            received: byte_count(bytes),
        },
        _ => FetchError::Io {
            url: url.to_owned(),
            source,
        },
    }
}

fn byte_count(bytes: &[u8]) -> u64 {
    u64::try_from(bytes.len()).unwrap_or(u64::MAX)
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use stub::StubFetcher;

#[cfg(any(test, feature = "test-support"))]
mod stub {
    use super::{ArtefactFetcher, FetchError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory fetcher serving canned bodies keyed by URL.
    ///
    /// Unknown URLs yield [`FetchError::NotFound`]; URLs registered with
    /// [`StubFetcher::with_failure`] yield [`FetchError::Http`]. Every request
    /// is recorded in order.
    #[derive(Debug, Default)]
    pub struct StubFetcher {
        bodies: HashMap<String, Vec<u8>>,
        failures: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        /// Create an empty stub.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `body` for `url`.
        #[must_use]
        pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(url.into(), body.into());
            self
        }

        /// Fail requests for `url` with `reason`.
        #[must_use]
        pub fn with_failure(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
            self.failures.insert(url.into(), reason.into());
            self
        }

        /// Return every URL requested so far, in order.
        #[must_use]
        pub fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }

        /// Return how many times `url` has been requested.
        #[must_use]
        pub fn request_count(&self, url: &str) -> usize {
            self.requests
                .borrow()
                .iter()
                .filter(|requested| requested.as_str() == url)
                .count()
        }
    }

    impl ArtefactFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.borrow_mut().push(url.to_owned());
            if let Some(reason) = self.failures.get(url) {
                return Err(FetchError::Http {
                    url: url.to_owned(),
                    reason: reason.clone(),
                });
            }
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::NotFound {
                    url: url.to_owned(),
                })
        }
    }
}
