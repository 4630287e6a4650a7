//! Content fetching for manifests and part sources.
//!
//! Every location in the manifest is resolved against a **site root**, which
//! is either a local directory or an `http(s)` base URL:
//!
//! | Location | Root `./site` | Root `https://blog.example/` |
//! |---|---|---|
//! | `blogs/a.md` | `./site/blogs/a.md` | `https://blog.example/blogs/a.md` |
//! | `https://cdn.example/b.md` | HTTP GET | HTTP GET |
//! | `file:///srv/c.md` | `/srv/c.md` | `/srv/c.md` |
//!
//! Nothing is cached and nothing is retried. HTTP requests carry a global
//! timeout so a stalled transport always ends in a [`FetchError`].

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP error fetching {url}: {message}")]
    Http { url: String, message: String },
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
    #[error("Invalid location {location:?}: {reason}")]
    Location { location: String, reason: String },
}

/// Retrieves raw text for a location.
///
/// Implementations must be shareable across threads: part fetches run on
/// background threads while the router stays on the driver thread.
pub trait Fetch: Send + Sync {
    fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

/// Base against which relative locations are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoot {
    Local(PathBuf),
    Remote(Url),
}

impl SiteRoot {
    /// Interpret a CLI argument as a site root. `http://` and `https://`
    /// prefixes select a remote root; anything else is a directory.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            // Url::join drops the last segment unless the base ends in `/`.
            let with_slash = if raw.ends_with('/') {
                raw.to_string()
            } else {
                format!("{raw}/")
            };
            let url = Url::parse(&with_slash).map_err(|e| FetchError::Location {
                location: raw.to_string(),
                reason: e.to_string(),
            })?;
            Ok(SiteRoot::Remote(url))
        } else {
            Ok(SiteRoot::Local(PathBuf::from(raw)))
        }
    }
}

impl fmt::Display for SiteRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteRoot::Local(path) => write!(f, "{}", path.display()),
            SiteRoot::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Where a location resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    File(PathBuf),
    Web(Url),
}

/// The production [`Fetch`] implementation: local files and `http(s)`.
pub struct ContentFetcher {
    root: SiteRoot,
    agent: Agent,
}

impl ContentFetcher {
    pub fn new(root: SiteRoot, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { root, agent }
    }

    fn resolve(&self, location: &str) -> Result<Target, FetchError> {
        let invalid = |reason: String| FetchError::Location {
            location: location.to_string(),
            reason,
        };

        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Target::Web(url)),
                "file" => url
                    .to_file_path()
                    .map(Target::File)
                    .map_err(|()| invalid("not a local file path".into())),
                other => Err(invalid(format!("unsupported scheme `{other}`"))),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.root {
                SiteRoot::Local(dir) => Ok(Target::File(dir.join(location))),
                SiteRoot::Remote(base) => base
                    .join(location)
                    .map(Target::Web)
                    .map_err(|e| invalid(e.to_string())),
            },
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    fn get(&self, url: &Url) -> Result<String, FetchError> {
        let http_error = |e: ureq::Error| FetchError::Http {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.agent.get(url.as_str()).call().map_err(http_error)?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.into_body().read_to_string().map_err(http_error)
    }
}

impl Fetch for ContentFetcher {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let target = self.resolve(location)?;
        tracing::debug!(location, target = ?target, "Fetching");
        match target {
            Target::File(path) => {
                fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })
            }
            Target::Web(url) => self.get(&url),
        }
    }
}
