//! Endpoint selection
//!
//! A client served by the bridge's web host talks to the bridge on the same
//! host. One opened from a local file has no host to borrow and falls back
//! to the configured local address.

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Where the client was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOrigin {
    /// Opened from the local filesystem
    File,
    /// Served from a network host
    Network { hostname: String },
}

impl PageOrigin {
    /// Classify a location such as `file:///tmp/client.html` or
    /// `http://example.org:8080/client/`
    pub fn from_location(location: &str) -> Result<Self> {
        let url = Url::parse(location).map_err(|e| Error::InvalidEndpoint {
            reason: format!("'{}' is not a valid location: {}", location, e),
        })?;

        if url.scheme() == "file" {
            return Ok(PageOrigin::File);
        }

        // IPv6 literals come back bracketed, ready for the endpoint URL
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(PageOrigin::Network {
                hostname: host.to_string(),
            }),
            _ => Err(Error::InvalidEndpoint {
                reason: format!("'{}' has no host", location),
            }),
        }
    }
}

/// The session endpoint URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
}

impl Endpoint {
    /// Pick the endpoint for a client loaded from `origin`
    pub fn for_origin(origin: &PageOrigin, config: &TransportConfig) -> Self {
        let host = match origin {
            PageOrigin::File => config.local_host.as_str(),
            PageOrigin::Network { hostname } => hostname.as_str(),
        };
        Self {
            url: format!("{}://{}:{}", config.scheme, host, config.port),
        }
    }

    /// Use an explicit URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
