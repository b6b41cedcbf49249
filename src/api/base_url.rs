//! API base URL resolution from the page origin.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Url;

/// Origin used when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Path prefix every API call lives under.
pub const API_PREFIX: &str = "/api";

/// Port the API server listens on during local development.
pub const LOCAL_FALLBACK_PORT: u16 = 5000;

/// Resolves the API base URL for a page origin.
///
/// Scheme and host come from the origin. A loopback or local host without an
/// explicit port gets [`LOCAL_FALLBACK_PORT`]. Path, query and fragment of the
/// origin are replaced by [`API_PREFIX`].
pub fn resolve_base_url(origin: &str) -> Result<Url> {
    let mut url =
        Url::parse(origin.trim()).with_context(|| format!("Invalid origin URL '{}'", origin))?;

    let host = url
        .host_str()
        .with_context(|| format!("Origin '{}' has no host", origin))?
        .to_string();

    if is_local_host(&host) && url.port().is_none() {
        url.set_port(Some(LOCAL_FALLBACK_PORT))
            .map_err(|_| anyhow::anyhow!("Cannot set a port on origin '{}'", origin))?;
    }

    url.set_path(API_PREFIX);
    url.set_query(None);
    url.set_fragment(None);

    debug!("Resolved API base URL {} from origin {}", url, origin);
    Ok(url)
}

/// Returns true for loopback and unspecified local addresses.
pub fn is_local_host(host: &str) -> bool {
    matches!(
        host.trim_start_matches('[').trim_end_matches(']'),
        "localhost" | "127.0.0.1" | "::1" | "0.0.0.0"
    )
}
