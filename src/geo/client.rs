use std::net::IpAddr;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::{GeoError, GeoRecord, ProviderRecord};

/// Provider client. One lookup is one GET to `<base_url>/<ip>`, with no
/// retries, no caching and no timeout beyond the transport defaults.
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: Client,
    base_url: Url,
}

impl GeoClient {
    pub fn new(base_url: &str) -> Result<Self, GeoError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(base_url, http)
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(base_url: &str, http: Client) -> Result<Self, GeoError> {
        let invalid = |reason: String| GeoError::Url {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".into()));
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Lookup URL for `ip`, appended as one escaped path segment.
    pub fn endpoint(&self, ip: &str) -> Result<Url, GeoError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GeoError::Url {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".into(),
            })?
            .pop_if_empty()
            .push(ip);
        Ok(url)
    }

    pub async fn lookup(&self, ip: &str) -> Result<GeoRecord, GeoError> {
        let url = self.endpoint(ip)?;
        debug!(url = %url, "querying geolocation provider");

        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(ip = %ip, status = %status, "geolocation provider returned non-success status");
        }

        let body = resp.bytes().await?;
        decode(&body)
    }
}

/// Decode a provider body and project it into a [`GeoRecord`].
pub fn decode(body: &[u8]) -> Result<GeoRecord, GeoError> {
    let provider: ProviderRecord = serde_json::from_slice(body)?;
    let record = GeoRecord::from(provider);
    if record.ip.parse::<IpAddr>().is_err() {
        return Err(GeoError::InvalidAddress(record.ip));
    }
    Ok(record)
}
