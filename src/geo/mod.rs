//! Geolocation lookup against the upstream provider.

mod client;
mod record;

pub use client::{decode, GeoClient};
pub use record::{GeoRecord, ProviderRecord};

/// Failures of a single lookup. Each one is terminal for its request.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("invalid provider URL {url}: {reason}")]
    Url { url: String, reason: String },

    #[error("geolocation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed geolocation response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("geolocation response has no valid IP address (got {0:?})")]
    InvalidAddress(String),
}
