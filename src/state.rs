//! Shared application state handed to every connection task.
//!
//! Read-only after startup; requests own everything they create.

use crate::config::Config;
use crate::geo::GeoClient;

pub struct AppState {
    pub config: Config,
    /// Pooled provider client, reused by every lookup.
    pub geo: GeoClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, crate::geo::GeoError> {
        let geo = GeoClient::new(&config.provider_url)?;
        Ok(Self { config, geo })
    }
}
