//! HTTP service that reports the caller's public IP address together with
//! geolocation details from an upstream provider and the parsed `User-Agent`.
//!
//! Per request: [`client_ip`] picks the address, [`geo`] looks it up,
//! [`user_agent`] splits the client string and [`handler`] merges both into
//! one JSON document.

pub mod app;
pub mod client_ip;
pub mod config;
pub mod geo;
pub mod handler;
pub mod server;
pub mod state;
pub mod user_agent;

#[cfg(test)]
mod testing;
