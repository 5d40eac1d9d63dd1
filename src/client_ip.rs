//! Best-effort resolution of the originating client address.
//!
//! `X-Forwarded-For` and `X-Real-IP` are supplied by whoever sent the request
//! and can be forged by any client that reaches the listener directly. The
//! result is fit for display and geolocation only; never use it as an
//! authentication or authorization signal. The lookup order assumes at most
//! one reverse proxy in front of the service and applies no per-hop trust.

use std::borrow::Cow;
use std::fmt;
use std::net::IpAddr;

use hyper::HeaderMap;

/// Proxy chain header, `client, proxy1, proxy2`.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
/// Single-address header set by a reverse proxy.
pub const X_REAL_IP: &str = "x-real-ip";
/// Returned when no source yields a valid address.
pub const UNKNOWN: &str = "Unknown";

/// Where a resolved address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrSource {
    ForwardedFor,
    RealIp,
    Peer,
    None,
}

impl fmt::Display for AddrSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ForwardedFor => "x-forwarded-for",
            Self::RealIp => "x-real-ip",
            Self::Peer => "peer",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Resolve the client address, returning `"Unknown"` when nothing usable exists.
///
/// `remote_addr` is the transport peer in `host:port` form.
pub fn resolve(headers: &HeaderMap, remote_addr: &str) -> String {
    resolve_with_source(headers, remote_addr).0
}

/// Like [`resolve`], also reporting which source produced the address.
///
/// Priority, first match wins:
/// 1. first entry of `X-Forwarded-For` that parses as an IP (malformed entries are skipped)
/// 2. `X-Real-IP` if it parses as an IP
/// 3. host part of `remote_addr`
pub fn resolve_with_source(headers: &HeaderMap, remote_addr: &str) -> (String, AddrSource) {
    if let Some(chain) = header_str(headers, X_FORWARDED_FOR) {
        if let Some(ip) = first_valid_in_chain(&chain) {
            return (ip.to_string(), AddrSource::ForwardedFor);
        }
    }

    if let Some(ip) = header_str(headers, X_REAL_IP).filter(|v| is_ip(v)) {
        return (ip.into_owned(), AddrSource::RealIp);
    }

    if let Some(host) = split_host(remote_addr).filter(|h| is_ip(h)) {
        return (host.to_string(), AddrSource::Peer);
    }

    (UNKNOWN.to_string(), AddrSource::None)
}

/// Header value as text. Bytes outside ASCII are decoded lossily so a stray
/// non-ASCII entry only spoils itself, not the whole list.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<Cow<'a, str>> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .filter(|v| !v.is_empty())
}

fn first_valid_in_chain(value: &str) -> Option<&str> {
    value.split(',').map(str::trim).find(|candidate| is_ip(candidate))
}

fn is_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Strip the port from `host:port` or `[v6]:port`.
///
/// A bare host without a port is rejected.
fn split_host(addr: &str) -> Option<&str> {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.rsplit_once("]:").map(|(host, _)| host);
    }
    match addr.rsplit_once(':') {
        Some((host, _)) if !host.contains(':') => Some(host),
        _ => None,
    }
}
