use serde::Serialize;

/// Placeholder for product and version when the string has no `/`.
pub const UNKNOWN: &str = "Unknown";

/// Client identification split from the `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientIdentity {
    pub product: String,
    pub version: String,
    #[serde(rename = "raw_value")]
    pub raw: String,
}

/// Split `product/version[/...]` into its first two segments.
///
/// Content is not validated; either segment may be empty. Without a `/`
/// both fields are `"Unknown"`. `raw` is always the input verbatim.
pub fn parse(raw: &str) -> ClientIdentity {
    let mut parts = raw.split('/');
    let (product, version) = match (parts.next(), parts.next()) {
        (Some(product), Some(version)) => (product, version),
        _ => (UNKNOWN, UNKNOWN),
    };

    ClientIdentity {
        product: product.to_string(),
        version: version.to_string(),
        raw: raw.to_string(),
    }
}
