use serde::{Deserialize, Deserializer, Serialize};

/// Response body as the provider spells it.
///
/// Missing or `null` fields fall back to their zero value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderRecord {
    #[serde(deserialize_with = "null_default")]
    pub ip: String,
    #[serde(deserialize_with = "null_default")]
    pub ip_decimal: i64,
    #[serde(deserialize_with = "null_default")]
    pub country: String,
    #[serde(deserialize_with = "null_default")]
    pub country_code: String,
    #[serde(deserialize_with = "null_default")]
    pub is_in_european_union: bool,
    #[serde(deserialize_with = "null_default")]
    pub region: String,
    #[serde(deserialize_with = "null_default")]
    pub region_code: String,
    #[serde(deserialize_with = "null_default")]
    pub city: String,
    #[serde(deserialize_with = "null_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_default")]
    pub asn: String,
    #[serde(deserialize_with = "null_default")]
    pub asn_org: String,
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Geolocation details in this service's output schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    pub ip: String,
    pub ip_decimal: i64,
    pub country: String,
    /// ISO 3166-1 alpha-2.
    pub country_iso: String,
    pub country_eu: bool,
    pub region_name: String,
    pub region_code: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
    pub asn: String,
    pub asn_org: String,
}

// All provider naming knowledge lives here.
impl From<ProviderRecord> for GeoRecord {
    fn from(p: ProviderRecord) -> Self {
        Self {
            ip: p.ip,
            ip_decimal: p.ip_decimal,
            country: p.country,
            country_iso: p.country_code,
            country_eu: p.is_in_european_union,
            region_name: p.region,
            region_code: p.region_code,
            city: p.city,
            latitude: p.latitude,
            longitude: p.longitude,
            time_zone: p.timezone,
            asn: p.asn,
            asn_org: p.asn_org,
        }
    }
}
