use std::net::IpAddr;
use std::path::Path;

use clap::Parser;
use serde::Deserialize;

/// Reports the caller's public IP address with geolocation and user agent details.
///
/// Every request resolves the client address from proxy headers or the
/// TCP peer, looks it up at the geolocation provider and answers with JSON.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind the listener to
    #[arg(long, env = "IPGEO_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Geolocation provider base URL; lookups go to `<provider-url>/<ip>`
    #[arg(
        long,
        env = "IPGEO_PROVIDER_URL",
        default_value = "https://ipwhois.app/json"
    )]
    pub provider_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "IPGEO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "IPGEO_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

// ---------------------------------------------------------------------------
// TOML config file support
// ---------------------------------------------------------------------------

/// Optional on-disk configuration. Only populated values are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub port: Option<u16>,
    pub bind: Option<IpAddr>,
    pub provider_url: Option<String>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

impl ConfigFile {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment assignments for every populated field, keyed by the
    /// variable clap reads for it.
    pub fn env_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        macro_rules! push {
            ($env:expr, $val:expr) => {
                if let Some(ref v) = $val {
                    pairs.push(($env, v.to_string()));
                }
            };
        }
        push!("PORT", self.port);
        push!("IPGEO_BIND", self.bind);
        push!("IPGEO_PROVIDER_URL", self.provider_url);
        push!("IPGEO_LOG_LEVEL", self.log_level);
        push!("IPGEO_LOG_JSON", self.log_json);
        pairs
    }

    /// Inject values as environment variables so clap picks them up.
    ///
    /// Only sets variables that are **not** already present in the
    /// environment, preserving the precedence: CLI > env > config file.
    pub fn inject_env(&self) {
        for (key, value) in self.env_pairs() {
            if std::env::var_os(key).is_none() {
                std::env::set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let config = Config::try_parse_from([
            "ipgeo",
            "--port",
            "9090",
            "--provider-url",
            "http://127.0.0.1:1/geo",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.provider_url, "http://127.0.0.1:1/geo");
    }

    #[test]
    fn test_config_file_env_pairs() {
        let file = ConfigFile::parse("port = 3000\nlog_json = true\n").unwrap();
        let pairs = file.env_pairs();
        assert_eq!(
            pairs,
            vec![
                ("PORT", "3000".to_string()),
                ("IPGEO_LOG_JSON", "true".to_string())
            ]
        );
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() {
        assert!(ConfigFile::parse("hmac_key = \"x\"\n").is_err());
    }
}
