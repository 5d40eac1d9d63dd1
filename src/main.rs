use std::path::Path;

use clap::Parser;

use ipgeo::app;
use ipgeo::config::{Config, ConfigFile};

/// Default config file name.
const DEFAULT_CONFIG: &str = "ipgeo.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Config file values act as env-var defaults (before clap)
    let config_file_path =
        std::env::var("IPGEO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let path = Path::new(&config_file_path);
    if path.exists() {
        match ConfigFile::load(path) {
            Ok(file_cfg) => file_cfg.inject_env(),
            Err(e) => eprintln!("ignoring config file {}: {:#}", path.display(), e),
        }
    }

    let config = Config::parse();
    app::run(config).await
}
