mod types;

pub use types::*;

use anyhow::{Context, Result};
use reelcast_common::Relay;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./reelcast.toml",
        "~/.config/reelcast/config.toml",
        "/etc/reelcast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.storage.ttl_secs == 0 {
        anyhow::bail!("storage.ttl_secs must be greater than 0");
    }

    if config.acquire.timeout_secs == 0 {
        anyhow::bail!("acquire.timeout_secs must be greater than 0");
    }

    if !config.storage.dir.exists() {
        tracing::warn!(
            "Storage directory does not exist yet and will be created: {:?}",
            config.storage.dir
        );
    }

    for address in &config.relays.addresses {
        address
            .parse::<Relay>()
            .with_context(|| format!("Invalid entry in relays.addresses: {address}"))?;
    }

    Ok(())
}
