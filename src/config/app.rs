// src/config/app.rs
use once_cell::sync::OnceCell;
use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rotation: Rotation,
    pub keys: Keys,
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rotation {
    pub max_key_age_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Keys {
    pub keyfile: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Features {
    pub allow_legacy_decrypt: bool,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var("FV_CONFIG").unwrap_or_else(|_| "field-vault.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content =
                std::fs::read_to_string(&config_path).expect("failed to read field-vault config");
            toml::from_str(&content).expect("invalid TOML in field-vault config")
        } else {
            tracing::debug!(path = %config_path, "config file not found, using built-in defaults");
            Config {
                rotation: default_rotation(),
                keys: default_keys(),
                features: default_features(),
            }
        }
    })
}
