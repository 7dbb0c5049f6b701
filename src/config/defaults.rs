// src/config/defaults.rs
use crate::config::app::{Features, Keys, Rotation};
use crate::consts::DEFAULT_MAX_KEY_AGE_DAYS;

pub fn default_rotation() -> Rotation {
    Rotation {
        max_key_age_days: DEFAULT_MAX_KEY_AGE_DAYS,
    }
}

pub fn default_keys() -> Keys {
    Keys {
        keyfile: default_keyfile_path(),
    }
}

pub fn default_features() -> Features {
    Features {
        allow_legacy_decrypt: true,
    }
}

/// `<config dir>/field-vault/keys.json`, falling back to the working directory
pub fn default_keyfile_path() -> String {
    dirs::config_dir()
        .map(|dir| {
            dir.join("field-vault")
                .join("keys.json")
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|| "keys.json".to_string())
}
