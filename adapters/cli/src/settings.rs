use std::{
    fs, io,
    path::{Path, PathBuf},
};

use asylum_assets::AssetManifest;
use asylum_core::Tuning;
use serde::{Deserialize, Serialize};

/// Settings file layout; every section falls back to its defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Gameplay constants.
    pub tuning: Tuning,
    /// Paths of every logical asset below the asset root.
    pub assets: AssetManifest,
}

impl Settings {
    /// Loads settings from `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parses and validates settings from TOML text.
    pub(crate) fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.tuning.weapons.is_empty() {
            return Err(SettingsError::NoWeapons);
        }
        if self.tuning.player.max_health == 0 {
            return Err(SettingsError::ZeroHealth);
        }
        if let Some(weapon) = self.tuning.weapons.iter().find(|weapon| weapon.capacity == 0) {
            return Err(SettingsError::EmptyMagazine(weapon.name.clone()));
        }
        Ok(())
    }
}

/// Errors raised while loading the settings file.
#[derive(thiserror::Error, Debug)]
pub(crate) enum SettingsError {
    /// The file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for the settings layout.
    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// The weapon catalog was overridden with an empty list.
    #[error("at least one weapon must be configured")]
    NoWeapons,
    /// The player would start the run dead.
    #[error("player max_health must be positive")]
    ZeroHealth,
    /// A weapon could never fire.
    #[error("weapon {0} has a magazine capacity of zero")]
    EmptyMagazine(String),
}
