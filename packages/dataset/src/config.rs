//! TOML dashboard configuration.
//!
//! Resolution order for the config file: an explicit path, then
//! `$COUNTY_HEALTH_CONFIG`, then `county_health.toml` in the working
//! directory, then built-in defaults.
//!
//! ```toml
//! data_dir = "data"
//!
//! [cluster_palette]
//! 3 = "#22aa88"
//!
//! [recommendations]
//! model = "llama-3.1-8b-instant"
//! cache_ttl_days = 7
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use county_health_color::Rgb;
use county_health_visual::ClusterPalette;
use serde::{Deserialize, Serialize};

use crate::{DatasetError, paths};

pub const CONFIG_ENV: &str = "COUNTY_HEALTH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "county_health.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: Option<PathBuf>,
    /// Cluster id to hex color. Keys are strings because TOML table keys
    /// always are.
    pub cluster_palette: BTreeMap<String, String>,
    pub recommendations: RecommendationSettings,
}

/// Settings for the external recommendation service. Anything left unset
/// falls back to the environment and then to the provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub cache_ttl_days: Option<u32>,
}

impl DashboardConfig {
    /// # Errors
    ///
    /// Returns [`DatasetError::Toml`] if the text is not a valid config.
    pub fn from_toml_str(text: &str) -> Result<Self, DatasetError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Read`] if the file cannot be read or
    /// [`DatasetError::Toml`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Finds and loads the config file, or returns the defaults when none
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file (argument or
    /// environment variable) is missing or malformed, or if the default
    /// file exists but is malformed.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, DatasetError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Self::load(Path::new(&path));
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            return Self::load(default);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Data directory: the command-line override, then
    /// `$COUNTY_HEALTH_DATA_DIR`, then the config's `data_dir`, then `data/`.
    #[must_use]
    pub fn data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli_override {
            return dir.to_path_buf();
        }
        if std::env::var_os(paths::DATA_DIR_ENV).is_some_and(|v| !v.is_empty()) {
            return paths::default_data_dir();
        }
        self.data_dir
            .clone()
            .unwrap_or_else(paths::default_data_dir)
    }

    /// The default cluster palette with this config's overrides applied.
    ///
    /// Entries with a non-numeric key or an unparseable color are skipped
    /// with a warning.
    #[must_use]
    pub fn palette(&self) -> ClusterPalette {
        let mut palette = ClusterPalette::default();
        for (key, color) in &self.cluster_palette {
            let Ok(id) = key.trim().parse::<u8>() else {
                log::warn!("Ignoring cluster_palette entry with non-numeric key '{key}'");
                continue;
            };
            if let Err(e) = Rgb::from_hex(color) {
                log::warn!("Ignoring cluster_palette entry {id}: {e}");
                continue;
            }
            palette.set(id, color.clone());
        }
        palette
    }
}
