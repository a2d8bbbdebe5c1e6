use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    client::{ClientSettings, DEFAULT_COUNTRY, ProximityFormat},
    model::{BoundingBox, Dataset, LngLat},
};

/// Environment variable that overrides the stored access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// access_token = "pk...."
/// country = "US"
/// proximity_format = "named"
///
/// [search_center]
/// lng = -73.99
/// lat = 40.73
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub access_token: Option<String>,
    /// An empty string disables the country filter.
    pub country: String,
    pub proximity_format: ProximityFormat,
    pub default_dataset: Option<String>,
    pub timeout_secs: Option<u64>,
    // Tables last so the TOML output stays valid.
    pub search_center: Option<LngLat>,
    pub search_bounds: Option<BoundingBox>,
    /// Token taken from the environment. Preferred over `access_token` and never saved.
    #[serde(skip)]
    pub env_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: None,
            country: DEFAULT_COUNTRY.to_string(),
            proximity_format: ProximityFormat::default(),
            default_dataset: None,
            timeout_secs: None,
            search_center: None,
            search_bounds: None,
            env_token: None,
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or an empty default if it
    /// doesn't exist yet. The token env var takes precedence over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_token(std::env::var(ACCESS_TOKEN_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "mapbox-geocoding", "geocode")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_env_token(&mut self, token: Option<String>) {
        self.env_token = token.filter(|t| !t.is_empty());
    }

    pub fn dataset(&self) -> &str {
        self.default_dataset.as_deref().unwrap_or(Dataset::Places.as_str())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            access_token: self.env_token.clone().or_else(|| self.access_token.clone()),
            search_center: self.search_center,
            search_bounds: self.search_bounds,
            country: Some(self.country.clone()).filter(|c| !c.is_empty()),
            proximity_format: self.proximity_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.dataset(), "mapbox.places");
        assert_eq!(cfg.client_settings(), ClientSettings::default());
    }

    #[test]
    fn save_and_load_through_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            access_token: Some("pk.abc".into()),
            search_center: Some(LngLat::new(-73.99, 40.73)),
            search_bounds: Some(BoundingBox::new(-74.3, 40.5, -73.7, 40.9)),
            proximity_format: ProximityFormat::Bare,
            default_dataset: Some(Dataset::PlacesPermanent.to_string()),
            timeout_secs: Some(10),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(loaded.dataset(), "mapbox.places-permanent");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "access_token = \"pk.only\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.access_token.as_deref(), Some("pk.only"));
        assert_eq!(cfg.country, "US");
        assert_eq!(cfg.proximity_format, ProximityFormat::Named);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "access_token = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn empty_country_disables_filter() {
        let cfg = Config {
            country: String::new(),
            ..Config::default()
        };
        assert_eq!(cfg.client_settings().country, None);
    }

    #[test]
    fn env_token_overrides_only_when_non_empty() {
        let mut cfg = Config {
            access_token: Some("from-file".into()),
            ..Config::default()
        };

        cfg.apply_env_token(Some(String::new()));
        assert_eq!(cfg.client_settings().access_token.as_deref(), Some("from-file"));

        cfg.apply_env_token(Some("from-env".into()));
        assert_eq!(cfg.client_settings().access_token.as_deref(), Some("from-env"));
        assert_eq!(cfg.access_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn env_token_is_not_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "access_token = \"pk.stored\"\n").unwrap();

        let mut cfg = Config::load_from(&path).unwrap();
        cfg.apply_env_token(Some("pk.secret-from-env".into()));
        cfg.save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("pk.secret-from-env"));
        assert!(contents.contains("pk.stored"));

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.env_token, None);
        assert_eq!(reloaded.access_token.as_deref(), Some("pk.stored"));
    }

    #[test]
    fn env_token_without_stored_token_leaves_file_empty_of_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::load_from(&path).unwrap();
        cfg.apply_env_token(Some("pk.secret-from-env".into()));
        assert_eq!(cfg.client_settings().access_token.as_deref(), Some("pk.secret-from-env"));
        cfg.save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("access_token"));
    }
}
