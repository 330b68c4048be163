//
//  grafana-api-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module manages the `gapi` configuration file: a set of named profiles,
//! each describing one Grafana server, plus the profile used by default.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/gapi/config.toml`
//! - **macOS**: `~/Library/Application Support/gapi/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\gapi\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! default_profile = "local"
//!
//! [profiles.local]
//! url = "http://127.0.0.1:3000"
//! login = "admin"
//!
//! [profiles.prod]
//! protocol = "https"
//! host = "grafana.example.com"
//! url_path_prefix = "grafana"
//! timeout = 30
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O
//! - [`profile`]: Per-server settings

mod file;
mod profile;

pub use file::*;
pub use profile::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Name of the profile used when none is selected or configured.
pub const DEFAULT_PROFILE: &str = "default";

/// The complete configuration state.
///
/// # Example
///
/// ```rust
/// use grafana_api_client::config::{Config, ProfileConfig};
///
/// let mut config = Config::default();
/// config.profiles.insert("local".to_string(), ProfileConfig::from_url("http://127.0.0.1:3000"));
/// config.default_profile = Some("local".to_string());
///
/// assert_eq!(config.active_profile_name(None), "local");
/// assert_eq!(config.active_profile_name(Some("prod")), "prod");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Profiles by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; the default configuration is returned.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, or the default configuration if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not valid
    /// TOML for this schema.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the name of the profile to use: the explicit choice, then the
    /// configured default, then [`DEFAULT_PROFILE`].
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
            .to_string()
    }

    /// Returns the settings of a profile.
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }

    /// Returns the settings of a profile, creating an empty one if needed.
    pub fn profile_mut(&mut self, name: &str) -> &mut ProfileConfig {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Removes a profile. Clears `default_profile` if it pointed at it.
    pub fn remove_profile(&mut self, name: &str) -> Option<ProfileConfig> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Protocol;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gapi").join("config.toml");

        let mut config = Config::default();
        config.default_profile = Some("prod".to_string());
        let prod = config.profile_mut("prod");
        prod.protocol = Some(Protocol::Https);
        prod.host = Some("grafana.example.com".to_string());
        prod.login = Some("admin".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_documented_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "local"

[profiles.local]
url = "http://127.0.0.1:3000"
login = "admin"

[profiles.prod]
protocol = "https"
host = "grafana.example.com"
url_path_prefix = "grafana"
timeout = 30
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.active_profile_name(None), "local");

        let prod = config.profile("prod").unwrap();
        assert_eq!(
            prod.connection().unwrap().api_url("org"),
            "https://grafana.example.com/grafana/api/org"
        );
        assert_eq!(prod.timeout, Some(30));
        assert_eq!(config.profile("local").unwrap().login.as_deref(), Some("admin"));
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "profiles = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_active_profile_fallback() {
        assert_eq!(Config::default().active_profile_name(None), DEFAULT_PROFILE);
    }

    #[test]
    fn test_remove_default_profile() {
        let mut config = Config::default();
        config.profile_mut("local");
        config.default_profile = Some("local".to_string());

        assert!(config.remove_profile("local").is_some());
        assert!(config.default_profile.is_none());
        assert!(config.remove_profile("local").is_none());
    }
}
