//
//  grafana-api-client
//  config/profile.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Profile Configuration
//!
//! A profile describes one Grafana server: where it is, which login to use,
//! and how the HTTP transport should behave. Secrets (API keys, passwords)
//! are never part of a profile; they live in the keyring.
//!
//! ## Example
//!
//! ```rust
//! use grafana_api_client::config::ProfileConfig;
//!
//! let mut profile = ProfileConfig::default();
//! profile.set("url", "https://grafana.example.com/grafana")?;
//! profile.set("timeout", "10")?;
//!
//! let connection = profile.connection()?;
//! assert_eq!(connection.api_url("org"), "https://grafana.example.com/grafana/api/org");
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::api::{ConnectionConfig, Protocol, TransportOptions, DEFAULT_HOST};

/// Header used by Grafana to select the organization of a request.
pub const ORG_ID_HEADER: &str = "x-grafana-org-id";

/// Keys accepted by [`ProfileConfig::get`], [`ProfileConfig::set`] and
/// [`ProfileConfig::unset`].
pub const PROFILE_KEYS: &[&str] = &[
    "url",
    "protocol",
    "host",
    "port",
    "url_path_prefix",
    "login",
    "org_id",
    "timeout",
    "connect_timeout",
    "insecure",
    "proxy",
];

/// Settings for one Grafana server.
///
/// `url`, when set, takes precedence over `protocol`/`host`/`port`/
/// `url_path_prefix`.
///
/// | Field | Default |
/// |-------|---------|
/// | `protocol` | `http` |
/// | `host` | `127.0.0.1` |
/// | `port` | none |
/// | `url_path_prefix` | empty |
/// | `timeout` | reqwest default (30 s) |
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Base URL of the server, e.g. `https://grafana.example.com:3000/grafana`.
    #[serde(default)]
    pub url: Option<String>,

    /// URL scheme, used when `url` is not set.
    #[serde(default)]
    pub protocol: Option<Protocol>,

    /// Hostname, used when `url` is not set.
    #[serde(default)]
    pub host: Option<String>,

    /// Port, used when `url` is not set.
    #[serde(default)]
    pub port: Option<u16>,

    /// Path prefix, used when `url` is not set.
    #[serde(default)]
    pub url_path_prefix: Option<String>,

    /// Login for HTTP Basic authentication. When absent, the profile's
    /// stored secret is used as an API key.
    #[serde(default)]
    pub login: Option<String>,

    /// Organization to act in, sent as `X-Grafana-Org-Id`.
    #[serde(default)]
    pub org_id: Option<u64>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds.
    #[serde(default)]
    pub connect_timeout: Option<u64>,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Proxy URL for all requests.
    #[serde(default)]
    pub proxy: Option<String>,
}

impl ProfileConfig {
    /// Creates a profile pointing at a base URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Resolves the connection settings of this profile.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is set but cannot be parsed.
    pub fn connection(&self) -> Result<ConnectionConfig> {
        if let Some(url) = &self.url {
            return ConnectionConfig::from_url(url)
                .with_context(|| format!("Invalid server URL '{}'", url));
        }

        let mut connection = ConnectionConfig::new(self.host.as_deref().unwrap_or(DEFAULT_HOST))
            .with_protocol(self.protocol.unwrap_or_default())
            .with_url_path_prefix(self.url_path_prefix.as_deref().unwrap_or(""));
        if let Some(port) = self.port {
            connection = connection.with_port(port);
        }
        Ok(connection)
    }

    /// Builds the transport options of this profile.
    pub fn transport_options(&self) -> TransportOptions {
        let mut options = TransportOptions {
            timeout: self.timeout.map(Duration::from_secs),
            connect_timeout: self.connect_timeout.map(Duration::from_secs),
            accept_invalid_certs: self.insecure,
            proxy: self.proxy.clone(),
            ..Default::default()
        };

        if let Some(org_id) = self.org_id {
            options.headers.insert(
                HeaderName::from_static(ORG_ID_HEADER),
                HeaderValue::from(org_id),
            );
        }

        options
    }

    /// Returns a setting by key, rendered as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "url" => self.url.clone(),
            "protocol" => self.protocol.map(|p| p.to_string()),
            "host" => self.host.clone(),
            "port" => self.port.map(|p| p.to_string()),
            "url_path_prefix" => self.url_path_prefix.clone(),
            "login" => self.login.clone(),
            "org_id" => self.org_id.map(|id| id.to_string()),
            "timeout" => self.timeout.map(|t| t.to_string()),
            "connect_timeout" => self.connect_timeout.map(|t| t.to_string()),
            "insecure" => Some(self.insecure.to_string()),
            "proxy" => self.proxy.clone(),
            _ => None,
        }
    }

    /// Sets a setting by key, validating the value.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys and for values that do not parse
    /// (e.g. a non-numeric port).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => {
                ConnectionConfig::from_url(value)
                    .with_context(|| format!("Invalid server URL '{}'", value))?;
                self.url = Some(value.to_string());
            }
            "protocol" => self.protocol = Some(value.parse::<Protocol>()?),
            "host" => self.host = Some(value.to_string()),
            "port" => self.port = Some(parse_number(key, value)?),
            "url_path_prefix" => self.url_path_prefix = Some(value.to_string()),
            "login" => self.login = Some(value.to_string()),
            "org_id" => self.org_id = Some(parse_number(key, value)?),
            "timeout" => self.timeout = Some(parse_number(key, value)?),
            "connect_timeout" => self.connect_timeout = Some(parse_number(key, value)?),
            "insecure" => {
                self.insecure = match value {
                    "true" | "yes" | "1" => true,
                    "false" | "no" | "0" => false,
                    _ => bail!("Invalid value for insecure. Valid values: true, false"),
                }
            }
            "proxy" => self.proxy = Some(value.to_string()),
            _ => bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key,
                PROFILE_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Clears a setting. Returns `false` for unknown keys.
    pub fn unset(&mut self, key: &str) -> bool {
        match key {
            "url" => self.url = None,
            "protocol" => self.protocol = None,
            "host" => self.host = None,
            "port" => self.port = None,
            "url_path_prefix" => self.url_path_prefix = None,
            "login" => self.login = None,
            "org_id" => self.org_id = None,
            "timeout" => self.timeout = None,
            "connect_timeout" => self.connect_timeout = None,
            "insecure" => self.insecure = false,
            "proxy" => self.proxy = None,
            _ => return false,
        }
        true
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: '{}' is not a number", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_connection() {
        let connection = ProfileConfig::default().connection().unwrap();
        assert_eq!(connection.api_url("org"), "http://127.0.0.1/api/org");
    }

    #[test]
    fn test_split_fields_connection() {
        let profile = ProfileConfig {
            protocol: Some(Protocol::Https),
            host: Some("a".to_string()),
            port: Some(1000),
            url_path_prefix: Some("b".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.connection().unwrap().api_url("c"), "https://a:1000/b/api/c");
    }

    #[test]
    fn test_url_wins_over_split_fields() {
        let profile = ProfileConfig {
            url: Some("https://grafana.example.com".to_string()),
            host: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(
            profile.connection().unwrap().api_url("health"),
            "https://grafana.example.com/api/health"
        );
    }

    #[test]
    fn test_transport_options() {
        let profile = ProfileConfig {
            timeout: Some(10),
            insecure: true,
            org_id: Some(3),
            ..Default::default()
        };
        let options = profile.transport_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(10)));
        assert!(options.accept_invalid_certs);
        assert_eq!(options.headers[ORG_ID_HEADER], "3");
    }

    #[test]
    fn test_set_get_unset() {
        let mut profile = ProfileConfig::default();
        profile.set("port", "3000").unwrap();
        profile.set("protocol", "https").unwrap();
        profile.set("insecure", "yes").unwrap();

        assert_eq!(profile.get("port"), Some("3000".to_string()));
        assert_eq!(profile.get("protocol"), Some("https".to_string()));
        assert_eq!(profile.get("insecure"), Some("true".to_string()));

        assert!(profile.unset("port"));
        assert_eq!(profile.get("port"), None);
        assert!(!profile.unset("color"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut profile = ProfileConfig::default();
        assert!(profile.set("port", "eighty").is_err());
        assert!(profile.set("protocol", "ftp").is_err());
        assert!(profile.set("url", "grafana.example.com").is_err());
        assert!(profile.set("color", "blue").is_err());
        assert_eq!(profile, ProfileConfig::default());
    }

    #[test]
    fn test_every_key_is_gettable() {
        let mut profile = ProfileConfig::default();
        for key in PROFILE_KEYS {
            let value = match *key {
                "url" => "http://localhost:3000",
                "protocol" => "http",
                "insecure" => "true",
                "port" | "org_id" | "timeout" | "connect_timeout" => "5",
                _ => "value",
            };
            profile.set(key, value).unwrap();
            assert!(profile.get(key).is_some(), "key {}", key);
        }
    }
}
