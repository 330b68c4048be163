//
//  grafana-api-client
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Secure secret storage using the system keyring
//!
//! The `gapi` CLI keeps one secret per profile: the API key for token
//! profiles, or the password for profiles with a configured login. Secrets
//! never touch the configuration file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grafana_api_client::auth::KeyringStore;
//!
//! fn manage_secrets() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!
//!     store.store("prod", "eyJrIjoiT0tTcG1p...")?;
//!
//!     if let Some(secret) = store.get("prod")? {
//!         println!("Found stored secret ({} chars)", secret.len());
//!     }
//!
//!     store.delete("prod")?;
//!     Ok(())
//! }
//! ```
//!
//! On Linux a secret service daemon (GNOME Keyring, KWallet) must be running.

use anyhow::Result;
use keyring::Entry;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "grafana-api-client";

/// Secret storage backed by the platform keyring (Keychain on macOS, Secret
/// Service on Linux, Credential Manager on Windows).
///
/// Entries are keyed by profile name.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store using the application's service name.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores (or overwrites) the secret for a profile.
    pub fn store(&self, profile: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, profile)?;
        entry.set_password(secret)?;
        Ok(())
    }

    /// Returns the secret for a profile, or `None` if nothing is stored.
    pub fn get(&self, profile: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, profile)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the secret for a profile. Deleting a missing entry succeeds.
    pub fn delete(&self, profile: &str) -> Result<()> {
        let entry = Entry::new(&self.service, profile)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
