//
//  grafana-api-client
//  cli/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Client resolution for commands that talk to a server.
//!
//! Settings are layered: command-line flags (and their environment
//! variables) win over the active profile, which wins over the built-in
//! defaults. Secrets come from flags first, then from the keyring.

use anyhow::{bail, Result};

use crate::api::GrafanaClient;
use crate::auth::{Authentication, KeyringStore};
use crate::config::{Config, ProfileConfig};
use crate::interactive::{is_interactive, prompt_password};

use super::GlobalOptions;

/// Builds a client for the active profile with the global overrides applied.
pub fn build_client(global: &GlobalOptions) -> Result<GrafanaClient> {
    let config = Config::load()?;
    let name = config.active_profile_name(global.profile.as_deref());
    let profile = effective_profile(&config, &name, global);

    let auth = resolve_authentication(global, &profile, || stored_secret(&name))?;
    tracing::debug!(profile = %name, auth = %auth.method(), "resolved client");

    Ok(GrafanaClient::with_options(
        auth,
        profile.connection()?,
        profile.transport_options(),
    )?)
}

/// Returns the named profile with `--url`, `--timeout` and `--insecure`
/// applied on top.
pub(crate) fn effective_profile(
    config: &Config,
    name: &str,
    global: &GlobalOptions,
) -> ProfileConfig {
    let mut profile = config.profile(name).cloned().unwrap_or_default();
    if let Some(url) = &global.url {
        profile.url = Some(url.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = true;
    }
    profile
}

/// Picks the authentication for a request.
///
/// In order:
///
/// 1. `--token` → API key
/// 2. `--user` → basic auth with `--password`, the stored secret, or a prompt
/// 3. profile `login` with `--password` or the stored secret → basic auth
/// 4. stored secret alone → API key
/// 5. anonymous
///
/// `secret` is only consulted when the flags do not already decide.
pub fn resolve_authentication<F>(
    global: &GlobalOptions,
    profile: &ProfileConfig,
    secret: F,
) -> Result<Authentication>
where
    F: FnOnce() -> Option<String>,
{
    if let Some(token) = &global.token {
        return Ok(Authentication::api_key(token));
    }

    if let Some(user) = &global.user {
        let password = match &global.password {
            Some(password) => password.clone(),
            None => match secret() {
                Some(password) => password,
                None if is_interactive() => prompt_password(&format!("Password for {}:", user))?,
                None => bail!(
                    "No password for '{}'. Pass --password or set GRAFANA_PASSWORD",
                    user
                ),
            },
        };
        return Ok(Authentication::credentials(user, password));
    }

    if let Some(login) = profile.login.as_deref() {
        return Ok(match global.password.clone().or_else(secret) {
            Some(password) => Authentication::credentials(login, password),
            None => Authentication::Anonymous,
        });
    }

    Ok(match secret() {
        Some(token) => Authentication::api_key(token),
        None => Authentication::Anonymous,
    })
}

/// Reads the profile's secret, treating an unusable keyring as empty.
fn stored_secret(profile: &str) -> Option<String> {
    match KeyringStore::new().get(profile) {
        Ok(secret) => secret,
        Err(e) => {
            tracing::warn!("keyring unavailable, continuing without stored secret: {:#}", e);
            None
        }
    }
}
