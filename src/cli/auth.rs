//
//  grafana-api-client
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands for the `gapi` CLI.
//!
//! Secrets (API keys or passwords) are stored in the system keyring under the
//! profile name; the profile's login, if any, goes to the config file.

use std::io::{self, BufRead};

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::GrafanaClient;
use crate::auth::{AuthMethod, Authentication, KeyringStore};
use crate::config::Config;
use crate::interactive::{
    is_interactive, prompt_confirm_with_default, prompt_input_with_default, prompt_password,
};

use super::client::effective_profile;
use super::{build_client, GlobalOptions};

/// Manage stored credentials.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store credentials for a profile
    Login(LoginArgs),

    /// Remove the stored secret of a profile
    Logout(LogoutArgs),

    /// Check that the active credentials are accepted
    Status,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read an API key from standard input (takes precedence over --user)
    #[arg(long)]
    pub with_token: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Also remove the profile from the configuration file
    #[arg(long)]
    pub forget: bool,
}

impl AuthCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global),
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status => status(global),
        }
    }
}

/// Verifies credentials against the server and stores them.
fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let writer = global.writer();
    let mut config = Config::load()?;
    let name = config.active_profile_name(global.profile.as_deref());

    if let Some(url) = &global.url {
        config.profile_mut(&name).set("url", url)?;
    } else if config.profile(&name).map_or(true, |p| p.url.is_none() && p.host.is_none())
        && is_interactive()
    {
        let url = prompt_input_with_default("Grafana URL:", "http://127.0.0.1:3000")?;
        config.profile_mut(&name).set("url", &url)?;
    }

    let keyring = KeyringStore::new();
    if !args.with_token && is_interactive() && matches!(keyring.get(&name), Ok(Some(_))) {
        let question = format!("Profile '{}' already has stored credentials. Replace them?", name);
        if !prompt_confirm_with_default(&question, false)? {
            return Ok(());
        }
    }

    let auth = if args.with_token {
        Authentication::api_key(read_token_from_stdin()?)
    } else if let Some(user) = &global.user {
        let password = match &global.password {
            Some(password) => password.clone(),
            None => prompt_password(&format!("Password for {}:", user))?,
        };
        Authentication::credentials(user, password)
    } else if let Some(token) = &global.token {
        Authentication::api_key(token)
    } else if is_interactive() {
        Authentication::api_key(prompt_password("API key or service account token:")?)
    } else {
        bail!("No credentials given. Use --with-token to read an API key from stdin, or --user");
    };

    let profile = effective_profile(&config, &name, global);
    let client = GrafanaClient::with_options(
        auth.clone(),
        profile.connection()?,
        profile.transport_options(),
    )?;
    let identity = verify(&client)?;

    let secret = match &auth {
        Authentication::ApiKey(token) => token,
        Authentication::Credentials { password, .. } => password,
        Authentication::Anonymous => bail!("No credentials given"),
    };
    keyring.store(&name, secret)?;

    record_login(&mut config, &name, &auth);
    config.save()?;

    writer.write_success(&format!(
        "Logged in to {} as {} (profile '{}')",
        client.connection().api_url(""),
        identity,
        name
    ));
    Ok(())
}

/// Deletes the stored secret of the active profile.
fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let name = config.active_profile_name(global.profile.as_deref());

    KeyringStore::new().delete(&name)?;
    if forget_login(&mut config, &name, args.forget) {
        config.save()?;
    }

    global.writer().write_success(&format!("Logged out of profile '{}'", name));
    Ok(())
}

/// Writes the non-secret half of `auth` to the profile and makes it the
/// default when none is set. An API key clears any earlier login.
fn record_login(config: &mut Config, name: &str, auth: &Authentication) {
    config.profile_mut(name).login = match auth {
        Authentication::Credentials { login, .. } => Some(login.clone()),
        Authentication::ApiKey(_) | Authentication::Anonymous => None,
    };
    if config.default_profile.is_none() {
        config.default_profile = Some(name.to_string());
    }
}

/// Drops the profile's login, or the whole profile with `forget`.
/// Returns whether the config changed.
fn forget_login(config: &mut Config, name: &str, forget: bool) -> bool {
    if forget {
        return config.remove_profile(name).is_some();
    }
    match config.profiles.get_mut(name) {
        Some(profile) => profile.login.take().is_some(),
        None => false,
    }
}

/// Calls the server with the resolved credentials and reports the result.
fn status(global: &GlobalOptions) -> Result<()> {
    let client = build_client(global)?;
    let response = client.path(status_endpoint(client.auth_method())).get(&())?;

    if global.json {
        return global.writer().write_value(&json!({
            "url": client.connection().api_url(""),
            "auth": client.auth_method().to_string(),
            "response": response,
        }));
    }

    println!("{}", client.connection().api_url(""));
    println!("  Authentication: {}", client.auth_method());
    println!("  Identity: {}", describe_identity(&response));
    Ok(())
}

/// `user` only exists for a signed-in user; API keys and anonymous access
/// act in an organization.
fn status_endpoint(method: AuthMethod) -> &'static str {
    match method {
        AuthMethod::LoginCredentials => "user",
        AuthMethod::ApiKey | AuthMethod::Anonymous => "org",
    }
}

fn verify(client: &GrafanaClient) -> Result<String> {
    let response = client.path(status_endpoint(client.auth_method())).get(&())?;
    Ok(describe_identity(&response))
}

/// Picks a human-readable name out of a `user` or `org` response.
fn describe_identity(response: &serde_json::Value) -> String {
    ["login", "name", "email"]
        .iter()
        .find_map(|key| response.get(*key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Reads a single line from stdin, trimmed.
fn read_token_from_stdin() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let token = line.trim().to_string();
    if token.is_empty() || token.contains(char::is_whitespace) {
        bail!("Invalid token format");
    }
    Ok(token)
}
