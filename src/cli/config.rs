//
//  grafana-api-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Reads and edits the settings of the active profile (`--profile`, then the
//! configured default). The `default_profile` key is global and selects the
//! profile used when `--profile` is not given.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::config::{Config, PROFILE_KEYS};

use super::GlobalOptions;

/// Key of the global setting naming the default profile.
const DEFAULT_PROFILE_KEY: &str = "default_profile";

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset a configuration value
    Unset(GetArgs),

    /// List all profiles and their settings
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

impl ConfigCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args, global),
            ConfigSubcommand::Unset(args) => unset(args, global),
            ConfigSubcommand::List => list(global),
            ConfigSubcommand::Path => path(global),
        }
    }
}

fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let name = config.active_profile_name(global.profile.as_deref());
    let value = get_value(&config, &name, &args.key)?;

    if global.json {
        return global
            .writer()
            .write_value(&json!({"profile": name, "key": args.key, "value": value}));
    }
    if let Some(v) = value {
        println!("{}", v);
    }
    Ok(())
}

fn set(args: &SetArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let name = config.active_profile_name(global.profile.as_deref());
    set_value(&mut config, &name, &args.key, &args.value)?;
    config.save()?;

    global.writer().write_success(&format!(
        "Set {} = {} (profile '{}')",
        style(&args.key).cyan(),
        args.value,
        name
    ));
    Ok(())
}

fn unset(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let name = config.active_profile_name(global.profile.as_deref());
    unset_value(&mut config, &name, &args.key)?;
    config.save()?;

    global
        .writer()
        .write_success(&format!("Unset {} (profile '{}')", style(&args.key).cyan(), name));
    Ok(())
}

fn list(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;

    if global.json {
        return global.writer().write_value(&serde_json::to_value(&config)?);
    }

    if config.profiles.is_empty() {
        println!("No profiles configured.");
        println!("Run 'gapi auth login' or 'gapi config set url <URL>' to create one.");
        return Ok(());
    }

    let default = config.active_profile_name(None);
    for (name, profile) in &config.profiles {
        let marker = if *name == default { " (default)" } else { "" };
        println!("{}{}", style(name).cyan().bold(), marker);
        for key in PROFILE_KEYS {
            if let Some(value) = profile.get(key) {
                println!("  {}: {}", key, value);
            }
        }
    }
    Ok(())
}

fn path(global: &GlobalOptions) -> Result<()> {
    let path = Config::config_path()?;
    if global.json {
        return global.writer().write_value(&json!({"path": path.display().to_string()}));
    }
    println!("{}", path.display());
    Ok(())
}

fn get_value(config: &Config, profile: &str, key: &str) -> Result<Option<String>> {
    if key == DEFAULT_PROFILE_KEY {
        return Ok(config.default_profile.clone());
    }
    check_key(key)?;
    Ok(config.profile(profile).and_then(|p| p.get(key)))
}

fn set_value(config: &mut Config, profile: &str, key: &str, value: &str) -> Result<()> {
    if key == DEFAULT_PROFILE_KEY {
        config.default_profile = Some(value.to_string());
        return Ok(());
    }
    config.profile_mut(profile).set(key, value)
}

fn unset_value(config: &mut Config, profile: &str, key: &str) -> Result<()> {
    if key == DEFAULT_PROFILE_KEY {
        config.default_profile = None;
        return Ok(());
    }
    check_key(key)?;
    if let Some(p) = config.profiles.get_mut(profile) {
        p.unset(key);
    }
    Ok(())
}

fn check_key(key: &str) -> Result<()> {
    if !PROFILE_KEYS.contains(&key) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}, {}",
            key,
            DEFAULT_PROFILE_KEY,
            PROFILE_KEYS.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_values() {
        let mut config = Config::default();
        set_value(&mut config, "prod", "host", "grafana.example.com").unwrap();
        set_value(&mut config, "prod", "port", "3000").unwrap();

        assert_eq!(
            get_value(&config, "prod", "host").unwrap().as_deref(),
            Some("grafana.example.com")
        );
        assert_eq!(get_value(&config, "local", "host").unwrap(), None);

        unset_value(&mut config, "prod", "port").unwrap();
        assert_eq!(get_value(&config, "prod", "port").unwrap(), None);
    }

    #[test]
    fn test_default_profile_key() {
        let mut config = Config::default();
        set_value(&mut config, "ignored", DEFAULT_PROFILE_KEY, "prod").unwrap();
        assert_eq!(config.active_profile_name(None), "prod");
        assert!(config.profiles.is_empty());

        unset_value(&mut config, "ignored", DEFAULT_PROFILE_KEY).unwrap();
        assert_eq!(config.default_profile, None);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        assert!(get_value(&config, "default", "editor").is_err());
        assert!(unset_value(&mut config, "default", "editor").is_err());
        assert!(set_value(&mut config, "default", "editor", "vim").is_err());
    }
}
