//
//  grafana-api-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod auth;
mod client;
mod completion;
mod config;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use client::{build_client, resolve_authentication};
pub use completion::CompletionCommand;
pub use config::ConfigCommand;

use clap::{Parser, Subcommand};

use crate::output::{OutputFormat, OutputWriter};

/// gapi - Talk to the Grafana HTTP API from the command line
#[derive(Parser, Debug)]
#[command(
    name = "gapi",
    version,
    about = "Talk to the Grafana HTTP API from the command line",
    long_about = "gapi sends requests to a Grafana server's HTTP API.\n\n\
                  Servers are described by named profiles; secrets live in the system keyring.",
    propagate_version = true,
    after_help = "Use 'gapi <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configuration profile to use
    #[arg(long, short = 'p', global = true, env = "GAPI_PROFILE")]
    pub profile: Option<String>,

    /// Grafana base URL (e.g. https://grafana.example.com/grafana)
    #[arg(long, global = true, env = "GRAFANA_URL")]
    pub url: Option<String>,

    /// API key or service account token
    #[arg(long, global = true, env = "GRAFANA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Login for basic authentication
    #[arg(long, short = 'u', global = true, env = "GRAFANA_USER")]
    pub user: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true, env = "GRAFANA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Print compact JSON instead of indented JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Returns the output writer selected by `--json`.
    pub fn writer(&self) -> OutputWriter {
        let format = if self.json {
            OutputFormat::Compact
        } else {
            OutputFormat::Pretty
        };
        OutputWriter::new(format)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make an API request
    Api(ApiCommand),

    /// Manage stored credentials
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}
