//
//  grafana-api-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Grafana API Client Library
//!
//! A thin, blocking client for the Grafana HTTP API, plus the `gapi`
//! command-line tool built on it.
//!
//! ## Overview
//!
//! Requests are described by chaining path segments onto a client and
//! finishing the chain with an HTTP verb. Nothing about Grafana's endpoints is
//! hard-coded: any path under `/api/` can be addressed.
//!
//! ## Features
//!
//! - **Fluent paths**: `client.path("dashboards").path("uid").at(uid).get(&())`
//! - **Three authentication modes**: anonymous, API key (bearer), login/password (basic)
//! - **Typed errors**: every 4xx/5xx status maps to one [`GrafanaError`](api::GrafanaError) variant
//! - **Pluggable transport**: the HTTP layer sits behind the [`Transport`](api::Transport) trait
//! - **Profiles**: the CLI reads server settings from a TOML file and secrets from the keyring
//!
//! ## Module Structure
//!
//! - [`api`]: Client, request builder, transport and errors
//! - [`auth`]: Authentication strategies and keyring storage
//! - [`config`]: Configuration file management
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: JSON output formatting
//! - [`interactive`]: Interactive prompts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use grafana_api_client::{Authentication, GrafanaClient};
//! use grafana_api_client::api::ConnectionConfig;
//! use serde_json::json;
//!
//! let connection = ConnectionConfig::new("localhost").with_port(3000);
//! let client = GrafanaClient::new(Authentication::credentials("admin", "admin"), connection)?;
//!
//! // GET /api/search?query=production
//! let dashboards = client.path("search").get(&json!({"query": "production"}))?;
//!
//! // POST /api/folders
//! client.path("folders").create(&json!({"title": "Team A"}))?;
//! # Ok::<(), grafana_api_client::api::GrafanaError>(())
//! ```

/// HTTP client for the Grafana API.
///
/// Contains the connection settings, the deferred request builder, the
/// transport abstraction and the error taxonomy.
pub mod api;

/// Authentication strategies and secure secret storage.
pub mod auth;

/// Configuration file management.
///
/// Handles loading and saving named server profiles in TOML format.
pub mod config;

/// Command-line interface definitions.
///
/// Contains the `gapi` commands, arguments, and subcommands defined using the
/// clap derive API.
pub mod cli;

/// Output formatting for the CLI.
pub mod output;

/// Interactive terminal prompts.
pub mod interactive;

/// Re-export of the main CLI struct for convenient access.
pub use cli::Cli;

/// Re-export of the API client.
pub use api::GrafanaClient;

/// Re-export of the authentication strategy.
pub use auth::Authentication;

/// Re-export of the configuration struct.
///
/// # Example
///
/// ```rust,no_run
/// use grafana_api_client::Config;
///
/// let config = Config::load().expect("Failed to load config");
/// println!("Active profile: {}", config.active_profile_name(None));
/// ```
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
///
/// # Value
///
/// `"gapi"`
pub const APP_NAME: &str = "gapi";

/// Application version constant, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use grafana_api_client::VERSION;
///
/// println!("gapi version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes allowing scripts to detect the outcome of a
/// command.
///
/// # Example
///
/// ```rust,no_run
/// use grafana_api_client::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    use crate::api::GrafanaError;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// The command was invoked with invalid arguments or options.
    /// Use `--help` to see correct usage.
    pub const USAGE: i32 = 2;

    /// The server rejected the credentials (HTTP 401).
    ///
    /// Run `gapi auth login` to store new credentials.
    pub const AUTH_ERROR: i32 = 4;

    /// The endpoint or resource does not exist (HTTP 404).
    pub const NOT_FOUND: i32 = 8;

    /// The server failed to handle the request (HTTP 5xx).
    pub const SERVER_ERROR: i32 = 16;

    /// Returns the exit code for an error returned by a command.
    ///
    /// API errors are found through any context added on top of them.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grafana_api_client::api::GrafanaError;
    /// use grafana_api_client::auth::AuthMethod;
    /// use grafana_api_client::exit_codes;
    ///
    /// let err = anyhow::Error::new(GrafanaError::Unauthorized(AuthMethod::ApiKey));
    /// assert_eq!(exit_codes::for_error(&err), exit_codes::AUTH_ERROR);
    /// ```
    pub fn for_error(err: &anyhow::Error) -> i32 {
        match err.downcast_ref::<GrafanaError>() {
            Some(GrafanaError::Unauthorized(_)) => AUTH_ERROR,
            Some(e) if e.status() == Some(404) => NOT_FOUND,
            Some(e) if e.is_server_error() => SERVER_ERROR,
            _ => ERROR,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use anyhow::Context;

        fn code(err: GrafanaError) -> i32 {
            for_error(&anyhow::Error::new(err))
        }

        #[test]
        fn test_status_codes() {
            assert_eq!(
                code(GrafanaError::Client {
                    status: 404,
                    body: "{}".to_string(),
                }),
                NOT_FOUND
            );
            assert_eq!(
                code(GrafanaError::Server {
                    status: 502,
                    body: String::new(),
                }),
                SERVER_ERROR
            );
            assert_eq!(code(GrafanaError::BadInput("x".to_string())), ERROR);
        }

        #[test]
        fn test_context_is_looked_through() {
            let result: Result<(), GrafanaError> = Err(GrafanaError::Server {
                status: 500,
                body: String::new(),
            });
            let err = result.context("Failed to load dashboard").unwrap_err();
            assert_eq!(for_error(&err), SERVER_ERROR);
        }

        #[test]
        fn test_other_errors() {
            assert_eq!(for_error(&anyhow::anyhow!("Invalid field format")), ERROR);
        }
    }
}
