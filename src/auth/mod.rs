//
//  grafana-api-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module resolves how a [`GrafanaClient`](crate::api::GrafanaClient)
//! authenticates with a Grafana server. The strategy is picked once, when the
//! client is built, and applied to every outgoing request.
//!
//! ## Supported Authentication Methods
//!
//! - **Anonymous**: no credentials; works against servers with anonymous access enabled.
//! - **API key / service account token**: sent as `Authorization: Bearer <token>`.
//! - **Login credentials**: sent as HTTP Basic authentication.
//!
//! ## Module Structure
//!
//! - [`KeyringStore`]: Secure storage of API keys and passwords for the `gapi` CLI
//!
//! ## Example
//!
//! ```rust
//! use grafana_api_client::auth::{Authentication, AuthMethod};
//!
//! // A bare string is an API key
//! let auth = Authentication::from("eyJrIjoiT0tTcG1p...");
//! assert_eq!(auth.method(), AuthMethod::ApiKey);
//!
//! // A pair is login credentials
//! let auth = Authentication::from(("admin", "admin"));
//! assert_eq!(auth.method(), AuthMethod::LoginCredentials);
//!
//! // Nothing at all is anonymous access
//! let auth = Authentication::from(None::<&str>);
//! assert_eq!(auth.method(), AuthMethod::Anonymous);
//! ```

mod keyring;

pub use self::keyring::*;

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::api::GrafanaError;

/// The credentials a client authenticates with.
///
/// Conversions cover the usual ways of specifying credentials:
///
/// | Source | Strategy |
/// |--------|----------|
/// | `&str` / `String` | [`Authentication::ApiKey`] |
/// | `(login, password)` | [`Authentication::Credentials`] |
/// | `None` | [`Authentication::Anonymous`] |
///
/// The `Debug` implementation never prints secrets.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Authentication {
    /// No credentials are attached.
    #[default]
    Anonymous,

    /// An API key or service account token, sent as a bearer token.
    ApiKey(String),

    /// Login and password, sent as HTTP Basic authentication.
    Credentials {
        /// The Grafana login (user name or email)
        login: String,
        /// The user's password
        password: String,
    },
}

/// The kind of authentication a client uses, without the secret.
///
/// Reported by [`GrafanaError::Unauthorized`] so the caller knows which
/// credentials were rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// No credentials
    Anonymous,
    /// Bearer token
    ApiKey,
    /// HTTP Basic
    LoginCredentials,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous access"),
            Self::ApiKey => write!(f, "api key"),
            Self::LoginCredentials => write!(f, "login credentials"),
        }
    }
}

impl Authentication {
    /// Creates an API key authentication.
    pub fn api_key(token: impl Into<String>) -> Self {
        Self::ApiKey(token.into())
    }

    /// Creates a login/password authentication.
    pub fn credentials(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Credentials {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Returns the authentication method tag.
    pub fn method(&self) -> AuthMethod {
        match self {
            Self::Anonymous => AuthMethod::Anonymous,
            Self::ApiKey(_) => AuthMethod::ApiKey,
            Self::Credentials { .. } => AuthMethod::LoginCredentials,
        }
    }

    /// Returns the `Authorization` header value for this strategy, if any.
    ///
    /// The value is marked sensitive so it is redacted from reqwest's debug
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::InvalidHeader`] if the token contains characters
    /// that are not allowed in a header value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grafana_api_client::auth::Authentication;
    ///
    /// let auth = Authentication::credentials("user", "pass");
    /// let value = auth.header_value()?.unwrap();
    /// assert_eq!(value.to_str().unwrap(), "Basic dXNlcjpwYXNz");
    /// # Ok::<(), grafana_api_client::api::GrafanaError>(())
    /// ```
    pub fn header_value(&self) -> Result<Option<HeaderValue>, GrafanaError> {
        let raw = match self {
            Self::Anonymous => return Ok(None),
            Self::ApiKey(token) => format!("Bearer {}", token),
            Self::Credentials { login, password } => {
                format!("Basic {}", STANDARD.encode(format!("{}:{}", login, password)))
            }
        };

        let mut value = HeaderValue::from_str(&raw)?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Applies the authentication to a set of request headers.
    ///
    /// Anonymous authentication leaves the headers untouched; the other
    /// strategies set (or replace) the `Authorization` header.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), GrafanaError> {
        if let Some(value) = self.header_value()? {
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Self::Credentials { login, .. } => f
                .debug_struct("Credentials")
                .field("login", login)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

impl From<&str> for Authentication {
    fn from(token: &str) -> Self {
        Self::ApiKey(token.to_string())
    }
}

impl From<String> for Authentication {
    fn from(token: String) -> Self {
        Self::ApiKey(token)
    }
}

impl<L: Into<String>, P: Into<String>> From<(L, P)> for Authentication {
    fn from((login, password): (L, P)) -> Self {
        Self::credentials(login, password)
    }
}

impl<T: Into<Authentication>> From<Option<T>> for Authentication {
    fn from(auth: Option<T>) -> Self {
        auth.map(Into::into).unwrap_or_default()
    }
}
