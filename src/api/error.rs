//
//  grafana-api-client
//  api/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Error types for Grafana API operations
//!
//! Every request dispatched through [`GrafanaClient`](super::GrafanaClient)
//! either returns the parsed JSON body or exactly one [`GrafanaError`].
//!
//! # Status Mapping
//!
//! | Status | Variant |
//! |--------|---------|
//! | 500-599 | [`GrafanaError::Server`] |
//! | 400 | [`GrafanaError::BadInput`] |
//! | 401 | [`GrafanaError::Unauthorized`] |
//! | 412 | [`GrafanaError::PreconditionFailed`] |
//! | other 400-499 | [`GrafanaError::Client`] |
//!
//! Any other status is treated as a success and the body is parsed as JSON.
//!
//! # Example
//!
//! ```rust
//! use grafana_api_client::api::GrafanaError;
//!
//! fn describe(err: &GrafanaError) -> &'static str {
//!     if err.is_server_error() {
//!         "the server is unwell"
//!     } else if err.is_client_error() {
//!         "the request was rejected"
//!     } else {
//!         "the request never completed"
//!     }
//! }
//! ```

use thiserror::Error;

use crate::auth::AuthMethod;

/// Unified error type for all Grafana API operations.
///
/// `BadInput`, `Unauthorized`, `PreconditionFailed` and `Client` form the
/// client-error family (see [`is_client_error`](Self::is_client_error)).
#[derive(Error, Debug)]
pub enum GrafanaError {
    /// The server failed to handle the request (5xx).
    ///
    /// The body is decoded as ASCII with every other byte replaced, since a
    /// failing server may return anything.
    #[error("Server Error {status}: {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Raw response body, best-effort decoded
        body: String,
    },

    /// The request contained invalid JSON or missing/invalid fields (400).
    #[error("Bad Input: `{0}`")]
    BadInput(String),

    /// The credentials were rejected (401).
    ///
    /// Carries the authentication method the client was configured with.
    #[error("Unauthorized (authorization with {0} failed)")]
    Unauthorized(AuthMethod),

    /// A newer version of the resource exists, or another resource already
    /// uses the same title (412).
    #[error("Precondition failed: {status} (`{message}`)")]
    PreconditionFailed {
        /// The `status` field of the response JSON (e.g. `version-mismatch`)
        status: String,
        /// The `message` field of the response JSON
        message: String,
    },

    /// Any other client-side fault (4xx).
    #[error("Client Error {status}: {body}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The request payload did not serialize to a JSON object.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A header value could not be encoded (e.g. a token containing newlines).
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// A base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A base URL used a scheme other than `http` or `https`.
    #[error("Unsupported protocol '{0}' (expected http or https)")]
    UnsupportedProtocol(String),

    /// The HTTP transport failed (connection refused, timeout, TLS, ...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A success response did not contain valid JSON.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl GrafanaError {
    /// Returns `true` for the 4xx family.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadInput(_)
                | Self::Unauthorized(_)
                | Self::PreconditionFailed { .. }
                | Self::Client { .. }
        )
    }

    /// Returns `true` for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Returns the HTTP status code for errors derived from a response.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grafana_api_client::api::GrafanaError;
    ///
    /// let err = GrafanaError::BadInput("missing title".to_string());
    /// assert_eq!(err.status(), Some(400));
    ///
    /// let err = GrafanaError::InvalidPayload("expected an object".to_string());
    /// assert_eq!(err.status(), None);
    /// ```
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::BadInput(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::PreconditionFailed { .. } => Some(412),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Classifies a response by status code.
///
/// Returns `Ok(())` when the body should be parsed as a success payload,
/// otherwise the one error the status maps to.
///
/// # Parameters
///
/// * `status` - The HTTP status code
/// * `body` - The raw response body
/// * `auth` - The authentication method used for the request, reported on 401
pub fn check_status(status: u16, body: &[u8], auth: AuthMethod) -> Result<(), GrafanaError> {
    match status {
        500..=599 => Err(GrafanaError::Server {
            status,
            body: decode_ascii_lossy(body),
        }),
        400 => Err(GrafanaError::BadInput(
            String::from_utf8_lossy(body).into_owned(),
        )),
        401 => Err(GrafanaError::Unauthorized(auth)),
        412 => Err(precondition_failed(body)),
        400..=499 => Err(GrafanaError::Client {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
        _ => Ok(()),
    }
}

/// Builds a [`GrafanaError::PreconditionFailed`] from a 412 response body.
///
/// Grafana answers with `{"status": "version-mismatch", "message": "..."}`.
/// When the body is not JSON or a field is missing, the status falls back to
/// `412` and the message to the raw body.
fn precondition_failed(body: &[u8]) -> GrafanaError {
    let json = serde_json::from_slice::<serde_json::Value>(body).ok();
    let field = |name: &str| {
        json.as_ref()
            .and_then(|v| v.get(name))
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    };

    GrafanaError::PreconditionFailed {
        status: field("status").unwrap_or_else(|| "412".to_string()),
        message: field("message")
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned()),
    }
}

/// Decodes bytes as ASCII, replacing every non-ASCII byte with U+FFFD.
pub(crate) fn decode_ascii_lossy(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(status: u16) -> &'static str {
        match check_status(status, b"{}", AuthMethod::ApiKey) {
            Ok(()) => "ok",
            Err(GrafanaError::Server { .. }) => "server",
            Err(GrafanaError::BadInput(_)) => "bad_input",
            Err(GrafanaError::Unauthorized(_)) => "unauthorized",
            Err(GrafanaError::PreconditionFailed { .. }) => "precondition",
            Err(GrafanaError::Client { .. }) => "client",
            Err(other) => panic!("unexpected error for {}: {}", status, other),
        }
    }

    #[test]
    fn test_status_mapping_is_total() {
        for status in 400..=599u16 {
            let expected = match status {
                400 => "bad_input",
                401 => "unauthorized",
                412 => "precondition",
                402..=499 => "client",
                _ => "server",
            };
            assert_eq!(kind(status), expected, "status {}", status);
        }
    }

    #[test]
    fn test_success_statuses() {
        for status in 200..=299u16 {
            assert_eq!(kind(status), "ok");
        }
    }

    #[test]
    fn test_client_error_family() {
        for status in 400..=499u16 {
            let err = check_status(status, b"", AuthMethod::Anonymous).unwrap_err();
            assert!(err.is_client_error());
            assert!(!err.is_server_error());
            assert_eq!(err.status(), Some(status));
        }

        let err = check_status(503, b"", AuthMethod::Anonymous).unwrap_err();
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_server_error_message() {
        let err = check_status(502, b"bad gateway \xff", AuthMethod::Anonymous).unwrap_err();
        assert_eq!(err.to_string(), "Server Error 502: bad gateway \u{FFFD}");
    }

    #[test]
    fn test_bad_input_message() {
        let err = check_status(400, br#"[{"fieldNames":["Title"]}]"#, AuthMethod::Anonymous)
            .unwrap_err();
        assert_eq!(err.to_string(), r#"Bad Input: `[{"fieldNames":["Title"]}]`"#);
    }

    #[test]
    fn test_unauthorized_names_auth_method() {
        let err = check_status(401, b"", AuthMethod::LoginCredentials).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unauthorized (authorization with login credentials failed)"
        );

        let err = check_status(401, b"", AuthMethod::ApiKey).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unauthorized (authorization with api key failed)"
        );
    }

    #[test]
    fn test_precondition_failed_from_json() {
        let body = br#"{"status":"version-mismatch","message":"Dashboard changed"}"#;
        let err = check_status(412, body, AuthMethod::ApiKey).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Precondition failed: version-mismatch (`Dashboard changed`)"
        );
    }

    #[test]
    fn test_precondition_failed_without_json() {
        let err = check_status(412, b"conflict", AuthMethod::ApiKey).unwrap_err();
        assert_eq!(err.to_string(), "Precondition failed: 412 (`conflict`)");
    }

    #[test]
    fn test_generic_client_error_message() {
        let err = check_status(404, br#"{"message":"Dashboard not found"}"#, AuthMethod::ApiKey)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Client Error 404: {"message":"Dashboard not found"}"#
        );
    }
}
