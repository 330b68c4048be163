//
//  grafana-api-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Grafana API
//!
//! This module provides the core client for interacting with Grafana's HTTP
//! API. It owns the connection settings and the authentication strategy,
//! builds request URLs, and turns responses into parsed JSON or a typed
//! [`GrafanaError`].
//!
//! ## Features
//!
//! - URL construction as a pure function of the connection settings
//! - Bearer token or HTTP Basic authentication, resolved once per client
//! - GET payloads sent as query parameters, everything else as a JSON body
//! - Status code classification into [`GrafanaError`] variants
//!
//! ## Example
//!
//! ```rust,no_run
//! use grafana_api_client::api::{ConnectionConfig, GrafanaClient};
//!
//! let connection = ConnectionConfig::new("localhost").with_port(3000);
//! let client = GrafanaClient::new(("admin", "admin"), connection)?;
//!
//! let org = client.path("org").get(&())?;
//! println!("Current organization: {}", org["name"]);
//! # Ok::<(), grafana_api_client::api::GrafanaError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::error::check_status;
use super::request::{DeferredRequest, Payload};
use super::transport::{
    ReqwestTransport, Transport, TransportOptions, TransportRequest, ACCEPT_JSON,
};
use super::GrafanaError;
use crate::auth::{AuthMethod, Authentication};

/// The default Grafana host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// URL scheme used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP (the default)
    #[default]
    Http,
    /// HTTP over TLS
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

impl FromStr for Protocol {
    type Err = GrafanaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(GrafanaError::UnsupportedProtocol(s.to_string())),
        }
    }
}

/// Where a Grafana server lives.
///
/// API URLs have the shape `{protocol}://{host}[:{port}]/{url_path_prefix}api/{endpoint}`.
///
/// # Example
///
/// ```rust
/// use grafana_api_client::api::{ConnectionConfig, Protocol};
///
/// let connection = ConnectionConfig::new("a")
///     .with_port(1000)
///     .with_url_path_prefix("b")
///     .with_protocol(Protocol::Https);
///
/// assert_eq!(connection.api_url("c"), "https://a:1000/b/api/c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// URL scheme
    pub protocol: Protocol,
    /// Hostname or IP address
    pub host: String,
    /// Port; omitted from URLs when `None`
    pub port: Option<u16>,
    url_path_prefix: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl ConnectionConfig {
    /// Creates a plain HTTP connection to `host` with no port and no prefix.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            protocol: Protocol::Http,
            host: host.into(),
            port: None,
            url_path_prefix: String::new(),
        }
    }

    /// Parses a base URL such as `https://grafana.example.com:3000/grafana`.
    ///
    /// The path of the URL becomes the path prefix. Default ports are not
    /// kept (`https://host:443` yields no port).
    ///
    /// # Errors
    ///
    /// - [`GrafanaError::InvalidUrl`] if the URL cannot be parsed or has no host
    /// - [`GrafanaError::UnsupportedProtocol`] for schemes other than http/https
    ///
    /// # Example
    ///
    /// ```rust
    /// use grafana_api_client::api::ConnectionConfig;
    ///
    /// let connection = ConnectionConfig::from_url("https://example.com:3000/grafana/")?;
    /// assert_eq!(connection.api_url("org"), "https://example.com:3000/grafana/api/org");
    /// # Ok::<(), grafana_api_client::api::GrafanaError>(())
    /// ```
    pub fn from_url(url: &str) -> Result<Self, GrafanaError> {
        let parsed = Url::parse(url)?;
        let protocol: Protocol = parsed.scheme().parse()?;
        let host = parsed
            .host_str()
            .ok_or(url::ParseError::EmptyHost)?
            .to_string();

        Ok(Self {
            protocol,
            host,
            port: parsed.port(),
            url_path_prefix: String::new(),
        }
        .with_url_path_prefix(parsed.path()))
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets the URL path prefix, for servers reachable under a sub-path
    /// (e.g. `grafana` for `http://127.0.0.1/grafana/`).
    ///
    /// The prefix is stored with surrounding slashes removed and exactly one
    /// trailing slash added; an empty or all-slash prefix is stored empty.
    pub fn with_url_path_prefix(mut self, prefix: &str) -> Self {
        self.url_path_prefix = normalize_prefix(prefix);
        self
    }

    /// Returns the normalized path prefix (empty, or ending with `/`).
    pub fn url_path_prefix(&self) -> &str {
        &self.url_path_prefix
    }

    /// Builds the full URL of an API endpoint.
    ///
    /// Pure function of the connection settings and `endpoint`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grafana_api_client::api::ConnectionConfig;
    ///
    /// let connection = ConnectionConfig::default();
    /// assert_eq!(connection.api_url("a"), "http://127.0.0.1/api/a");
    /// assert_eq!(connection.api_url(""), "http://127.0.0.1/api/");
    /// ```
    pub fn api_url(&self, endpoint: &str) -> String {
        match self.port {
            Some(port) => format!(
                "{}://{}:{}/{}api/{}",
                self.protocol, self.host, port, self.url_path_prefix, endpoint
            ),
            None => format!(
                "{}://{}/{}api/{}",
                self.protocol, self.host, self.url_path_prefix, endpoint
            ),
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

/// The main client for a Grafana server.
///
/// A client is created once per server and reused; it is cheap to clone and
/// safe to share between threads (the transport sits behind an `Arc`).
///
/// Endpoints are reached through [`DeferredRequest`] chains started with
/// [`path`](Self::path), [`at`](Self::at) or [`resource`](Self::resource):
///
/// ```rust,no_run
/// use grafana_api_client::api::{ConnectionConfig, GrafanaClient};
/// use serde_json::json;
///
/// let client = GrafanaClient::new("eyJrIjoiT0tTcG1p...", ConnectionConfig::default())?;
///
/// // GET /api/dashboards/uid/my-uid
/// let dashboard = client.path("dashboards").path("uid").path("my-uid").get(&())?;
///
/// // POST /api/dashboards/db
/// client.path("dashboards").path("db").create(&json!({
///     "dashboard": {"id": null, "title": "Production Overview"},
///     "overwrite": false,
/// }))?;
///
/// // DELETE /api/datasources/42
/// client.path("datasources").at(42).delete(&())?;
/// # Ok::<(), grafana_api_client::api::GrafanaError>(())
/// ```
#[derive(Clone)]
pub struct GrafanaClient {
    connection: ConnectionConfig,
    auth: Authentication,
    transport: Arc<dyn Transport>,
    options: TransportOptions,
}

impl GrafanaClient {
    /// Creates a client with the default reqwest transport.
    ///
    /// `auth` accepts anything convertible into [`Authentication`]: a token
    /// string, a `(login, password)` pair, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        auth: impl Into<Authentication>,
        connection: ConnectionConfig,
    ) -> Result<Self, GrafanaError> {
        Self::with_options(auth, connection, TransportOptions::default())
    }

    /// Creates a client with the default reqwest transport built from
    /// `options`.
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::Transport`] if the HTTP client cannot be built
    /// (for example, an invalid proxy URL).
    pub fn with_options(
        auth: impl Into<Authentication>,
        connection: ConnectionConfig,
        options: TransportOptions,
    ) -> Result<Self, GrafanaError> {
        let transport = Arc::new(ReqwestTransport::new(&options)?);
        Ok(Self::with_transport(auth, connection, options, transport))
    }

    /// Creates a client on top of a custom transport.
    ///
    /// The per-request parts of `options` (timeout and extra headers) are still
    /// merged into every request; the client-level parts are the transport's
    /// business.
    pub fn with_transport(
        auth: impl Into<Authentication>,
        connection: ConnectionConfig,
        options: TransportOptions,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            connection,
            auth: auth.into(),
            transport,
            options,
        }
    }

    /// Returns the connection settings.
    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Returns the configured credentials.
    pub fn authentication(&self) -> &Authentication {
        &self.auth
    }

    /// Returns the authentication method tag.
    pub fn auth_method(&self) -> AuthMethod {
        self.auth.method()
    }

    /// Builds the full URL of an API endpoint. See [`ConnectionConfig::api_url`].
    pub fn api_url(&self, endpoint: &str) -> String {
        self.connection.api_url(endpoint)
    }

    /// Starts a request chain with a literal path segment.
    pub fn path(&self, segment: impl Into<String>) -> DeferredRequest<'_> {
        DeferredRequest::new(self).path(segment)
    }

    /// Starts a request chain with the `Display` form of a value.
    pub fn at(&self, segment: impl fmt::Display) -> DeferredRequest<'_> {
        DeferredRequest::new(self).at(segment)
    }

    /// Starts a request chain from a `/`-separated endpoint string.
    ///
    /// Empty segments are skipped, so `"/dashboards//home/"` is the same as
    /// `"dashboards/home"`.
    pub fn resource(&self, endpoint: &str) -> DeferredRequest<'_> {
        DeferredRequest::new(self).segments(endpoint.split('/').filter(|s| !s.is_empty()))
    }

    /// Builds the headers for one request: `Accept`, configured extra headers,
    /// then authentication.
    fn headers(&self) -> Result<HeaderMap, GrafanaError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        for (name, value) in &self.options.headers {
            headers.insert(name.clone(), value.clone());
        }
        self.auth.apply_to_headers(&mut headers)?;
        Ok(headers)
    }

    /// Sends one request and classifies the response.
    ///
    /// For `GET` the payload is sent as query parameters; for every other
    /// method it is serialized as the JSON body (an empty payload becomes
    /// `{}`).
    ///
    /// # Parameters
    ///
    /// * `method` - HTTP method
    /// * `endpoint` - API-relative path (the part after `/api/`)
    /// * `payload` - Query parameters or body fields
    ///
    /// # Errors
    ///
    /// - The status-mapped variants of [`GrafanaError`] for 4xx/5xx responses
    /// - [`GrafanaError::Transport`] if no response was received
    /// - [`GrafanaError::Decode`] if a success body is not valid JSON
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: &Payload,
    ) -> Result<Value, GrafanaError> {
        let url = self.api_url(endpoint);
        let (query, json) = if method == Method::GET {
            (query_pairs(payload), None)
        } else {
            (Vec::new(), Some(Value::Object(payload.clone())))
        };

        tracing::debug!(method = %method, url = %url, "sending request");

        let response = self.transport.send(TransportRequest {
            method,
            url,
            query,
            json,
            headers: self.headers()?,
            timeout: self.options.timeout,
        })?;

        tracing::debug!(status = response.status, "received response");

        check_status(response.status, &response.body, self.auth.method())?;
        Ok(response.json()?)
    }
}

/// Flattens a payload into query parameters.
///
/// Strings are sent as-is, `null` values are dropped, arrays repeat the key
/// once per element, and everything else is sent in its JSON form.
pub(crate) fn query_pairs(payload: &Payload) -> Vec<(String, String)> {
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    let mut pairs = Vec::new();
    for (key, value) in payload {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().filter_map(scalar).map(|v| (key.clone(), v)));
            }
            other => {
                if let Some(v) = scalar(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    pairs
}

impl fmt::Display for GrafanaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrafanaClient at '{}'", self.api_url(""))
    }
}

impl fmt::Debug for GrafanaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrafanaClient")
            .field("connection", &self.connection)
            .field("auth", &self.auth)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::mock::RecordingTransport;
    use reqwest::header::{HeaderName, AUTHORIZATION};
    use serde_json::json;
    use std::time::Duration;

    fn client_with(
        auth: impl Into<Authentication>,
        transport: Arc<RecordingTransport>,
    ) -> GrafanaClient {
        GrafanaClient::with_transport(
            auth,
            ConnectionConfig::default(),
            TransportOptions::default(),
            transport,
        )
    }

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn test_api_url() {
        let connection = ConnectionConfig::new("a")
            .with_port(1000)
            .with_url_path_prefix("b")
            .with_protocol(Protocol::Https);
        assert_eq!(connection.api_url("c"), "https://a:1000/b/api/c");

        let connection = ConnectionConfig::default();
        assert_eq!(connection.api_url("a"), "http://127.0.0.1/api/a");
    }

    #[test]
    fn test_display() {
        let client = GrafanaClient::new("test", ConnectionConfig::default()).unwrap();
        assert_eq!(client.to_string(), "GrafanaClient at 'http://127.0.0.1/api/'");
    }

    #[test]
    fn test_prefix_normalization() {
        let prefixed = |p: &str| ConnectionConfig::default().with_url_path_prefix(p);
        assert_eq!(prefixed("grafana").url_path_prefix(), "grafana/");
        assert_eq!(prefixed("grafana/").url_path_prefix(), "grafana/");
        assert_eq!(prefixed("/grafana//").url_path_prefix(), "grafana/");
        assert_eq!(prefixed("tools/grafana").url_path_prefix(), "tools/grafana/");
        assert_eq!(prefixed("").url_path_prefix(), "");
        assert_eq!(prefixed("/").url_path_prefix(), "");
        assert_eq!(prefixed("grafana").api_url("org"), "http://127.0.0.1/grafana/api/org");
    }

    #[test]
    fn test_from_url() {
        let connection = ConnectionConfig::from_url("https://grafana.example.com/").unwrap();
        assert_eq!(connection.protocol, Protocol::Https);
        assert_eq!(connection.host, "grafana.example.com");
        assert_eq!(connection.port, None);
        assert_eq!(connection.url_path_prefix(), "");

        let connection =
            ConnectionConfig::from_url("http://10.0.0.5:3000/monitoring/grafana").unwrap();
        assert_eq!(connection.port, Some(3000));
        assert_eq!(
            connection.api_url("health"),
            "http://10.0.0.5:3000/monitoring/grafana/api/health"
        );
    }

    #[test]
    fn test_from_url_rejects_other_schemes() {
        assert!(matches!(
            ConnectionConfig::from_url("ftp://example.com"),
            Err(GrafanaError::UnsupportedProtocol(_))
        ));
        assert!(matches!(
            ConnectionConfig::from_url("not a url"),
            Err(GrafanaError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_protocol_parse() {
        assert_eq!("HTTPS".parse::<Protocol>().unwrap(), Protocol::Https);
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert!("gopher".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_token_auth_header() {
        let transport = Arc::new(RecordingTransport::respond(200, "{}"));
        let client = client_with("tok", transport.clone());
        assert_eq!(client.authentication(), &Authentication::ApiKey("tok".to_string()));

        client.request(Method::GET, "org", &Payload::new()).unwrap();
        let sent = transport.last();
        assert_eq!(sent.headers[AUTHORIZATION], "Bearer tok");
        assert_eq!(sent.headers[ACCEPT], ACCEPT_JSON);
    }

    #[test]
    fn test_basic_auth_header() {
        let transport = Arc::new(RecordingTransport::respond(200, "{}"));
        let client = client_with(("user", "pass"), transport.clone());

        client.request(Method::GET, "org", &Payload::new()).unwrap();
        assert_eq!(transport.last().headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_anonymous_sends_no_authorization() {
        let transport = Arc::new(RecordingTransport::respond(200, "{}"));
        let client = client_with(None::<&str>, transport.clone());

        client.request(Method::GET, "dashboards/home", &Payload::new()).unwrap();
        assert!(!transport.last().headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_get_sends_query_parameters() {
        let transport = Arc::new(RecordingTransport::respond(200, "[]"));
        let client = client_with("tok", transport.clone());

        let result = client
            .request(
                Method::GET,
                "search",
                &payload(json!({
                    "query": "cpu",
                    "tag": ["a", "b"],
                    "starred": true,
                    "folderIds": null
                })),
            )
            .unwrap();
        assert_eq!(result, json!([]));

        let sent = transport.last();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url, "http://127.0.0.1/api/search");
        assert!(sent.json.is_none());

        let mut query = sent.query.clone();
        query.sort();
        assert_eq!(
            query,
            vec![
                ("query".to_string(), "cpu".to_string()),
                ("starred".to_string(), "true".to_string()),
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_other_methods_send_json_body() {
        let transport = Arc::new(RecordingTransport::respond(200, r#"{"id":1}"#));
        let client = client_with("tok", transport.clone());

        let body = payload(json!({"name": "test-datasource", "type": "graphite"}));
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            client.request(method.clone(), "datasources", &body).unwrap();
            let sent = transport.last();
            assert_eq!(sent.method, method);
            assert!(sent.query.is_empty());
            assert_eq!(sent.json, Some(Value::Object(body.clone())));
        }

        client.request(Method::DELETE, "datasources/1", &Payload::new()).unwrap();
        assert_eq!(transport.last().json, Some(json!({})));
    }

    #[test]
    fn test_options_merged_into_requests() {
        let transport = Arc::new(RecordingTransport::respond(200, "{}"));
        let mut options = TransportOptions {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        options.headers.insert(
            HeaderName::from_static("x-grafana-org-id"),
            HeaderValue::from_static("2"),
        );
        let client = GrafanaClient::with_transport(
            "tok",
            ConnectionConfig::default(),
            options,
            transport.clone(),
        );

        client.request(Method::GET, "org", &Payload::new()).unwrap();
        let sent = transport.last();
        assert_eq!(sent.timeout, Some(Duration::from_secs(5)));
        assert_eq!(sent.headers["x-grafana-org-id"], "2");
        assert_eq!(sent.headers[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn test_error_statuses_are_mapped() {
        let transport = Arc::new(RecordingTransport::respond(401, ""));
        let client = client_with(("admin", "wrong"), transport);

        let err = client.request(Method::GET, "org", &Payload::new()).unwrap_err();
        assert!(matches!(err, GrafanaError::Unauthorized(AuthMethod::LoginCredentials)));
    }

    #[test]
    fn test_non_json_success_body_is_decode_error() {
        let transport = Arc::new(RecordingTransport::respond(200, "<html>login</html>"));
        let client = client_with("tok", transport);

        let err = client.request(Method::GET, "org", &Payload::new()).unwrap_err();
        assert!(matches!(err, GrafanaError::Decode(_)));
    }

    #[test]
    fn test_client_is_reusable_after_error() {
        let transport = Arc::new(RecordingTransport::with(|req| {
            if req.url.ends_with("missing") {
                crate::api::TransportResponse::new(404, "not found")
            } else {
                crate::api::TransportResponse::new(200, r#"{"ok":true}"#)
            }
        }));
        let client = client_with("tok", transport.clone());

        assert!(client.request(Method::GET, "missing", &Payload::new()).is_err());
        assert_eq!(
            client.request(Method::GET, "health", &Payload::new()).unwrap(),
            json!({"ok": true})
        );
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_end_to_end_with_reqwest() {
        let mut server = mockito::Server::new();
        let org = server
            .mock("GET", "/grafana/api/org")
            .match_header("authorization", "Basic YWRtaW46YWRtaW4=")
            .match_header("accept", ACCEPT_JSON)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"name":"Main Org."}"#)
            .create();
        let conflict = server
            .mock("POST", "/grafana/api/dashboards/db")
            .with_status(412)
            .with_body(r#"{"status":"name-exists","message":"Dashboard name taken"}"#)
            .create();

        let connection = ConnectionConfig::from_url(&format!("{}/grafana", server.url())).unwrap();
        let client = GrafanaClient::new(("admin", "admin"), connection).unwrap();

        let result = client.path("org").get(&()).unwrap();
        assert_eq!(result["name"], "Main Org.");

        let err = client
            .path("dashboards")
            .path("db")
            .create(&json!({"dashboard": {"title": "Test Dashboard"}, "overwrite": false}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Precondition failed: name-exists (`Dashboard name taken`)"
        );

        org.assert();
        conflict.assert();
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GrafanaClient>();
    }
}
