//
//  grafana-api-client
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! The [`Transport`] trait is the only place where bytes leave the process.
//! [`GrafanaClient`](super::GrafanaClient) builds a fully-resolved
//! [`TransportRequest`] (URL, query, JSON body, headers) and hands it over;
//! the transport returns the status code and body bytes untouched.
//!
//! [`ReqwestTransport`] is the default implementation, a thin wrapper around
//! `reqwest::blocking::Client`. It is `Send + Sync` and keeps reqwest's
//! connection pool, so one client can be shared between threads.
//!
//! Tests and embedders can plug in their own transport:
//!
//! ```rust
//! use grafana_api_client::api::{
//!     GrafanaError, Transport, TransportRequest, TransportResponse,
//! };
//!
//! struct Canned;
//!
//! impl Transport for Canned {
//!     fn send(&self, _request: TransportRequest) -> Result<TransportResponse, GrafanaError> {
//!         Ok(TransportResponse::new(200, r#"{"name":"Main Org."}"#))
//!     }
//! }
//! ```

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::{Method, Proxy};
use serde_json::Value;

use super::GrafanaError;

/// The `Accept` header sent with every request.
pub const ACCEPT_JSON: &str = "application/json; charset=UTF-8";

/// Transport-level configuration.
///
/// `timeout` and `headers` are merged into every outgoing request; the other
/// fields configure the underlying reqwest client when it is built.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use grafana_api_client::api::TransportOptions;
///
/// let options = TransportOptions {
///     timeout: Some(Duration::from_secs(10)),
///     accept_invalid_certs: true,
///     ..Default::default()
/// };
/// assert!(options.proxy.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Total time allowed for one request. `None` keeps reqwest's default.
    pub timeout: Option<Duration>,
    /// Time allowed to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// The `User-Agent` header value.
    pub user_agent: String,
    /// Skip TLS certificate verification (self-signed Grafana instances).
    pub accept_invalid_certs: bool,
    /// Proxy URL used for all requests.
    pub proxy: Option<String>,
    /// Extra headers added to every request (e.g. `X-Grafana-Org-Id`).
    pub headers: HeaderMap,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: format!("gapi/{}", crate::VERSION),
            accept_invalid_certs: false,
            proxy: None,
            headers: HeaderMap::new(),
        }
    }
}

/// A fully-resolved request, ready to be sent.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, without query string
    pub url: String,
    /// Query parameters, in order; keys may repeat
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub json: Option<Value>,
    /// Request headers, including authentication
    pub headers: HeaderMap,
    /// Per-request timeout override
    pub timeout: Option<Duration>,
}

/// The raw outcome of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// A blocking HTTP transport.
///
/// Implementations must be safe to share between threads.
pub trait Transport: Send + Sync {
    /// Sends one request and returns the response, whatever its status.
    ///
    /// Only failures to obtain a response (connection, TLS, timeout) are errors
    /// here; status classification happens in the client.
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, GrafanaError>;
}

/// The default transport, backed by `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds a transport from the client-level options.
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::Transport`] if the proxy URL is invalid or the
    /// TLS backend cannot be initialized.
    pub fn new(options: &TransportOptions) -> Result<Self, GrafanaError> {
        let mut builder = Client::builder()
            .user_agent(options.user_agent.clone())
            .danger_accept_invalid_certs(options.accept_invalid_certs);

        if let Some(connect_timeout) = options.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy) = &options.proxy {
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, GrafanaError> {
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(TransportResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::header::{HeaderValue, ACCEPT};
    use serde_json::json;

    fn request(method: Method, url: String) -> TransportRequest {
        TransportRequest {
            method,
            url,
            query: Vec::new(),
            json: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    #[test]
    fn test_send_get_with_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "cpu load".into()),
                Matcher::UrlEncoded("tag".into(), "prod".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create();

        let transport = ReqwestTransport::new(&TransportOptions::default()).unwrap();
        let mut req = request(Method::GET, format!("{}/api/search", server.url()));
        req.query = vec![
            ("query".to_string(), "cpu load".to_string()),
            ("tag".to_string(), "prod".to_string()),
        ];

        let response = transport.send(req).unwrap();
        mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap(), json!([]));
    }

    #[test]
    fn test_send_json_body_and_headers() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/dashboards/db")
            .match_header("accept", ACCEPT_JSON)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"overwrite": false})))
            .with_status(412)
            .with_body(r#"{"status":"name-exists"}"#)
            .create();

        let transport = ReqwestTransport::new(&TransportOptions::default()).unwrap();
        let mut req = request(Method::POST, format!("{}/api/dashboards/db", server.url()));
        req.headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        req.json = Some(json!({"overwrite": false}));

        let response = transport.send(req).unwrap();
        mock.assert();
        assert_eq!(response.status, 412);
        assert_eq!(response.text(), r#"{"status":"name-exists"}"#);
    }

    #[test]
    fn test_user_agent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/health")
            .match_header("user-agent", format!("gapi/{}", crate::VERSION).as_str())
            .with_status(200)
            .with_body("{}")
            .create();

        let transport = ReqwestTransport::new(&TransportOptions::default()).unwrap();
        transport
            .send(request(Method::GET, format!("{}/api/health", server.url())))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::new(&TransportOptions::default()).unwrap();
        let err = transport
            .send(request(Method::GET, "http://127.0.0.1:1/api/org".to_string()))
            .unwrap_err();
        assert!(matches!(err, GrafanaError::Transport(_)));
    }
}
