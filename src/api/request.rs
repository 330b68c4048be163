//
//  grafana-api-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Deferred endpoint paths
//!
//! A [`DeferredRequest`] collects path segments until one of its verb methods
//! is called, at which point the joined path is dispatched through the
//! owning [`GrafanaClient`].
//!
//! | Method | HTTP | Payload |
//! |--------|------|---------|
//! | [`get`](DeferredRequest::get) / [`call`](DeferredRequest::call) | GET | query parameters |
//! | [`create`](DeferredRequest::create) | POST | JSON body |
//! | [`delete`](DeferredRequest::delete) | DELETE | JSON body |
//! | [`replace`](DeferredRequest::replace) | PUT | JSON body |
//! | [`update`](DeferredRequest::update) | PATCH | JSON body |
//!
//! Appending never mutates: each append returns a new builder, so a partial
//! chain can be kept and extended in several directions.
//!
//! ```rust,no_run
//! use grafana_api_client::api::{ConnectionConfig, GrafanaClient};
//! use serde_json::json;
//!
//! let client = GrafanaClient::new(("admin", "admin"), ConnectionConfig::default())?;
//! let datasources = client.path("datasources");
//!
//! let created = datasources.create(&json!({
//!     "name": "test-datasource",
//!     "type": "graphite",
//!     "url": "http://localhost",
//!     "access": "proxy",
//! }))?;
//!
//! let by_id = datasources.at(&created["id"]).get(&())?;
//! let by_name = datasources.path("name").path("test-datasource").get(&())?;
//! assert_eq!(by_id["id"], by_name["id"]);
//! # Ok::<(), grafana_api_client::api::GrafanaError>(())
//! ```

use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{GrafanaClient, GrafanaError};

/// Query parameters or body fields of a request.
pub type Payload = serde_json::Map<String, Value>;

/// Converts any serializable value into a [`Payload`].
///
/// Objects are used as-is; `null` (including `()` and `None`) is the empty
/// payload.
///
/// # Errors
///
/// Returns [`GrafanaError::InvalidPayload`] for values that serialize to
/// anything other than an object or `null`, and [`GrafanaError::Decode`] if
/// serialization itself fails.
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Payload, GrafanaError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Payload::new()),
        other => Err(GrafanaError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An endpoint path under construction.
///
/// Created from a client with [`GrafanaClient::path`], [`GrafanaClient::at`]
/// or [`GrafanaClient::resource`]. Borrowing the client keeps a chain from
/// outliving it.
#[derive(Clone)]
#[must_use = "a DeferredRequest does nothing until a verb method is called"]
pub struct DeferredRequest<'c> {
    client: &'c GrafanaClient,
    segments: Vec<String>,
}

impl<'c> DeferredRequest<'c> {
    /// Creates an empty chain on `client`.
    pub(crate) fn new(client: &'c GrafanaClient) -> Self {
        Self {
            client,
            segments: Vec::new(),
        }
    }

    /// Returns a new chain with a literal segment appended.
    pub fn path(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self {
            client: self.client,
            segments,
        }
    }

    /// Returns a new chain with the `Display` form of `segment` appended.
    ///
    /// This is the index form of [`path`](Self::path), for ids and other
    /// non-string segments. Note that a JSON string `Value` displays with its
    /// quotes; pass `value.as_str()` instead.
    pub fn at(&self, segment: impl fmt::Display) -> Self {
        self.path(segment.to_string())
    }

    /// Returns a new chain with every segment of `segments` appended in order.
    pub fn segments<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut extended = self.segments.clone();
        extended.extend(segments.into_iter().map(Into::into));
        Self {
            client: self.client,
            segments: extended,
        }
    }

    /// Returns the endpoint: the segments joined with `/`.
    pub fn endpoint(&self) -> String {
        self.segments.join("/")
    }

    /// Dispatches the chain with `method`.
    ///
    /// The verb methods below are shorthands for this.
    pub fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        payload: &T,
    ) -> Result<Value, GrafanaError> {
        let payload = to_payload(payload)?;
        self.client.request(method, &self.endpoint(), &payload)
    }

    /// Sends a GET request; `params` become query parameters.
    #[doc(alias = "read")]
    pub fn get<T: Serialize + ?Sized>(&self, params: &T) -> Result<Value, GrafanaError> {
        self.send(Method::GET, params)
    }

    /// Same as [`get`](Self::get).
    pub fn call<T: Serialize + ?Sized>(&self, params: &T) -> Result<Value, GrafanaError> {
        self.get(params)
    }

    /// Sends a POST request with `body` as JSON.
    pub fn create<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value, GrafanaError> {
        self.send(Method::POST, body)
    }

    /// Sends a DELETE request with `body` as JSON.
    #[doc(alias = "remove")]
    pub fn delete<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value, GrafanaError> {
        self.send(Method::DELETE, body)
    }

    /// Sends a PUT request with `body` as JSON.
    pub fn replace<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value, GrafanaError> {
        self.send(Method::PUT, body)
    }

    /// Sends a PATCH request with `body` as JSON.
    pub fn update<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value, GrafanaError> {
        self.send(Method::PATCH, body)
    }
}

impl fmt::Display for DeferredRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeferredRequest for '{}'", self.endpoint())
    }
}

impl fmt::Debug for DeferredRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredRequest")
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}
