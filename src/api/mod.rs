//
//  grafana-api-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the client for Grafana's HTTP API (`/api/...`).
//!
//! ## Architecture
//!
//! - [`client`]: Connection settings, URL construction and request dispatch
//! - [`request`]: The [`DeferredRequest`] path builder and its verb methods
//! - [`transport`]: The blocking HTTP seam and its reqwest implementation
//! - [`error`]: [`GrafanaError`] and the status code mapping
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grafana_api_client::api::{ConnectionConfig, GrafanaClient};
//!
//! // Anonymous access
//! let client = GrafanaClient::new(None::<&str>, ConnectionConfig::default())?;
//! let home = client.path("dashboards").path("home").get(&())?;
//!
//! // API key against a server under a sub-path
//! let connection = ConnectionConfig::from_url("https://example.com/grafana")?;
//! let client = GrafanaClient::new("eyJrIjoiT0tTcG1p...", connection)?;
//! let keys = client.path("auth").path("keys").get(&())?;
//! # Ok::<(), grafana_api_client::api::GrafanaError>(())
//! ```
//!
//! ## Error Handling
//!
//! Responses are mapped to [`GrafanaError`] variants:
//!
//! - `Server`: 5xx
//! - `BadInput`: 400
//! - `Unauthorized`: 401
//! - `PreconditionFailed`: 412
//! - `Client`: any other 4xx

/// Connection settings and the Grafana client.
pub mod client;

/// Error types and status code classification.
pub mod error;

/// The deferred path builder.
pub mod request;

/// The HTTP transport abstraction.
pub mod transport;

pub use client::{ConnectionConfig, GrafanaClient, Protocol, DEFAULT_HOST};
pub use error::GrafanaError;
pub use request::{to_payload, DeferredRequest, Payload};
pub use transport::{
    ReqwestTransport, Transport, TransportOptions, TransportRequest, TransportResponse,
    ACCEPT_JSON,
};
