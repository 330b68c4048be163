//
//  grafana-api-client
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends one request to any endpoint under `/api/`, similar to `gh api` for
//! GitHub. Useful for endpoints without a dedicated command and for
//! debugging.
//!
//! ## Examples
//!
//! ```bash
//! # Current organization
//! gapi api org
//!
//! # Search dashboards (fields become query parameters on GET)
//! gapi api search -F query=production -F limit=10
//!
//! # Create a folder
//! gapi api -X POST folders -F title="Team A"
//!
//! # Import a dashboard from a file
//! gapi api -X POST dashboards/db --input dashboard.json
//!
//! # Pull one value out of the response
//! gapi api dashboards/uid/abc123 --query .dashboard.title
//! ```

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::{to_payload, Payload};
use crate::output::select_path;

use super::{build_client, GlobalOptions};

/// Make an API request
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API endpoint relative to /api/ (e.g., dashboards/uid/abc123)
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Typed fields: key=value, values parsed as JSON where possible, dotted keys nest
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// String fields: key=value, never parsed
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Read the payload from a JSON file (- for stdin)
    #[arg(long, short = 'f', conflicts_with_all = ["field", "raw_field"])]
    pub input: Option<String>,

    /// Print only the value at a dotted path (e.g., .dashboard.title)
    #[arg(long, short = 'q')]
    pub query: Option<String>,
}

impl ApiCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let method = self.parse_method()?;
        let payload = self.build_payload()?;
        let endpoint = normalize_endpoint(&self.endpoint);

        let client = build_client(global)?;
        let response = client.resource(endpoint).send(method, &payload)?;

        let output = match &self.query {
            Some(filter) => select_path(&response, filter)?.cloned().unwrap_or(Value::Null),
            None => response,
        };
        global.writer().write_value(&output)
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn build_payload(&self) -> Result<Payload> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
            };

            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", input))?;
            return Ok(to_payload(&value)?);
        }

        let mut payload = Map::new();
        for field in &self.field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut payload, key, parse_typed_value(value));
        }
        for field in &self.raw_field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut payload, key, Value::String(value.to_string()));
        }
        Ok(payload)
    }
}

/// Strips surrounding slashes and a leading `api/`, so `/api/org` and `org`
/// address the same endpoint.
fn normalize_endpoint(endpoint: &str) -> &str {
    let trimmed = endpoint.trim_matches('/');
    match trimmed.strip_prefix("api/") {
        Some(rest) => rest,
        None if trimmed == "api" => "",
        None => trimmed,
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

/// Interprets a `-F` value: booleans, null, numbers and JSON arrays/objects
/// keep their type; anything else is a string.
fn parse_typed_value(value: &str) -> Value {
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = value.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                Value::Number(n)
            } else if value.starts_with('[') || value.starts_with('{') {
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
            } else {
                Value::String(value.to_string())
            }
        }
    }
}

/// Inserts `value` at a dotted key, creating (or replacing non-object)
/// intermediate objects.
fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}
