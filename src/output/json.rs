//
//  grafana-api-client
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output Formatting
//!
//! Rendering of API responses for the terminal, plus a small jq-style path
//! selector for pulling one value out of a response.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`format_json`] | Pretty or compact rendering |
//! | [`select_path`] | `.dashboard.panels.0.title` style extraction |
//!
//! ## Example
//!
//! ```rust
//! use grafana_api_client::output::{format_json, select_path};
//! use serde_json::json;
//!
//! let response = json!({"dashboard": {"title": "Production Overview"}});
//! let title = select_path(&response, ".dashboard.title")?.unwrap();
//! assert_eq!(format_json(title, true)?, "\"Production Overview\"");
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{bail, Result};
use serde_json::Value;

/// Renders a JSON value, indented unless `compact` is set.
pub fn format_json(value: &Value, compact: bool) -> Result<String> {
    if compact {
        Ok(serde_json::to_string(value)?)
    } else {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

/// Selects a value by a dotted path.
///
/// The path starts with `.`; each component is an object key or, on arrays,
/// a zero-based index. `.` alone selects the whole value.
///
/// # Returns
///
/// - `Ok(Some(value))` - the selected value
/// - `Ok(None)` - a component does not exist
///
/// # Errors
///
/// Returns an error if the filter does not start with `.`; pipes and
/// functions are not supported.
pub fn select_path<'a>(value: &'a Value, filter: &str) -> Result<Option<&'a Value>> {
    let Some(path) = filter.strip_prefix('.') else {
        bail!("Unsupported filter '{}'. Filters look like .field.0.name", filter);
    };
    if path.contains(['|', ' ', '[', '(']) {
        bail!("Unsupported filter '{}'. Only dotted paths are supported", filter);
    }

    let mut current = value;
    for component in path.split('.').filter(|c| !c.is_empty()) {
        let next = match current {
            Value::Array(items) => component.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(component),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
