//
//  grafana-api-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Terminal output for the `gapi` CLI: JSON responses on stdout, status
//! messages styled with `console`.
//!
//! - [`json`]: JSON rendering and path selection
//! - [`OutputWriter`]: entry point used by the commands

mod json;

pub use json::*;

use anyhow::Result;
use console::style;
use serde_json::Value;

/// How JSON responses are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented JSON (the default)
    #[default]
    Pretty,
    /// Single-line JSON, for piping into other tools
    Compact,
}

/// Writes command output.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer; colors follow whether stderr is a terminal.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled_stderr(),
        }
    }

    /// Writes a JSON value to stdout.
    pub fn write_value(&self, value: &Value) -> Result<()> {
        println!("{}", format_json(value, self.format == OutputFormat::Compact)?);
        Ok(())
    }

    /// Writes a success message to stderr.
    pub fn write_success(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("✓").green().bold(), msg);
        } else {
            eprintln!("✓ {}", msg);
        }
    }

    /// Writes an error to stderr.
    pub fn write_error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }
}
