//
//  grafana-api-client
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive Prompts Module
//!
//! Thin wrappers over `dialoguer` for gathering login details in the
//! terminal.
//!
//! # Overview
//!
//! - **Text Input** - Server URL and login, with optional defaults
//! - **Password Input** - Masked entry of passwords and API keys
//! - **Confirmation** - Yes/no prompts
//!
//! # Example
//!
//! ```no_run
//! use grafana_api_client::interactive::prompt::{prompt_input_with_default, prompt_password};
//!
//! let url = prompt_input_with_default("Grafana URL:", "http://127.0.0.1:3000").unwrap();
//! let password = prompt_password("Password:").unwrap();
//! ```

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompts the user for text input with a default value.
///
/// Pressing Enter accepts the default, which is shown in brackets.
///
/// # Example
///
/// ```no_run
/// use grafana_api_client::interactive::prompt::prompt_input_with_default;
///
/// let url = prompt_input_with_default("Grafana URL:", "http://127.0.0.1:3000").unwrap();
/// ```
pub fn prompt_input_with_default(message: &str, default: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(message)
        .default(default.to_string())
        .interact_text()?;
    Ok(input)
}

/// Prompts the user for a secret.
///
/// Characters are not echoed to the terminal.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Prompts the user for a yes/no answer, defaulting to `default`.
pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}
