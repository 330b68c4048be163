//
//  grafana-api-client
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive terminal prompts used by `gapi auth login`.

pub mod prompt;

pub use prompt::*;

/// Returns `true` when a user is attending the terminal.
///
/// Commands fall back to flags and piped input when this is `false`.
pub fn is_interactive() -> bool {
    console::user_attended()
}
