//! CLI command handlers.

pub mod login;
pub mod logout;
pub mod seal;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::store::{CookieStore, PlaintextPolicy};

/// Resolve the state directory: explicit flag first, `~/.linkpilot` otherwise.
pub(crate) fn resolve_state_dir(state_dir: Option<PathBuf>) -> Result<PathBuf> {
    match state_dir {
        Some(dir) => Ok(dir),
        None => CookieStore::default_dir(),
    }
}

/// Build a store for the resolved state directory with the given policy.
pub(crate) fn open_store(
    state_dir: Option<PathBuf>,
    policy: PlaintextPolicy,
    config: &Config,
) -> Result<CookieStore> {
    CookieStore::new(resolve_state_dir(state_dir)?, policy, config.decrypt_key.clone())
}

/// Merge the CLI headless flags over the environment default.
pub(crate) fn effective_headless(config: &Config, headless: bool, headful: bool) -> bool {
    if headless {
        true
    } else if headful {
        false
    } else {
        config.headless
    }
}
