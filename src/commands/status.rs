use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use crate::config::Config;
use crate::store::PlaintextPolicy;
use crate::token::{TokenState, classify, format_expiry, format_remaining};

/// Inspect the stored session token without touching a browser.
pub async fn handle_status(state_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::from_env();
    let store = super::open_store(state_dir, PlaintextPolicy::Deny, &config)?;

    let token = store.read();
    let now = chrono::Utc::now().timestamp();
    let state = classify(token.as_ref(), now);

    let output = match &token {
        None => json!({
            "state": TokenState::Absent,
            "encrypted": store.has_encrypted_blob(),
        }),
        Some(token) => json!({
            "state": state,
            "cookie": token.name,
            "expires_at": format_expiry(token.expiry),
            "remaining": format_remaining(token.expiry, now),
            "encrypted": store.has_encrypted_blob(),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
