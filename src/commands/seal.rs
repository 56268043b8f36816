use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

use crate::config::Config;
use crate::store::PlaintextPolicy;

/// Encrypt the plaintext token file at rest.
///
/// After sealing, `write` refuses plaintext and `read` requires the secret,
/// so the operator has durably opted into encrypted storage.
pub async fn handle_seal(state_dir: Option<PathBuf>, secret: Option<String>) -> Result<()> {
    let config = Config::from_env();

    let secret = secret
        .or_else(|| config.decrypt_key.clone())
        .context("No secret supplied; pass --secret or set DECRYPT_KEY")?;

    let store = super::open_store(state_dir, PlaintextPolicy::Deny, &config)?;
    let path = store.seal(&secret)?;

    println!(
        "{}",
        json!({
            "sealed": true,
            "path": path.display().to_string(),
        })
    );
    Ok(())
}
