use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use crate::browser::{BrowserOptions, SessionFactory};
use crate::config::Config;
use crate::login::LoginOrchestrator;
use crate::store::PlaintextPolicy;

pub async fn handle_logout(
    state_dir: Option<PathBuf>,
    headless: bool,
    headful: bool,
) -> Result<()> {
    let mut config = Config::from_env();
    config.headless = super::effective_headless(&config, headless, headful);

    // A logout run must never write a fresh plaintext token
    let store = super::open_store(state_dir, PlaintextPolicy::Deny, &config)?;

    let factory = SessionFactory::new(BrowserOptions::new(config.headless));
    let orchestrator = LoginOrchestrator::new(config, store, factory);
    orchestrator.logout().await?;

    println!("{}", json!({ "logged_out": true }));
    Ok(())
}
