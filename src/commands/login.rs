use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::browser::{BrowserOptions, SessionFactory, UserAgent};
use crate::config::Config;
use crate::login::LoginOrchestrator;
use crate::store::PlaintextPolicy;

pub async fn handle_login(
    state_dir: Option<PathBuf>,
    headless: bool,
    headful: bool,
    rotate_user_agent: bool,
    hold: bool,
) -> Result<()> {
    let mut config = Config::from_env();
    config.headless = super::effective_headless(&config, headless, headful);

    let store = super::open_store(state_dir, PlaintextPolicy::AlwaysAsk, &config)?;

    let mut options = BrowserOptions::new(config.headless);
    if rotate_user_agent {
        options.user_agent = UserAgent::Rotate;
    }

    let orchestrator = LoginOrchestrator::new(config, store, SessionFactory::new(options));
    let browser = orchestrator.login().await?;

    let landing_url = browser.current_url().await.unwrap_or_default();

    if hold {
        info!("Logged in successfully. Press Ctrl+C to close the session.");
        tokio::signal::ctrl_c().await?;
    }

    browser.close().await?;

    println!(
        "{}",
        json!({
            "logged_in": true,
            "url": landing_url,
        })
    );
    Ok(())
}
