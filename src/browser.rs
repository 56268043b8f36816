//! Browser session factory and live-session handle.
//!
//! Sessions are created with a deterministic Chrome configuration: quiet
//! native logging, an eager page-load strategy, a realistic user-agent
//! string, and a maximized window in headful mode. The session owns its
//! WebDriver connection; `close(self)` consumes the handle so a released
//! session cannot be reused.

use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use rand::seq::SliceRandom;
use serde_json::json;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::driver::DriverManager;
use crate::token::SessionToken;

/// Browser launch failed (missing binary, dead driver, rejected session).
/// Always fatal; there is no automated recovery.
#[derive(Debug, Error)]
#[error("failed to launch browser session: {0}")]
pub struct LaunchError(pub String);

/// A bounded element or page wait elapsed.
#[derive(Debug, Error)]
#[error("timed out waiting for {0}")]
pub struct WaitTimeout(pub String);

/// Realistic Chrome user-agent strings for the rotation knob.
const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36",
];

/// User-agent selection for new sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserAgent {
    /// The first entry of the built-in pool (stable across runs)
    #[default]
    Fixed,
    /// Pick a random entry from the pool on every launch
    Rotate,
}

impl UserAgent {
    fn resolve(&self) -> String {
        match self {
            UserAgent::Fixed => USER_AGENTS[0].to_string(),
            UserAgent::Rotate => USER_AGENTS
                .choose(&mut rand::thread_rng())
                .unwrap_or(&USER_AGENTS[0])
                .to_string(),
        }
    }
}

/// Launch configuration for a browser session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// User-agent selection
    pub user_agent: UserAgent,
}

impl BrowserOptions {
    pub fn new(headless: bool) -> Self {
        BrowserOptions {
            headless,
            user_agent: UserAgent::default(),
        }
    }
}

/// Creates browser sessions with deterministic options.
pub struct SessionFactory {
    driver: DriverManager,
    options: BrowserOptions,
}

impl SessionFactory {
    pub fn new(options: BrowserOptions) -> Self {
        SessionFactory {
            driver: DriverManager::new(),
            options,
        }
    }

    /// Launch a new browser session.
    ///
    /// Any failure here is a [`LaunchError`]: the environment is broken and
    /// the caller cannot recover without operator intervention.
    pub async fn create(&self) -> Result<Browser> {
        match self.create_inner().await {
            Ok(browser) => Ok(browser),
            Err(e) => Err(LaunchError(format!("{:#}", e)).into()),
        }
    }

    async fn create_inner(&self) -> Result<Browser> {
        info!("Connecting to Chrome WebDriver");
        let webdriver_url = self.driver.ensure_driver().await?;

        // Each session gets its own user-data dir to avoid profile locks
        let profile_dir = tempfile::Builder::new()
            .prefix("linkpilot-chrome-")
            .tempdir()?;
        #[allow(deprecated)]
        let profile_path = profile_dir.into_path();

        let mut args = vec!["--no-sandbox".to_string(), "--log-level=3".to_string()];

        if self.options.headless {
            // Chrome 112+ headless mode
            args.push("--headless=new".to_string());
            args.push("--window-size=1920,1080".to_string());
            args.push("--disable-gpu".to_string());
            args.push("--disable-dev-shm-usage".to_string());
        } else {
            // Operator needs to see (and possibly solve a challenge in) the window
            args.push("--start-maximized".to_string());
        }

        args.push(format!("--user-agent={}", self.options.user_agent.resolve()));
        args.push(format!("--user-data-dir={}", profile_path.display()));

        let mut chrome_opts = serde_json::Map::new();
        chrome_opts.insert("args".to_string(), json!(args));
        chrome_opts.insert("excludeSwitches".to_string(), json!(["enable-logging"]));

        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
        // Don't block on every subresource; element waits handle readiness
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        Ok(Browser { client })
    }
}

/// A live, exclusively owned browser session.
#[derive(Debug)]
pub struct Browser {
    pub(crate) client: Client,
}

impl Browser {
    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client.goto(url).await?;

        // Best-effort wait for the DOM to be usable (eager strategy means
        // goto may return before readyState settles)
        let wait_script = r#"
            return document.readyState === 'interactive' || document.readyState === 'complete';
        "#;
        for _ in 0..20 {
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => sleep(Duration::from_millis(100)).await,
            }
        }

        Ok(())
    }

    /// Get the current URL - useful for challenge and logout detection
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Poll for an element until it appears or `timeout` elapses.
    pub async fn wait_for_element(
        &self,
        locator: Locator<'_>,
        timeout: Duration,
    ) -> Result<Element> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.client.find(locator).await {
                Ok(element) => return Ok(element),
                Err(_) if Instant::now() < deadline => {
                    sleep(Duration::from_millis(250)).await;
                }
                Err(_) => {
                    return Err(WaitTimeout(format!(
                        "element {:?} after {:?}",
                        locator, timeout
                    ))
                    .into());
                }
            }
        }
    }

    /// Inject a stored session token into the cookie jar.
    ///
    /// The browser must already be on the cookie's domain. Some drivers
    /// reject an explicit domain attribute; retry without it in that case.
    pub async fn add_session_cookie(&self, token: &SessionToken) -> Result<()> {
        match self.client.add_cookie(build_cookie(token, true)).await {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("add_cookie with domain rejected ({}), retrying without", e);
                self.client
                    .add_cookie(build_cookie(token, false))
                    .await
                    .context("Failed to add session cookie")
            }
        }
    }

    /// Fetch a named cookie from the live session's jar, best-effort.
    pub async fn session_cookie(&self, name: &str) -> Option<SessionToken> {
        let cookies = match self.client.get_all_cookies().await {
            Ok(cookies) => cookies,
            Err(e) => {
                debug!("Failed to read cookie jar: {}", e);
                return None;
            }
        };

        cookies.iter().find(|c| c.name() == name).map(|c| SessionToken {
            name: c.name().to_string(),
            value: c.value().to_string(),
            domain: c.domain().unwrap_or(".linkedin.com").to_string(),
            path: c.path().unwrap_or("/").to_string(),
            expiry: c.expires_datetime().map(|dt| dt.unix_timestamp()),
            secure: c.secure().unwrap_or(false),
            http_only: c.http_only().unwrap_or(false),
            same_site: c.same_site().map(|s| s.to_string()),
        })
    }

    /// Release the session and its underlying browser process.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

fn build_cookie(token: &SessionToken, with_domain: bool) -> fantoccini::cookies::Cookie<'static> {
    let mut cookie =
        fantoccini::cookies::Cookie::new(token.name.clone(), token.value.clone());
    cookie.set_path(token.path.clone());
    if with_domain {
        cookie.set_domain(token.domain.clone());
    }
    if let Some(expiry) = token.expiry
        && let Ok(ts) = time::OffsetDateTime::from_unix_timestamp(expiry)
    {
        cookie.set_expires(ts);
    }
    cookie
}
