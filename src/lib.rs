//! # linkpilot
#![allow(clippy::uninlined_format_args)]
//!
//! Session-lifecycle manager for LinkedIn automation, driven over WebDriver.
//!
//! Logging in interactively on every run is slow and trips the site's
//! automation defenses. linkpilot keeps the session cookie on disk
//! (optionally AES-256-GCM encrypted), replays it into a fresh browser
//! session, and only falls back to a full credential login when the stored
//! cookie is missing, expired, or rejected. A human-verification challenge
//! pauses the flow until the operator clears it in the browser window.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Log in (cookie replay first, credential fallback second)
//! linkpilot login
//!
//! # Keep the window open for manual work after logging in
//! linkpilot login --headful --hold
//!
//! # Inspect the stored session cookie
//! linkpilot status
//!
//! # Opt into encrypted-at-rest cookie storage
//! linkpilot seal --secret "$DECRYPT_KEY"
//!
//! # End the remote session and delete the stored cookie
//! linkpilot logout
//! ```
//!
//! Configuration comes from the environment (a `.env` file is honored):
//! `EMAIL` / `PASSWORD` for the credential fallback, `DECRYPT_KEY` to read
//! an encrypted cookie file, `HEADLESS` to default the launch mode.
//!
//! ## Library Usage
//!
//! ```no_run
//! use linkpilot::{
//!     BrowserOptions, Config, CookieStore, LoginOrchestrator, PlaintextPolicy, SessionFactory,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env();
//! let store = CookieStore::new(
//!     CookieStore::default_dir()?,
//!     PlaintextPolicy::Allow,
//!     config.decrypt_key.clone(),
//! )?;
//! let factory = SessionFactory::new(BrowserOptions::new(config.headless));
//!
//! let orchestrator = LoginOrchestrator::new(config, store, factory);
//! let browser = orchestrator.login().await?;
//! // ... drive the authenticated session ...
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The caller owns the returned session and must close it on every path.

/// Browser session factory and live-session handle
pub mod browser;

/// Human-verification challenge wait loop
pub mod challenge;

/// Runtime configuration from the environment
pub mod config;

/// At-rest encryption for the stored token
pub mod crypto;

/// chromedriver process management
pub mod driver;

/// Login state machine and logout flow
pub mod login;

/// On-disk session token storage
pub mod store;

/// Session token model and expiry classification
pub mod token;

pub use browser::{Browser, BrowserOptions, LaunchError, SessionFactory, UserAgent, WaitTimeout};
pub use config::Config;
pub use login::{LoginError, LoginOrchestrator};
pub use store::{CookieStore, PlaintextPolicy};
pub use token::{SESSION_COOKIE_NAME, SessionToken, TokenState, classify};
