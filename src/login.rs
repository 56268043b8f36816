//! Login orchestration: cookie replay first, credential fallback second.
//!
//! The flow is a small state machine. A stored, unexpired session cookie is
//! injected into a fresh browser session and verified against the
//! authenticated-page landmark; when that is impossible or fails, a fresh
//! credential login runs in a second session and the resulting cookie is
//! persisted for next time. On success the caller receives the live
//! session and owns its release; on failure no session is left running.

use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::Locator;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::browser::{Browser, SessionFactory, WaitTimeout};
use crate::challenge::{self, LOGGED_IN_LANDMARK};
use crate::config::Config;
use crate::store::CookieStore;
use crate::token::{
    SESSION_COOKIE_NAME, SessionToken, TokenState, classify, format_expiry, format_remaining,
};

pub const BASE_URL: &str = "https://www.linkedin.com/";
pub const HOME_URL: &str = "https://www.linkedin.com/feed/";
pub const LOGIN_URL: &str =
    "https://www.linkedin.com/login?fromSignIn=true&trk=guest_homepage-basic_nav-header-signin";
pub const LOGOUT_URL: &str = "https://www.linkedin.com/m/logout/";

const EMAIL_FIELD: Locator<'static> = Locator::Css("#username");
const PASSWORD_FIELD: Locator<'static> = Locator::Css("#password");
const SIGN_IN_BUTTON: Locator<'static> = Locator::Css("#organic-div form button[type='submit']");
const REMEMBER_ME_CHECKBOX: Locator<'static> =
    Locator::Css("#organic-div form input[type='checkbox']");

/// Bounded wait applied to individual element lookups.
const ELEMENT_WAIT: Duration = Duration::from_secs(25);
/// How long logout may take before we give up.
const LOGOUT_WAIT: Duration = Duration::from_secs(45);

/// Terminal failures of the login state machine.
#[derive(Debug, Error)]
pub enum LoginError {
    /// No valid token and no credentials: nothing automated can be done.
    #[error("missing EMAIL or PASSWORD in environment and no valid session cookie available")]
    MissingCredentials,
    /// Credentials were submitted but the session never verified.
    #[error("login failed: {0:#}")]
    Verification(anyhow::Error),
}

/// Composes the store, validator, factory and challenge waiter into the
/// login flow. The returned session is live and unreleased; the caller is
/// responsible for closing it.
pub struct LoginOrchestrator {
    config: Config,
    store: CookieStore,
    factory: SessionFactory,
}

impl LoginOrchestrator {
    pub fn new(config: Config, store: CookieStore, factory: SessionFactory) -> Self {
        LoginOrchestrator {
            config,
            store,
            factory,
        }
    }

    /// Log in and return a live, authenticated browser session.
    ///
    /// 1. Replay the stored session cookie when present and unexpired.
    /// 2. Otherwise fall back to credential login and persist the fresh
    ///    cookie.
    /// 3. A human-verification challenge on either path blocks until the
    ///    operator clears it.
    pub async fn login(&self) -> Result<Browser> {
        let token = self.store.read();
        let now = chrono::Utc::now().timestamp();

        match classify(token.as_ref(), now) {
            TokenState::Expired => {
                let expiry = token.as_ref().and_then(|t| t.expiry);
                info!(
                    "Found session cookie but it is expired (expired at {})",
                    format_expiry(expiry)
                );
                self.store.delete();
                info!("Will proceed with credential login to refresh session");
            }
            TokenState::Absent => {
                info!("Cookie-based login not possible");
            }
            TokenState::Valid => {
                if let Some(token) = &token {
                    info!(
                        "Found active session cookie. Expires at {}. Remaining: {}",
                        format_expiry(token.expiry),
                        format_remaining(token.expiry, now)
                    );
                    if let Some(browser) = self.try_cookie_login(token).await? {
                        return Ok(browser);
                    }
                }
            }
        }

        self.credential_login().await
    }

    /// Attempt cookie-replay login. `Ok(None)` means "fall back to
    /// credentials"; only launch failures propagate.
    async fn try_cookie_login(&self, token: &SessionToken) -> Result<Option<Browser>> {
        let browser = self.factory.create().await?;

        match self.cookie_login_inner(&browser, token).await {
            Ok(true) => {
                info!("Login with stored session cookie was successful");
                Ok(Some(browser))
            }
            Ok(false) => {
                info!("Session cookie was not accepted; falling back to credential login");
                let _ = browser.close().await;
                Ok(None)
            }
            Err(e) => {
                warn!("Error applying session cookie: {:#}", e);
                let _ = browser.close().await;
                Ok(None)
            }
        }
    }

    async fn cookie_login_inner(&self, browser: &Browser, token: &SessionToken) -> Result<bool> {
        // Must be on the cookie's domain before the jar accepts it
        browser.goto(BASE_URL).await?;
        browser.add_session_cookie(token).await?;

        browser.goto(HOME_URL).await?;
        challenge::await_clearance(browser).await;

        if let Ok(url) = browser.current_url().await {
            debug!("Current URL after cookie login attempt: {}", url);
        }

        Ok(browser
            .wait_for_element(LOGGED_IN_LANDMARK, ELEMENT_WAIT)
            .await
            .is_ok())
    }

    /// Credential login in a fresh session. Requires both email and
    /// password; failing that is fatal since there is no recovery path
    /// without operator-supplied secrets.
    async fn credential_login(&self) -> Result<Browser> {
        let Some((email, password)) = self.config.credentials() else {
            return Err(LoginError::MissingCredentials.into());
        };

        let browser = self.factory.create().await?;

        match self.credential_login_inner(&browser, email, password).await {
            Ok(()) => {
                // Best-effort: a persistence failure must not undo a
                // successful login
                self.persist_session_cookie(&browser).await;
                info!("Credential login successful");
                Ok(browser)
            }
            Err(e) => {
                let _ = browser.close().await;
                Err(LoginError::Verification(e).into())
            }
        }
    }

    async fn credential_login_inner(
        &self,
        browser: &Browser,
        email: &str,
        password: &str,
    ) -> Result<()> {
        browser.goto(LOGIN_URL).await?;

        let email_el = browser.wait_for_element(EMAIL_FIELD, ELEMENT_WAIT).await?;
        email_el.clear().await?;
        email_el.send_keys(email).await?;

        let password_el = browser
            .wait_for_element(PASSWORD_FIELD, ELEMENT_WAIT)
            .await?;
        password_el.clear().await?;
        password_el.send_keys(password).await?;

        self.uncheck_remember_me(browser).await;

        let sign_in = browser
            .wait_for_element(SIGN_IN_BUTTON, ELEMENT_WAIT)
            .await?;
        sign_in.click().await?;

        // Small grace period for the post-submit redirect
        sleep(Duration::from_secs(1)).await;
        challenge::await_clearance(browser).await;

        browser
            .wait_for_element(LOGGED_IN_LANDMARK, ELEMENT_WAIT)
            .await
            .context("Logged-in landmark never appeared after submitting credentials")?;

        Ok(())
    }

    /// Leave "remember me" unchecked so the shared machine keeps no trace.
    /// Best-effort: the checkbox is not always rendered.
    async fn uncheck_remember_me(&self, browser: &Browser) {
        let Ok(checkbox) = browser.client.find(REMEMBER_ME_CHECKBOX).await else {
            return;
        };
        if let Ok(true) = checkbox.is_selected().await {
            if let Err(e) = checkbox.click().await {
                debug!("Could not uncheck remember-me: {}", e);
            }
        }
    }

    async fn persist_session_cookie(&self, browser: &Browser) {
        match browser.session_cookie(SESSION_COOKIE_NAME).await {
            Some(token) => self.store.write(&token),
            None => info!("Session cookie not found after login (nothing to save)"),
        }
    }

    /// Terminate the remote session and clean up stored state.
    ///
    /// Logs in (reusing the stored cookie when possible), drives the logout
    /// URL, waits until the session cookie disappears from the jar or the
    /// site redirects to login, then deletes the stored token. The browser
    /// is closed on every path.
    pub async fn logout(&self) -> Result<()> {
        let browser = self.login().await?;

        let result = self.logout_inner(&browser).await;
        // The remote session is gone (or we gave up); the stored token is
        // useless either way
        self.store.delete();
        let _ = browser.close().await;
        result
    }

    async fn logout_inner(&self, browser: &Browser) -> Result<()> {
        browser.goto(LOGOUT_URL).await?;

        let deadline = Instant::now() + LOGOUT_WAIT;
        while Instant::now() < deadline {
            if let Ok(url) = browser.current_url().await
                && (url.contains("login") || url.contains("/checkpoint/"))
            {
                info!("Logout redirect observed");
                return Ok(());
            }

            // Refresh the site root so the jar reflects the logout
            let _ = browser.goto(BASE_URL).await;
            if browser.session_cookie(SESSION_COOKIE_NAME).await.is_none() {
                info!("Session cookie cleared");
                return Ok(());
            }

            sleep(Duration::from_secs(1)).await;
        }

        Err(WaitTimeout("session cookie to clear after logout".to_string()).into())
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;
