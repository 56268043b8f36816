//! Human-verification challenge handling.
//!
//! When the site suspects automation it redirects to a checkpoint page that
//! only a human can clear. Waiting for that is not an error condition, and
//! it has no timeout: the loop polls until the operator resolves the
//! challenge out-of-band, emitting a periodic notice so they know the
//! process is alive.

use std::time::Duration;

use fantoccini::Locator;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::browser::Browser;

/// Checkpoint URL prefix for CAPTCHA-style challenges.
pub const CHALLENGE_PREFIX: &str = "https://www.linkedin.com/checkpoint/challenge";
/// Checkpoint URL prefix for approval-style challenges (push/email confirm).
pub const CHALLENGE_V2_PREFIX: &str = "https://www.linkedin.com/checkpoint/challengesV2/";

/// DOM landmark whose presence indicates an authenticated page.
pub const LOGGED_IN_LANDMARK: Locator<'static> = Locator::Id("global-nav");

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const NOTICE_INTERVAL: Duration = Duration::from_secs(15);
const LANDMARK_WAIT: Duration = Duration::from_secs(25);

/// True when `url` is a human-verification checkpoint page.
pub fn is_challenge_url(url: &str) -> bool {
    url.starts_with(CHALLENGE_PREFIX) || url.starts_with(CHALLENGE_V2_PREFIX)
}

/// Block until the session is no longer on a challenge page.
///
/// Returns immediately when the current URL is not a challenge. Otherwise
/// polls every two seconds, indefinitely, with a "still waiting" notice
/// every fifteen seconds; URL-read failures are tolerated and retried.
/// After clearance, best-effort wait for the logged-in landmark so the
/// caller resumes on a settled page. Never fails: a challenge is a state
/// to wait out, not an error to report.
pub async fn await_clearance(browser: &Browser) {
    let current = match browser.current_url().await {
        Ok(url) => url,
        Err(e) => {
            debug!("Could not read current URL for challenge check: {}", e);
            return;
        }
    };

    if !is_challenge_url(&current) {
        return;
    }

    if current.starts_with(CHALLENGE_V2_PREFIX) {
        info!("Human approval required. Waiting for completion...");
    } else {
        info!("Human verification required. Waiting for completion...");
    }

    let mut last_notice = Instant::now();
    loop {
        sleep(POLL_INTERVAL).await;

        let current = match browser.current_url().await {
            Ok(url) => url,
            Err(_) => continue,
        };

        if !is_challenge_url(&current) {
            break;
        }

        if last_notice.elapsed() >= NOTICE_INTERVAL {
            info!("Still waiting for challenge completion...");
            last_notice = Instant::now();
        }
    }

    // Challenge cleared; give the main UI a chance to load
    if browser
        .wait_for_element(LOGGED_IN_LANDMARK, LANDMARK_WAIT)
        .await
        .is_err()
    {
        debug!("Logged-in landmark not seen after challenge clearance");
    }
    info!("Challenge completed. Continuing...");
}

#[cfg(test)]
#[path = "challenge_test.rs"]
mod challenge_test;
