//! Session token model and expiry classification

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the LinkedIn session cookie we persist and replay.
pub const SESSION_COOKIE_NAME: &str = "li_at";

/// A stored session cookie, replayable into a fresh browser session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Cookie name (matches the file's map key)
    #[serde(default = "default_name")]
    pub name: String,
    /// Opaque bearer value issued by the site
    pub value: String,
    /// Cookie domain scope
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Cookie path scope
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiry as epoch seconds; None means session-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, rename = "httpOnly")]
    pub http_only: bool,
    #[serde(default, rename = "sameSite", skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_name() -> String {
    SESSION_COOKIE_NAME.to_string()
}

fn default_domain() -> String {
    ".linkedin.com".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

/// On-disk shape of the plaintext token file:
/// `{ "li_at": { ...cookie... }, "saved_at": "..." }`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenFile {
    #[serde(flatten)]
    pub cookies: BTreeMap<String, SessionToken>,
    pub saved_at: String,
}

impl TokenFile {
    pub fn new(token: SessionToken) -> Self {
        let mut cookies = BTreeMap::new();
        cookies.insert(token.name.clone(), token);
        TokenFile {
            cookies,
            saved_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }

    /// Extract the session cookie, if the file contains one.
    pub fn session_token(&self) -> Option<&SessionToken> {
        self.cookies.get(SESSION_COOKIE_NAME)
    }
}

/// Classification of a stored token relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    /// No usable token on disk
    Absent,
    /// Token exists but its expiry has passed
    Expired,
    /// Token is replayable
    Valid,
}

/// Classify a token against `now` (epoch seconds).
///
/// A token without an expiry is a session cookie and always `Valid`.
/// This is a pure function; deleting expired tokens is the caller's job.
pub fn classify(token: Option<&SessionToken>, now: i64) -> TokenState {
    match token {
        None => TokenState::Absent,
        Some(t) => match t.expiry {
            Some(expiry) if expiry <= now => TokenState::Expired,
            _ => TokenState::Valid,
        },
    }
}

/// Format an expiry timestamp for progress output.
pub fn format_expiry(expiry: Option<i64>) -> String {
    match expiry.and_then(|e| chrono::DateTime::from_timestamp(e, 0)) {
        Some(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string(),
        None => "session-only (no expiry)".to_string(),
    }
}

/// Format the remaining lifetime of a token ("3d 4h 12m 5s", "expired").
pub fn format_remaining(expiry: Option<i64>, now: i64) -> String {
    let Some(expiry) = expiry else {
        return "session-only".to_string();
    };

    let total = expiry - now;
    if total <= 0 {
        return "expired".to_string();
    }

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 || days > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 || hours > 0 || days > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ")
}

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;
