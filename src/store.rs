//! On-disk storage for the session token.
//!
//! The store never surfaces read failures: a missing, corrupt, or
//! undecryptable file is simply "no usable token". Writes are best-effort
//! and must not abort an otherwise-successful login.

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::crypto::{self, EncryptedBlob};
use crate::token::{SessionToken, TokenFile, format_expiry, format_remaining};

/// Plaintext token file name.
const COOKIE_FILE: &str = "cookies.json";
/// Encrypted token file names, in lookup order. The second is a legacy
/// spelling still accepted on read.
const ENCRYPTED_COOKIE_FILES: [&str; 2] = ["cookies.json.encrypted", "cookies.json.encrypt"];

/// Whether `write` may create a plaintext token file.
///
/// The interactive confirmation lives in the caller-supplied policy rather
/// than inside the store, so non-interactive callers pass `Allow` or `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaintextPolicy {
    /// Prompt once on stdin before the first plaintext write
    AlwaysAsk,
    /// Write without asking
    Allow,
    /// Never write plaintext
    Deny,
}

/// Reads and writes the session token under a state directory.
pub struct CookieStore {
    dir: PathBuf,
    policy: PlaintextPolicy,
    secret: Option<String>,
}

impl CookieStore {
    pub fn new(dir: PathBuf, policy: PlaintextPolicy, secret: Option<String>) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Unable to create state directory {}", dir.display()))?;
        Ok(CookieStore {
            dir,
            policy,
            secret,
        })
    }

    /// Default state directory: `~/.linkpilot`.
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Unable to determine home directory")?;
        Ok(home.join(".linkpilot"))
    }

    fn plaintext_path(&self) -> PathBuf {
        self.dir.join(COOKIE_FILE)
    }

    fn encrypted_path(&self) -> Option<PathBuf> {
        ENCRYPTED_COOKIE_FILES
            .iter()
            .map(|name| self.dir.join(name))
            .find(|p| p.exists())
    }

    /// True when an encrypted token file exists on disk.
    pub fn has_encrypted_blob(&self) -> bool {
        self.encrypted_path().is_some()
    }

    /// Read the stored session token.
    ///
    /// Tries the encrypted blob first (silently skipped when no secret is
    /// configured), then the plaintext file. Any failure along the way is
    /// absorbed and reported as `None`.
    pub fn read(&self) -> Option<SessionToken> {
        if let Some(token) = self.read_encrypted() {
            return Some(token);
        }

        let path = self.plaintext_path();
        if !path.exists() {
            info!("No session cookie file found");
            return None;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read cookie file: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<TokenFile>(&contents) {
            Ok(file) => self.extract(&file),
            Err(e) => {
                warn!("Cookie file is not valid JSON: {}", e);
                None
            }
        }
    }

    fn read_encrypted(&self) -> Option<SessionToken> {
        let path = self.encrypted_path()?;
        let secret = self.secret.as_deref()?;

        let contents = fs::read_to_string(&path).ok()?;
        let blob: EncryptedBlob = serde_json::from_str(&contents).ok()?;
        let plaintext = crypto::open(&blob, secret)?;
        let file: TokenFile = serde_json::from_slice(&plaintext).ok()?;
        debug!("Decrypted session cookie from {}", path.display());
        self.extract(&file)
    }

    fn extract(&self, file: &TokenFile) -> Option<SessionToken> {
        match file.session_token() {
            Some(token) => Some(token.clone()),
            None => {
                warn!("Cookie file does not contain a valid session cookie");
                None
            }
        }
    }

    /// Persist a freshly captured session token as plaintext.
    ///
    /// Refuses to write when an encrypted blob exists (no silent downgrade
    /// once the operator has opted into encryption) and otherwise consults
    /// the plaintext policy. Failures are logged, never raised.
    pub fn write(&self, token: &SessionToken) {
        if self.has_encrypted_blob() {
            info!("Encrypted cookie present; not writing plaintext cookies.json");
            return;
        }

        match self.policy {
            PlaintextPolicy::Deny => {
                debug!("Plaintext cookie writes disabled by policy");
                return;
            }
            PlaintextPolicy::AlwaysAsk => {
                if !confirm_plaintext_write() {
                    info!("Skipped writing cookie to disk");
                    return;
                }
            }
            PlaintextPolicy::Allow => {}
        }

        let file = TokenFile::new(token.clone());
        let json = match serde_json::to_string_pretty(&file) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize cookie file (non-fatal): {}", e);
                return;
            }
        };

        match fs::write(self.plaintext_path(), json) {
            Ok(()) => {
                let now = chrono::Utc::now().timestamp();
                info!(
                    "Saved session cookie. Expires at {}. Remaining: {}",
                    format_expiry(token.expiry),
                    format_remaining(token.expiry, now)
                );
            }
            Err(e) => warn!("Failed to write cookie file (non-fatal): {}", e),
        }
    }

    /// Best-effort removal of the plaintext token file.
    pub fn delete(&self) {
        let path = self.plaintext_path();
        if path.exists() {
            match fs::remove_file(&path) {
                Ok(()) => info!("Deleted stored session cookie file"),
                Err(e) => debug!("Failed to delete cookie file: {}", e),
            }
        }
    }

    /// Encrypt the existing plaintext token file and remove the plaintext.
    ///
    /// This is the operator's opt-in to encrypted-at-rest storage; unlike
    /// the read/write paths it propagates errors, since it only runs as a
    /// direct command.
    pub fn seal(&self, secret: &str) -> Result<PathBuf> {
        let plaintext_path = self.plaintext_path();
        let contents = fs::read(&plaintext_path)
            .with_context(|| format!("No plaintext token file at {}", plaintext_path.display()))?;

        // Only a parseable cookie file may be sealed
        serde_json::from_slice::<TokenFile>(&contents)
            .context("Plaintext token file is not a valid cookie file")?;

        let blob = crypto::seal(&contents, secret)?;
        let encrypted_path = self.dir.join(ENCRYPTED_COOKIE_FILES[0]);
        fs::write(&encrypted_path, serde_json::to_string_pretty(&blob)?)
            .with_context(|| format!("Failed to write {}", encrypted_path.display()))?;

        fs::remove_file(&plaintext_path).context("Failed to remove plaintext token file")?;
        info!("Sealed session cookie into {}", encrypted_path.display());
        Ok(encrypted_path)
    }
}

fn confirm_plaintext_write() -> bool {
    print!("No encrypted cookie found. Create plaintext cookies.json for session reuse? [y/N]: ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
