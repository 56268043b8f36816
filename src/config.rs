//! Runtime configuration.
//!
//! Read once from the environment (with `.env` support) and passed to each
//! component explicitly. Nothing in this crate consults process state after
//! construction.

/// Operator-supplied configuration for a run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Run the browser without a visible window
    pub headless: bool,
    /// Account email for credential-login fallback
    pub email: Option<String>,
    /// Account password for credential-login fallback
    pub password: Option<String>,
    /// Secret for decrypting the encrypted token file
    pub decrypt_key: Option<String>,
}

impl Config {
    /// Load configuration from the process environment, reading a `.env`
    /// file first when present. Recognized keys: `HEADLESS`, `EMAIL`,
    /// `PASSWORD`, `DECRYPT_KEY`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Config {
            headless: std::env::var("HEADLESS")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            email: non_empty(std::env::var("EMAIL").ok()),
            password: non_empty(std::env::var("PASSWORD").ok()),
            decrypt_key: non_empty(std::env::var("DECRYPT_KEY").ok()),
        }
    }

    /// Both halves of the credential pair, when configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }
}

/// Truthy environment values: `1`, `true`, `yes`, `y` (case-insensitive).
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
