use std::fmt;

use crate::browser::{LaunchError, WaitTimeout};
use crate::login::LoginError;

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum LinkpilotError {
    /// Login submitted but could not be verified (exit code 2)
    LoginVerification(String),
    /// No credentials configured and no valid token (exit code 3)
    MissingCredentials(String),
    /// Browser or WebDriver failed to launch (exit code 4)
    Launch(String),
    /// Bounded wait elapsed (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl LinkpilotError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LinkpilotError::LoginVerification(_) => 2,
            LinkpilotError::MissingCredentials(_) => 3,
            LinkpilotError::Launch(_) => 4,
            LinkpilotError::Timeout(_) => 5,
            LinkpilotError::Other(_) => 1,
        }
    }
}

impl fmt::Display for LinkpilotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkpilotError::LoginVerification(msg) => write!(f, "{}", msg),
            LinkpilotError::MissingCredentials(msg) => write!(f, "{}", msg),
            LinkpilotError::Launch(msg) => write!(f, "{}", msg),
            LinkpilotError::Timeout(msg) => write!(f, "Operation timed out: {}", msg),
            LinkpilotError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LinkpilotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkpilotError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for LinkpilotError {
    fn from(err: anyhow::Error) -> Self {
        // Map typed errors from the login state machine onto exit codes.
        if let Some(login_err) = err.downcast_ref::<LoginError>() {
            return match login_err {
                LoginError::MissingCredentials => {
                    LinkpilotError::MissingCredentials(err.to_string())
                }
                LoginError::Verification(_) => LinkpilotError::LoginVerification(err.to_string()),
            };
        }
        if err.downcast_ref::<LaunchError>().is_some() {
            return LinkpilotError::Launch(err.to_string());
        }
        if err.downcast_ref::<WaitTimeout>().is_some() {
            return LinkpilotError::Timeout(err.to_string());
        }
        LinkpilotError::Other(err)
    }
}
