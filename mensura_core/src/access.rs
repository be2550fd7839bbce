//! Shared-secret access gate.
//!
//! A [`Session`] can only be obtained from [`AccessGate::unlock`], so code that
//! takes `&Session` cannot run before the secret has been checked.

use crate::{Error, Result};
use chrono::{DateTime, Local};

/// Environment variable that overrides the configured secret
pub const PASSWORD_ENV: &str = "APP_PASSWORD";

/// Secret used when neither the environment nor the config provide one
pub const DEFAULT_PASSWORD: &str = "changeme";

/// Holds the expected secret
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Resolve the secret: environment first, then config, then the default
    pub fn from_sources(configured: Option<&str>) -> Self {
        match std::env::var(PASSWORD_ENV) {
            Ok(secret) if !secret.is_empty() => Self::new(secret),
            _ => Self::new(configured.unwrap_or(DEFAULT_PASSWORD)),
        }
    }

    /// Check an attempt and open a session on success
    pub fn unlock(&self, attempt: &str) -> Result<Session> {
        if attempt == self.secret {
            tracing::debug!("Access granted");
            Ok(Session {
                opened_at: Local::now(),
            })
        } else {
            tracing::warn!("Rejected access attempt");
            Err(Error::Unauthorized)
        }
    }
}

/// Proof of a successful unlock for the current invocation
#[derive(Debug)]
pub struct Session {
    opened_at: DateTime<Local>,
}

impl Session {
    pub fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_with_correct_secret() {
        let gate = AccessGate::new("s3cret");
        let session = gate.unlock("s3cret").unwrap();
        assert!(session.opened_at() <= Local::now());
    }

    #[test]
    fn test_unlock_rejects_wrong_secret() {
        let gate = AccessGate::new("s3cret");
        assert!(matches!(gate.unlock("guess"), Err(Error::Unauthorized)));
        assert!(matches!(gate.unlock(""), Err(Error::Unauthorized)));
    }
}
