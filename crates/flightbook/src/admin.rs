//! Admin gate for the full ledger listing.
//!
//! This is a visibility switch, not access control: anyone who can read the
//! ledger file can read every booking. Wrong credentials only hide the
//! listing feature in the front end.

use tracing::debug;

use crate::config::AdminConfig;
use crate::error::{Error, Result};

/// Checks admin credentials against the configured user name and digest.
#[derive(Debug, Clone)]
pub struct AdminGate {
    username: String,
    digest: Option<blake3::Hash>,
}

impl AdminGate {
    /// Build a gate from configuration.
    ///
    /// An unparseable digest yields a gate that rejects every password.
    #[must_use]
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            username: config.username.trim().to_string(),
            digest: blake3::Hash::from_hex(&config.password_blake3).ok(),
        }
    }

    /// Check a user name and password. Both are trimmed before comparison.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let Some(expected) = self.digest else {
            return false;
        };
        // blake3::Hash equality is constant-time.
        let password_ok = blake3::hash(password.trim().as_bytes()) == expected;
        let username_ok = username.trim() == self.username;
        debug!(username_ok, password_ok, "Admin credential check");
        username_ok && password_ok
    }

    /// Like [`AdminGate::verify`], as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if the credentials do not match.
    pub fn authorize(&self, username: &str, password: &str) -> Result<()> {
        if self.verify(username, password) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }
}
