//! Session key derivation and lifecycle.
//!
//! The session key is derived once from a user password and reused for
//! every export. Derivation is deterministic (fixed salt, iteration count
//! and hash) so the same password always yields the same key; that is what
//! makes round-trip verification possible without storing the password.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use sapience_core::error::{Result, SapienceError};

/// Application-specific PBKDF2 salt. Fixed: changing it would orphan every
/// previously exported project container.
pub const KDF_SALT: &[u8] = b"Semantic-Sapience-proj";

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Symmetric key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A derived 256-bit symmetric session key.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; KEY_LEN]);

impl SessionKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log key material.
        f.write_str("SessionKey(..)")
    }
}

/// Holds the session key for the lifetime of the process.
///
/// The key is undefined until the user sets a password; once set it is
/// reused for every export. Only the import recovery path replaces it, and
/// only after a successful decryption with the replacement key.
#[derive(Debug, Default)]
pub struct KeyManager {
    key: Option<SessionKey>,
}

impl KeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a session key from a password.
    ///
    /// PBKDF2-HMAC-SHA256 with the fixed application salt and iteration
    /// count. The iteration count makes this CPU-bound, so it runs on the
    /// blocking pool.
    pub async fn derive_key(password: &str) -> Result<SessionKey> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || derive_key_blocking(&password))
            .await
            .map_err(|e| SapienceError::internal(format!("Key derivation task failed: {e}")))
    }

    /// Derives the session key from the user's password and installs it.
    pub async fn set_password(&mut self, password: &str) -> Result<()> {
        let key = Self::derive_key(password).await?;
        self.install(key);
        Ok(())
    }

    /// Installs an already-derived key, replacing any current one. Used by
    /// the import recovery path after a successful decryption.
    pub fn install(&mut self, key: SessionKey) {
        tracing::debug!("session key installed");
        self.key = Some(key);
    }

    /// The current session key, if a password has been set.
    pub fn session_key(&self) -> Option<&SessionKey> {
        self.key.as_ref()
    }
}

fn derive_key_blocking(password: &str) -> SessionKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), KDF_SALT, KDF_ITERATIONS, &mut key);
    SessionKey(key)
}
