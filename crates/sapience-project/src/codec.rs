//! Encrypted project container codec.
//!
//! Container layout: an 8-byte magic/version prefix, a 12-byte random IV,
//! then the AES-256-GCM ciphertext with its 16-byte authentication tag.
//! Readers also accept bare containers (IV + ciphertext, no prefix) written
//! before the prefix existed.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;

use sapience_core::error::{Result, SapienceError};
use sapience_core::window::manager::{Presenter, WindowManager};
use sapience_core::workspace::Workspace;

use crate::document::ProjectDocument;
use crate::key::SessionKey;

/// Magic/version prefix of the container format.
pub const CONTAINER_MAGIC: &[u8; 8] = b"SSPROJ01";

/// AES-GCM initialization vector length.
pub const IV_LEN: usize = 12;

/// GCM authentication tag length.
const TAG_LEN: usize = 16;

/// Serializes, encrypts, decrypts and replays project documents.
pub struct ProjectCodec;

impl ProjectCodec {
    /// Captures the workspace as a plain document.
    pub fn serialize(ws: &Workspace) -> ProjectDocument {
        ProjectDocument::from_workspace(ws)
    }

    /// Encrypts a document into a portable container under a fresh IV.
    pub fn encrypt(document: &ProjectDocument, key: &SessionKey) -> Result<Vec<u8>> {
        let plaintext = serde_json::to_vec(document)
            .map_err(|e| SapienceError::internal(format!("Failed to encode document: {e}")))?;

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| SapienceError::internal(format!("AES key init failed: {e}")))?;
        let mut iv = [0u8; IV_LEN];
        rand::rngs::OsRng.fill_bytes(&mut iv);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_ref())
            .map_err(|e| SapienceError::internal(format!("AES-GCM encrypt failed: {e}")))?;

        let mut container =
            Vec::with_capacity(CONTAINER_MAGIC.len() + IV_LEN + ciphertext.len());
        container.extend_from_slice(CONTAINER_MAGIC);
        container.extend_from_slice(&iv);
        container.extend_from_slice(&ciphertext);
        tracing::debug!(bytes = container.len(), "project container encrypted");
        Ok(container)
    }

    /// Decrypts and parses a container.
    ///
    /// # Errors
    ///
    /// - `Decryption` if the container is truncated or the authentication
    ///   tag does not verify (wrong key or corrupted bytes)
    /// - `MalformedDocument` if decryption succeeds but the plaintext is
    ///   not a valid project document
    pub fn decrypt(container: &[u8], key: &SessionKey) -> Result<ProjectDocument> {
        let body = container
            .strip_prefix(CONTAINER_MAGIC.as_slice())
            .unwrap_or(container);
        if body.len() < IV_LEN + TAG_LEN {
            return Err(SapienceError::decryption("Container too short"));
        }
        let (iv, ciphertext) = body.split_at(IV_LEN);

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| SapienceError::internal(format!("AES key init failed: {e}")))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(iv), ciphertext)
            .map_err(|_| SapienceError::decryption("Authentication failed"))?;

        let document: ProjectDocument = serde_json::from_slice(&plaintext)?;
        Ok(document)
    }

    /// Replays a decrypted document into the workspace.
    pub fn deserialize<P: Presenter>(
        document: ProjectDocument,
        ws: &mut Workspace,
        wm: &mut WindowManager<P>,
    ) -> Result<()> {
        document.apply(ws, wm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KEY_LEN;

    fn key(byte: u8) -> SessionKey {
        SessionKey::from_bytes([byte; KEY_LEN])
    }

    fn empty_document() -> ProjectDocument {
        ProjectDocument {
            dataset: None,
            windows: Vec::new(),
        }
    }

    #[test]
    fn encrypt_then_decrypt_round_trips_empty_document() {
        let doc = empty_document();
        let container = ProjectCodec::encrypt(&doc, &key(1)).unwrap();
        let back = ProjectCodec::decrypt(&container, &key(1)).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn container_carries_magic_prefix_and_fresh_iv() {
        let doc = empty_document();
        let a = ProjectCodec::encrypt(&doc, &key(1)).unwrap();
        let b = ProjectCodec::encrypt(&doc, &key(1)).unwrap();
        assert!(a.starts_with(CONTAINER_MAGIC));
        // Fresh random IV per export.
        assert_ne!(
            a[CONTAINER_MAGIC.len()..CONTAINER_MAGIC.len() + IV_LEN],
            b[CONTAINER_MAGIC.len()..CONTAINER_MAGIC.len() + IV_LEN]
        );
    }

    #[test]
    fn bare_legacy_container_is_accepted() {
        let doc = empty_document();
        let container = ProjectCodec::encrypt(&doc, &key(1)).unwrap();
        let bare = container[CONTAINER_MAGIC.len()..].to_vec();
        let back = ProjectCodec::decrypt(&bare, &key(1)).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn wrong_key_fails_with_decryption_error() {
        let container = ProjectCodec::encrypt(&empty_document(), &key(1)).unwrap();
        let err = ProjectCodec::decrypt(&container, &key(2)).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn corrupted_ciphertext_fails_with_decryption_error() {
        let mut container = ProjectCodec::encrypt(&empty_document(), &key(1)).unwrap();
        let last = container.len() - 1;
        container[last] ^= 0xFF;
        let err = ProjectCodec::decrypt(&container, &key(1)).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn truncated_container_fails_with_decryption_error() {
        let err = ProjectCodec::decrypt(b"SSPROJ01short", &key(1)).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn valid_decryption_of_non_document_is_malformed() {
        // Encrypt raw JSON that is not a project document.
        let cipher = Aes256Gcm::new_from_slice(key(1).as_bytes()).unwrap();
        let iv = [7u8; IV_LEN];
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), b"[1,2,3]".as_ref())
            .unwrap();
        let mut container = CONTAINER_MAGIC.to_vec();
        container.extend_from_slice(&iv);
        container.extend_from_slice(&ciphertext);

        let err = ProjectCodec::decrypt(&container, &key(1)).unwrap_err();
        assert!(matches!(err, SapienceError::MalformedDocument(_)));
    }
}
