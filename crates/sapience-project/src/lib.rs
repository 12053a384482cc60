//! Encrypted project persistence for the sapience workbench.
//!
//! A session (dataset, windows, checkpoint histories) is captured as a
//! [`document::ProjectDocument`], encrypted under a password-derived key
//! into an opaque container, and replayed back through the window manager
//! on import.

pub mod codec;
pub mod document;
pub mod key;
pub mod transfer;

pub use codec::{CONTAINER_MAGIC, IV_LEN, ProjectCodec};
pub use document::{DatasetRecord, ProjectDocument, WindowRecord};
pub use key::{KDF_ITERATIONS, KDF_SALT, KEY_LEN, KeyManager, SessionKey};
pub use transfer::{ImportOutcome, PasswordPrompt, export_project, import_project};
