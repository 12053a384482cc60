//! Project export and import.
//!
//! Export requires a session password to have been set. Import first tries
//! the current session key; if authentication fails (the container was
//! exported under a different password) the user is asked for that password
//! once. A key derived from the supplied password replaces the session key
//! only after it has decrypted and parsed the container successfully.

use async_trait::async_trait;

use sapience_core::error::{Result, SapienceError};
use sapience_core::window::manager::{Presenter, WindowManager};
use sapience_core::workspace::Workspace;

use crate::codec::ProjectCodec;
use crate::key::KeyManager;

/// Asks the user for the password a foreign container was exported under.
/// `None` means the user declined.
#[async_trait]
pub trait PasswordPrompt: Send + Sync {
    async fn request_password(&self) -> Option<String>;
}

/// How an import attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    Cancelled,
}

/// Encrypts the current workspace into a portable container.
pub fn export_project(ws: &Workspace, keys: &KeyManager) -> Result<Vec<u8>> {
    let key = keys
        .session_key()
        .ok_or_else(|| SapienceError::validation("No session password has been set"))?;
    let document = ProjectCodec::serialize(ws);
    let container = ProjectCodec::encrypt(&document, key)?;
    tracing::info!(
        windows = document.windows.len(),
        bytes = container.len(),
        "project exported"
    );
    Ok(container)
}

/// Decrypts a container and replays it into the workspace.
///
/// If the current session key fails to authenticate the container (or no
/// password has been set yet), the prompt is asked for the export password.
/// The recovery attempt is made exactly once; a second authentication
/// failure is returned as `Decryption`. Cancelling the prompt leaves the
/// workspace and session key untouched.
pub async fn import_project<P, Q>(
    ws: &mut Workspace,
    wm: &mut WindowManager<P>,
    keys: &mut KeyManager,
    prompt: &Q,
    container: &[u8],
) -> Result<ImportOutcome>
where
    P: Presenter,
    Q: PasswordPrompt,
{
    let first_attempt = match keys.session_key() {
        Some(key) => match ProjectCodec::decrypt(container, key) {
            Ok(document) => Some(document),
            Err(err) if err.is_decryption() => {
                tracing::info!("session key did not match container, asking for its password");
                None
            }
            // A parse failure after successful decryption is not a
            // password problem; another password will not fix it.
            Err(err) => return Err(err),
        },
        None => None,
    };

    let document = match first_attempt {
        Some(document) => document,
        None => {
            let Some(password) = prompt.request_password().await else {
                tracing::info!("project import cancelled");
                return Ok(ImportOutcome::Cancelled);
            };
            let candidate = KeyManager::derive_key(&password).await?;
            let document = ProjectCodec::decrypt(container, &candidate)?;
            keys.install(candidate);
            document
        }
    };

    let windows = document.windows.len();
    ProjectCodec::deserialize(document, ws, wm)?;
    tracing::info!(windows, "project imported");
    Ok(ImportOutcome::Imported)
}
