//! Per-window checkpoint history.
//!
//! Checkpoints are immutable, timestamped snapshots of a window's
//! configuration and rendered result. History is append-only: nothing in
//! scope deletes or reorders checkpoints until the owning window is closed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SapienceError};
use crate::method::MethodKind;
use crate::window::model::{FieldMap, WindowId};

/// Configuration snapshot captured when a checkpoint is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    #[serde(rename = "methodId")]
    pub method: MethodKind,
    #[serde(default)]
    pub fields: FieldMap,
}

/// An immutable snapshot of a window's configuration and result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Derived deterministically from the window id and creation timestamp.
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub config: CheckpointConfig,
    /// Opaque rendered-result blob.
    #[serde(rename = "outputData")]
    pub output_data: String,
}

impl Checkpoint {
    /// The deterministic checkpoint id for a window/timestamp pair.
    pub fn derive_id(window_id: &WindowId, timestamp: i64) -> String {
        format!("{window_id}-checkpoint-{timestamp}")
    }
}

/// Append-only checkpoint history, keyed by window id.
///
/// The history record for a window is initialized lazily on first append,
/// so checkpoints can be replayed before the rest of the window record is
/// known (import replays rely on this).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckpointStore {
    histories: BTreeMap<WindowId, Vec<Checkpoint>>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a checkpoint with the current wall-clock timestamp.
    pub fn create(
        &mut self,
        window_id: &WindowId,
        config: CheckpointConfig,
        output_data: String,
    ) -> &Checkpoint {
        let timestamp = chrono::Utc::now().timestamp_millis();
        self.create_at(window_id, config, output_data, timestamp)
    }

    /// Appends a checkpoint with an explicit timestamp. The id is derived
    /// from the window and timestamp. Insertion order is preserved as
    /// history order.
    pub fn create_at(
        &mut self,
        window_id: &WindowId,
        config: CheckpointConfig,
        output_data: String,
        timestamp: i64,
    ) -> &Checkpoint {
        let checkpoint = Checkpoint {
            id: Checkpoint::derive_id(window_id, timestamp),
            timestamp,
            config,
            output_data,
        };
        self.replay(window_id, checkpoint)
    }

    /// Appends a persisted checkpoint verbatim, keeping its recorded id
    /// and timestamp even when the id does not follow the derivation
    /// scheme. Used by import replay.
    pub fn replay(&mut self, window_id: &WindowId, checkpoint: Checkpoint) -> &Checkpoint {
        let history = self.histories.entry(window_id.clone()).or_default();
        history.push(checkpoint);
        history.last().expect("just pushed")
    }

    /// The checkpoint history for a window, oldest first.
    pub fn history(&self, window_id: &WindowId) -> &[Checkpoint] {
        self.histories
            .get(window_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up a checkpoint by id within one window's history.
    pub fn find(&self, window_id: &WindowId, checkpoint_id: &str) -> Option<&Checkpoint> {
        self.history(window_id)
            .iter()
            .find(|cp| cp.id == checkpoint_id)
    }

    /// Resolves a checkpoint for restoring, validating it is usable.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no checkpoint with that id exists for the window
    /// - `Validation` if the checkpoint's config carries no fields
    pub fn resolve_for_restore(
        &self,
        window_id: &WindowId,
        checkpoint_id: &str,
    ) -> Result<&Checkpoint> {
        let checkpoint = self
            .find(window_id, checkpoint_id)
            .ok_or_else(|| SapienceError::not_found("checkpoint", checkpoint_id))?;
        if checkpoint.config.fields.is_empty() {
            return Err(SapienceError::validation(
                "Invalid checkpoint configuration",
            ));
        }
        Ok(checkpoint)
    }

    /// Drops the entire history of a window. Called only when the window
    /// is closed.
    pub fn remove_window(&mut self, window_id: &WindowId) {
        self.histories.remove(window_id);
    }
}
