//! Project document schema.
//!
//! The plain structured form a workspace is serialized to before
//! encryption. Field names are pinned to the wire format; changing them
//! would break previously exported projects.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use sapience_core::checkpoint::Checkpoint;
use sapience_core::dataset::{DatasetHandle, StatsMap};
use sapience_core::error::{Result, SapienceError};
use sapience_core::method::MethodKind;
use sapience_core::window::manager::{Presenter, WindowManager};
use sapience_core::window::model::{FieldMap, WindowId, WindowState};
use sapience_core::workspace::Workspace;

/// The whole exported session: dataset plus every live window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub dataset: Option<DatasetRecord>,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
}

/// Dataset handle on the wire; raw bytes travel base64-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub content: String,
    pub stats: StatsMap,
}

/// One window record, covering open, maximized and minimized windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    #[serde(rename = "modalId")]
    pub modal_id: String,
    #[serde(rename = "methodId")]
    pub method: MethodKind,
    pub state: WindowState,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(rename = "previewContent", default)]
    pub preview_content: String,
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
}

impl ProjectDocument {
    /// Captures the workspace as a plain document: open and maximized
    /// windows first, then the tray's minimized windows.
    pub fn from_workspace(ws: &Workspace) -> Self {
        let dataset = ws.dataset().map(|handle| DatasetRecord {
            file_name: handle.file_name.clone(),
            content: BASE64.encode(&handle.content),
            stats: handle.stats.clone(),
        });

        let mut windows = Vec::with_capacity(ws.window_count());
        let record = |w: &sapience_core::window::model::Window| WindowRecord {
            modal_id: w.id.to_string(),
            method: w.method,
            state: w.state,
            fields: w.fields.clone(),
            preview_content: w.preview_content.clone(),
            checkpoints: ws.checkpoints().history(&w.id).to_vec(),
        };
        for window in ws.windows().filter(|w| w.state != WindowState::Minimized) {
            windows.push(record(window));
        }
        for window in ws.windows().filter(|w| w.state == WindowState::Minimized) {
            windows.push(record(window));
        }

        Self { dataset, windows }
    }

    /// Replays the document into the workspace through the window manager.
    ///
    /// Existing windows are closed first, then the dataset is reattached
    /// and each recorded window is reopened, its fields and preview
    /// reapplied, its state re-entered (minimize is forced: duplicates
    /// were validated at save time) and its checkpoints replayed in
    /// original order with original timestamps. Analyses are not re-run.
    pub fn apply<P: Presenter>(self, ws: &mut Workspace, wm: &mut WindowManager<P>) -> Result<()> {
        // Decode before touching the workspace: a malformed document must
        // not leave a half-replaced session behind.
        let dataset = match self.dataset {
            Some(record) => {
                let content = BASE64.decode(record.content.as_bytes()).map_err(|e| {
                    SapienceError::malformed(format!("Invalid base64 dataset content: {e}"))
                })?;
                Some(DatasetHandle {
                    file_name: record.file_name,
                    content,
                    stats: record.stats,
                })
            }
            None => None,
        };

        let existing: Vec<WindowId> = ws.windows().map(|w| w.id.clone()).collect();
        for id in existing {
            wm.close(ws, &id);
        }
        ws.set_dataset(dataset);

        for record in self.windows {
            let id = WindowId::from(record.modal_id);
            if let Err(err) = wm.open(ws, record.method, Some(id.clone())) {
                tracing::warn!(window = %id, method = %record.method, %err, "skipping unopenable window during replay");
                continue;
            }
            wm.apply_fields(ws, &id, record.fields)?;
            wm.set_preview(ws, &id, record.preview_content)?;
            match record.state {
                WindowState::Open => {}
                WindowState::Minimized => {
                    if let Err(err) = wm.minimize(ws, &id, true) {
                        tracing::warn!(window = %id, %err, "could not re-minimize window during replay");
                    }
                }
                WindowState::Maximized => wm.toggle_maximize(ws, &id)?,
            }
            for checkpoint in &record.checkpoints {
                wm.replay_checkpoint(ws, &id, checkpoint);
            }
        }
        Ok(())
    }
}
