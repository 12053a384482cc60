//! Workspace state: the full set of windows plus the active dataset.
//!
//! The workspace owns every window, each window's checkpoint history, and
//! the z-order counter. It replaces the global registries of earlier
//! designs: window managers and codecs receive it explicitly.

use std::collections::BTreeMap;

use crate::checkpoint::CheckpointStore;
use crate::dataset::{DatasetHandle, DatasetProfiler};
use crate::error::{Result, SapienceError};
use crate::window::model::{Window, WindowId, WindowState};

/// One tray affordance: a view over a minimized window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrayEntry {
    pub window_id: WindowId,
    pub title: String,
}

/// The in-memory session state of the workbench.
#[derive(Debug, Default)]
pub struct Workspace {
    windows: BTreeMap<WindowId, Window>,
    checkpoints: CheckpointStore,
    dataset: Option<DatasetHandle>,
    /// Monotonic z-order counter; values are assigned once and never reused.
    next_z: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, id: &WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub(crate) fn window_mut(&mut self, id: &WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub(crate) fn insert_window(&mut self, window: Window) {
        self.windows.insert(window.id.clone(), window);
    }

    pub(crate) fn remove_window(&mut self, id: &WindowId) -> Option<Window> {
        self.windows.remove(id)
    }

    /// All live windows (open, minimized or maximized), in id order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn checkpoints_mut(&mut self) -> &mut CheckpointStore {
        &mut self.checkpoints
    }

    /// Hands out the next z-order value. Strictly increasing; ties cannot
    /// occur because assignment is serialized through this one counter.
    pub(crate) fn next_z_value(&mut self) -> u64 {
        self.next_z += 1;
        self.next_z
    }

    pub fn dataset(&self) -> Option<&DatasetHandle> {
        self.dataset.as_ref()
    }

    /// Column names of the attached dataset, if any.
    pub fn columns(&self) -> Vec<&str> {
        self.dataset
            .as_ref()
            .map(|d| d.columns().collect())
            .unwrap_or_default()
    }

    pub fn has_columns(&self) -> bool {
        self.dataset
            .as_ref()
            .is_some_and(|d| !d.stats.is_empty())
    }

    /// Profiles raw file bytes through the external profiler and attaches
    /// the dataset. Fails closed: a profiler error leaves any previously
    /// attached dataset in place.
    pub async fn attach_dataset(
        &mut self,
        file_name: impl Into<String>,
        content: Vec<u8>,
        profiler: &dyn DatasetProfiler,
    ) -> Result<()> {
        let file_name = file_name.into();
        let stats = profiler.profile(&file_name, &content).await?;
        tracing::info!(file = %file_name, columns = stats.len(), "dataset attached");
        self.dataset = Some(DatasetHandle {
            file_name,
            content,
            stats,
        });
        Ok(())
    }

    /// Replaces the dataset handle directly. Used by import replay, where
    /// the stats were already computed at save time.
    pub fn set_dataset(&mut self, dataset: Option<DatasetHandle>) {
        self.dataset = dataset;
    }

    /// The tray: one entry per minimized window.
    pub fn tray_entries(&self) -> Vec<TrayEntry> {
        self.windows
            .values()
            .filter(|w| w.state == WindowState::Minimized)
            .map(|w| TrayEntry {
                window_id: w.id.clone(),
                title: tray_title(w),
            })
            .collect()
    }

    /// Copies a checkpoint's config fields and output back onto the live
    /// window. History itself is untouched.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the window or checkpoint does not exist
    /// - `Validation` if the checkpoint carries no config fields
    pub fn restore_checkpoint(&mut self, window_id: &WindowId, checkpoint_id: &str) -> Result<()> {
        if !self.windows.contains_key(window_id) {
            return Err(SapienceError::not_found("window", window_id.as_str()));
        }
        let checkpoint = self
            .checkpoints
            .resolve_for_restore(window_id, checkpoint_id)?;
        let fields = checkpoint.config.fields.clone();
        let output = checkpoint.output_data.clone();

        let window = self
            .windows
            .get_mut(window_id)
            .expect("window presence checked above");
        window.fields = fields;
        window.preview_content = output;
        tracing::debug!(window = %window_id, checkpoint = checkpoint_id, "checkpoint restored");
        Ok(())
    }
}

/// Tray label for a minimized window: display name plus the chosen column.
pub fn tray_title(window: &Window) -> String {
    let column = window.chosen_column().unwrap_or_default();
    format!("{} ({})", window.method.display_name(), column)
}
