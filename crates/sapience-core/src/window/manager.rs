//! Window lifecycle state machine.
//!
//! The manager drives all window transitions and keeps the presentation
//! surface in sync with workspace state. State is the source of truth: the
//! surface is rebuilt from a `Window` record through one shared path on
//! both open and tray restore.

use crate::checkpoint::Checkpoint;
use crate::error::{Result, SapienceError};
use crate::method::MethodKind;
use crate::window::model::{FieldMap, FieldValue, Window, WindowId, WindowState};
use crate::workspace::{Workspace, tray_title};

/// The live presentation surface the manager drives.
///
/// Implementations render windows and tray affordances; the core never
/// reads state back out of them. A presenter may refuse a method by
/// reporting no template for it.
pub trait Presenter {
    /// Whether a presentation template exists for the method.
    fn has_template(&self, method: MethodKind) -> bool {
        method.template_name().is_some()
    }

    /// Builds (or rebuilds) the surface for a window from its record.
    /// Shared between open and tray restore.
    fn present(&mut self, window: &Window, checkpoints: &[Checkpoint]);

    /// Removes the surface of a window (close or minimize).
    fn remove(&mut self, window_id: &WindowId);

    /// Reapplies a window's fields, preview and geometry to an existing
    /// surface.
    fn refresh(&mut self, window: &Window);

    /// Adds one checkpoint affordance to a presented window.
    fn attach_checkpoint(&mut self, window_id: &WindowId, checkpoint: &Checkpoint);

    /// Adds a tray affordance for a minimized window.
    fn tray_insert(&mut self, window_id: &WindowId, title: &str);

    /// Removes a window's tray affordance.
    fn tray_remove(&mut self, window_id: &WindowId);

    /// Raises a window to the given z-order value.
    fn raise(&mut self, window_id: &WindowId, z_order: u64);
}

/// Owns the presenter and applies lifecycle transitions to a workspace.
pub struct WindowManager<P: Presenter> {
    presenter: P,
}

impl<P: Presenter> WindowManager<P> {
    pub fn new(presenter: P) -> Self {
        Self { presenter }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Opens a window for a method, or re-attaches an existing one by id.
    ///
    /// Fails if the method has no presentation template or no dataset
    /// columns are available. A fresh top z-order value is assigned either
    /// way.
    pub fn open(
        &mut self,
        ws: &mut Workspace,
        method: MethodKind,
        existing_id: Option<WindowId>,
    ) -> Result<WindowId> {
        if !self.presenter.has_template(method) {
            return Err(SapienceError::validation(format!(
                "No presentation template for method '{method}'"
            )));
        }
        if !ws.has_columns() {
            return Err(SapienceError::validation(
                "No dataset columns available; upload a dataset first",
            ));
        }

        if let Some(id) = existing_id.as_ref().filter(|id| ws.window(id).is_some()) {
            // Re-attach: rebuild the surface for the known record.
            let z = ws.next_z_value();
            let window = ws.window_mut(id).expect("checked above");
            window.z_order = z;
            let window = ws.window(id).expect("checked above").clone();
            self.presenter.present(&window, ws.checkpoints().history(id));
            return Ok(id.clone());
        }

        let id = existing_id.unwrap_or_else(|| WindowId::fresh(method));
        let z = ws.next_z_value();
        let window = Window::new(id.clone(), method, z);
        self.presenter.present(&window, &[]);
        ws.insert_window(window);
        tracing::debug!(window = %id, %method, "window opened");
        Ok(id)
    }

    /// Closes a window, irrevocably dropping its checkpoints and tray
    /// affordance. No-op if the id is unknown.
    pub fn close(&mut self, ws: &mut Workspace, id: &WindowId) {
        let Some(window) = ws.remove_window(id) else {
            return;
        };
        if window.state == WindowState::Minimized {
            self.presenter.tray_remove(id);
        }
        self.presenter.remove(id);
        ws.checkpoints_mut().remove_window(id);
        tracing::debug!(window = %id, "window closed");
    }

    /// Minimizes an open window into the tray.
    ///
    /// Requires a chosen column, and rejects a duplicate
    /// (method, column) tray entry unless `force` is set. `force` is used
    /// only when replaying a persisted session, where duplicates were
    /// already validated at save time.
    pub fn minimize(&mut self, ws: &mut Workspace, id: &WindowId, force: bool) -> Result<()> {
        let window = ws
            .window(id)
            .ok_or_else(|| SapienceError::not_found("window", id.as_str()))?;
        if window.state != WindowState::Open {
            return Err(SapienceError::validation(
                "Only an open window can be minimized",
            ));
        }
        let Some(column) = window.chosen_column().map(str::to_owned) else {
            return Err(SapienceError::validation(
                "Please select a text column before minimizing",
            ));
        };
        let method = window.method;

        if !force {
            let duplicate = ws.windows().any(|other| {
                other.id != *id
                    && other.state == WindowState::Minimized
                    && other.method == method
                    && other.chosen_column() == Some(column.as_str())
            });
            if duplicate {
                return Err(SapienceError::DuplicateTray { method, column });
            }
        }

        let window = ws.window_mut(id).expect("looked up above");
        window.state = WindowState::Minimized;
        let title = tray_title(window);
        self.presenter.remove(id);
        self.presenter.tray_insert(id, &title);
        tracing::debug!(window = %id, column = %column, "window minimized");
        Ok(())
    }

    /// Restores a minimized window from the tray, rebuilding its surface
    /// from stored state and bringing it to the front.
    pub fn restore_from_tray(&mut self, ws: &mut Workspace, id: &WindowId) -> Result<()> {
        let state = ws
            .window(id)
            .map(|w| w.state)
            .ok_or_else(|| SapienceError::not_found("minimized window", id.as_str()))?;
        if state != WindowState::Minimized {
            return Err(SapienceError::not_found("minimized window", id.as_str()));
        }

        let z = ws.next_z_value();
        let window = ws.window_mut(id).expect("looked up above");
        window.state = WindowState::Open;
        window.z_order = z;
        self.presenter.tray_remove(id);
        let window = ws.window(id).expect("looked up above").clone();
        self.presenter.present(&window, ws.checkpoints().history(id));
        self.presenter.raise(id, z);
        tracing::debug!(window = %id, "window restored from tray");
        Ok(())
    }

    /// Toggles between Open and Maximized, saving and restoring geometry.
    /// Pure geometry and state-flag change; fields and checkpoints are
    /// untouched. Unreachable from Minimized.
    pub fn toggle_maximize(&mut self, ws: &mut Workspace, id: &WindowId) -> Result<()> {
        let window = ws
            .window_mut(id)
            .ok_or_else(|| SapienceError::not_found("window", id.as_str()))?;
        match window.state {
            WindowState::Open => {
                window.saved_geometry = Some(window.geometry);
                window.state = WindowState::Maximized;
            }
            WindowState::Maximized => {
                window.geometry = window.saved_geometry.take().unwrap_or_default();
                window.state = WindowState::Open;
            }
            WindowState::Minimized => {
                return Err(SapienceError::validation(
                    "A minimized window must be restored before maximizing",
                ));
            }
        }
        let window = ws.window(id).expect("looked up above").clone();
        self.presenter.refresh(&window);
        Ok(())
    }

    /// Assigns the window the next z-order value. No-op if unknown.
    pub fn bring_to_front(&mut self, ws: &mut Workspace, id: &WindowId) {
        if ws.window(id).is_none() {
            return;
        }
        let z = ws.next_z_value();
        let window = ws.window_mut(id).expect("checked above");
        window.z_order = z;
        self.presenter.raise(id, z);
    }

    /// Sets one form field on a window and refreshes its surface.
    pub fn set_field(
        &mut self,
        ws: &mut Workspace,
        id: &WindowId,
        name: impl Into<String>,
        value: FieldValue,
    ) -> Result<()> {
        let window = ws
            .window_mut(id)
            .ok_or_else(|| SapienceError::not_found("window", id.as_str()))?;
        window.fields.insert(name.into(), value);
        let window = ws.window(id).expect("looked up above").clone();
        self.presenter.refresh(&window);
        Ok(())
    }

    /// Replaces a window's whole field map. Used by import replay.
    pub fn apply_fields(&mut self, ws: &mut Workspace, id: &WindowId, fields: FieldMap) -> Result<()> {
        let window = ws
            .window_mut(id)
            .ok_or_else(|| SapienceError::not_found("window", id.as_str()))?;
        window.fields = fields;
        let window = ws.window(id).expect("looked up above").clone();
        self.presenter.refresh(&window);
        Ok(())
    }

    /// Stores a rendered result on a window and refreshes its surface.
    pub fn set_preview(
        &mut self,
        ws: &mut Workspace,
        id: &WindowId,
        content: impl Into<String>,
    ) -> Result<()> {
        let window = ws
            .window_mut(id)
            .ok_or_else(|| SapienceError::not_found("window", id.as_str()))?;
        window.preview_content = content.into();
        let window = ws.window(id).expect("looked up above").clone();
        self.presenter.refresh(&window);
        Ok(())
    }

    /// Appends a replayed checkpoint verbatim and attaches its affordance.
    pub fn replay_checkpoint(&mut self, ws: &mut Workspace, id: &WindowId, checkpoint: &Checkpoint) {
        let replayed = ws.checkpoints_mut().replay(id, checkpoint.clone()).clone();
        self.presenter.attach_checkpoint(id, &replayed);
    }

    /// Restores a checkpoint onto the live window and refreshes its
    /// surface. History is untouched.
    pub fn restore_checkpoint(
        &mut self,
        ws: &mut Workspace,
        id: &WindowId,
        checkpoint_id: &str,
    ) -> Result<()> {
        ws.restore_checkpoint(id, checkpoint_id)?;
        let window = ws.window(id).expect("restore validated presence").clone();
        self.presenter.refresh(&window);
        Ok(())
    }

    /// Records a freshly created checkpoint on the presentation.
    pub fn attach_checkpoint(&mut self, id: &WindowId, checkpoint: &Checkpoint) {
        self.presenter.attach_checkpoint(id, checkpoint);
    }
}

/// Presenter that renders nothing. Useful for headless replay and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _window: &Window, _checkpoints: &[Checkpoint]) {}
    fn remove(&mut self, _window_id: &WindowId) {}
    fn refresh(&mut self, _window: &Window) {}
    fn attach_checkpoint(&mut self, _window_id: &WindowId, _checkpoint: &Checkpoint) {}
    fn tray_insert(&mut self, _window_id: &WindowId, _title: &str) {}
    fn tray_remove(&mut self, _window_id: &WindowId) {}
    fn raise(&mut self, _window_id: &WindowId, _z_order: u64) {}
}
