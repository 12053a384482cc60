//! Window domain model.
//!
//! A window is one independent analysis configuration plus its result
//! surface. The persisted state (`fields`, `preview_content`) is the source
//! of truth; the presentation is a transient view rebuilt from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::method::MethodKind;

/// Field name holding the dataset column a window operates on.
pub const TEXT_COLUMN_FIELD: &str = "textColumn";

/// Opaque unique window identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    /// Mints a fresh globally unique id for a window of the given method.
    pub fn fresh(method: MethodKind) -> Self {
        Self(format!("{}-{}", method.id(), Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WindowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed form-field value. Numeric parameters travel as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Field name to value, in stable order.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Lifecycle state of a window. Closed windows do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Open,
    Minimized,
    Maximized,
}

/// Position and size of a window surface. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 640.0,
            height: 480.0,
        }
    }
}

/// One analysis window owned by the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Globally unique for the lifetime of the workspace.
    pub id: WindowId,
    pub method: MethodKind,
    pub state: WindowState,
    /// Current form-field values, keyed by field name.
    pub fields: FieldMap,
    /// Opaque rendered-result blob from the last run (or restore).
    pub preview_content: String,
    /// Live surface geometry. Not persisted.
    pub geometry: Geometry,
    /// Geometry captured when maximizing, restored on un-maximize.
    pub saved_geometry: Option<Geometry>,
    /// Z-order value; higher is in front. Assigned by the manager.
    pub z_order: u64,
}

impl Window {
    pub fn new(id: WindowId, method: MethodKind, z_order: u64) -> Self {
        Self {
            id,
            method,
            state: WindowState::Open,
            fields: FieldMap::new(),
            preview_content: String::new(),
            geometry: Geometry::default(),
            saved_geometry: None,
            z_order,
        }
    }

    /// The dataset column this window operates on, derived from `fields`.
    ///
    /// Returns `None` when unset, empty, or not a text value.
    pub fn chosen_column(&self) -> Option<&str> {
        self.fields
            .get(TEXT_COLUMN_FIELD)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|col| !col.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique_and_method_prefixed() {
        let a = WindowId::fresh(MethodKind::TfIdf);
        let b = WindowId::fresh(MethodKind::TfIdf);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tfidf-"));
    }

    #[test]
    fn field_values_serialize_untagged() {
        let mut fields = FieldMap::new();
        fields.insert("stopwords".into(), FieldValue::Flag(true));
        fields.insert("maxWords".into(), FieldValue::Text("500".into()));
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["stopwords"], true);
        assert_eq!(json["maxWords"], "500");
        let back: FieldMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn chosen_column_requires_non_empty_text() {
        let mut window = Window::new(WindowId::from("w-1"), MethodKind::Frequency, 1);
        assert_eq!(window.chosen_column(), None);

        window.fields.insert(TEXT_COLUMN_FIELD.into(), "  ".into());
        assert_eq!(window.chosen_column(), None);

        window
            .fields
            .insert(TEXT_COLUMN_FIELD.into(), "review".into());
        assert_eq!(window.chosen_column(), Some("review"));
    }

    #[test]
    fn window_state_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&WindowState::Minimized).unwrap(),
            "\"minimized\""
        );
        let state: WindowState = serde_json::from_str("\"maximized\"").unwrap();
        assert_eq!(state, WindowState::Maximized);
    }
}
