//! Window model and lifecycle management.

pub mod manager;
pub mod model;

pub use manager::{NullPresenter, Presenter, WindowManager};
pub use model::{FieldMap, FieldValue, Geometry, Window, WindowId, WindowState};
