//! Sapience core: the window/session-state model of the text-analysis
//! workbench.
//!
//! The workbench lets a user open multiple independent analysis windows
//! over one dataset. Each window holds its own configuration, result
//! preview and checkpoint history; the whole session can be exported to an
//! encrypted project container (see the `sapience-project` crate).

pub mod analysis;
pub mod checkpoint;
pub mod dataset;
pub mod error;
pub mod method;
pub mod window;
pub mod workspace;

// Re-export common error type
pub use error::SapienceError;
