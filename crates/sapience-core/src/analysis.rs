//! Analysis collaborator contract and the run orchestration.
//!
//! The workbench never computes results itself. A run hands the window's
//! configuration and the dataset bytes to an external [`AnalysisService`]
//! and stores whatever payload comes back, verbatim, as the window preview
//! and a new checkpoint.

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointConfig;
use crate::error::{Result, SapienceError};
use crate::method::MethodKind;
use crate::window::manager::{Presenter, WindowManager};
use crate::window::model::{FieldMap, WindowId};
use crate::workspace::Workspace;

/// One request to the external analysis service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub method: MethodKind,
    /// Dataset column the window operates on.
    pub column: String,
    /// The window's full field map at run time.
    pub fields: FieldMap,
    pub file_name: String,
    /// Raw dataset bytes.
    pub content: Vec<u8>,
}

/// One row of a sentiment summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRow {
    pub label: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Structured result returned by the analysis service, tagged by kind.
///
/// Stored on windows and checkpoints as an opaque string payload so the
/// wire format stays renderer-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalysisOutput {
    /// Reference to a rendered image (word clouds, charts).
    Image { reference: String },
    /// Extracted topics, one summary string per topic.
    Topics { topics: Vec<String> },
    /// Sentiment summary table.
    Sentiment { rows: Vec<SentimentRow> },
}

impl AnalysisOutput {
    /// Serializes the output to the opaque payload stored on windows and
    /// checkpoints.
    pub fn to_payload(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SapienceError::internal(format!("Failed to encode analysis output: {e}")))
    }

    /// Decodes a stored payload back into structured form, when it is one.
    pub fn from_payload(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }
}

/// External collaborator that executes an analysis method.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn run(&self, request: AnalysisRequest) -> AnyResult<AnalysisOutput>;
}

/// Runs analyses against windows and records the results.
pub struct AnalysisRunner<S: AnalysisService> {
    service: S,
}

impl<S: AnalysisService> AnalysisRunner<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Executes the window's configured analysis.
    ///
    /// On success the rendered payload becomes the window's preview and a
    /// checkpoint snapshotting `(method, fields)` is appended. On any error
    /// the window and its history are unchanged.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the window does not exist
    /// - `Validation` if no column is chosen or no dataset is attached
    /// - `Internal` if the service fails
    pub async fn run<P: Presenter>(
        &self,
        ws: &mut Workspace,
        wm: &mut WindowManager<P>,
        id: &WindowId,
    ) -> Result<String> {
        let window = ws
            .window(id)
            .ok_or_else(|| SapienceError::not_found("window", id.as_str()))?;
        let column = window
            .chosen_column()
            .ok_or_else(|| SapienceError::validation("Please select a text column"))?
            .to_owned();
        let dataset = ws
            .dataset()
            .ok_or_else(|| SapienceError::validation("No dataset attached"))?;

        let request = AnalysisRequest {
            method: window.method,
            column,
            fields: window.fields.clone(),
            file_name: dataset.file_name.clone(),
            content: dataset.content.clone(),
        };
        let method = request.method;
        let config = CheckpointConfig {
            method,
            fields: request.fields.clone(),
        };

        tracing::info!(window = %id, %method, "running analysis");
        let output = self.service.run(request).await?;
        let payload = output.to_payload()?;

        wm.set_preview(ws, id, payload.clone())?;
        let checkpoint = ws
            .checkpoints_mut()
            .create(id, config, payload.clone())
            .clone();
        wm.attach_checkpoint(id, &checkpoint);
        Ok(payload)
    }
}
