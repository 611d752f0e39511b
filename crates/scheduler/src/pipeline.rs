//! The seam to the external processing pipeline.
//!
//! The real pipeline (decode, detect, swap, encode) lives in the host
//! application; this crate only defines the contract the worker calls. The
//! call may take seconds to hours and is the worker's single long
//! suspension point.

use async_trait::async_trait;
use swapbatch_core::WorkspaceConfig;

/// Result of a successful pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Path of the produced artifact, when the pipeline reports one.
    pub output_path: Option<String>,
}

/// Error reported by the pipeline for a single job.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Pipeline failed: {0}")]
    Failed(String),
}

/// Executes one workspace configuration to completion.
///
/// Implementations wrap whatever the host provides; a synchronous pipeline
/// should run itself under `tokio::task::spawn_blocking`. The worker never
/// aborts an in-flight call — cancellation waits for it to return.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Run the pipeline for one job.
    ///
    /// `output_base_name` is `Some(display_name)` when the job opted into
    /// name-based output, `None` to use the pipeline's default naming rule.
    async fn process(
        &self,
        workspace: &WorkspaceConfig,
        output_base_name: Option<&str>,
    ) -> Result<PipelineOutput, PipelineError>;
}
