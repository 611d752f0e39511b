//! Batch lifecycle event types.
//!
//! Events are serde-tagged so a host can forward them verbatim over its own
//! transport (WebSocket, queued UI event, ...) as `{"type": "job_started", ...}`
//! messages.

use serde::{Deserialize, Serialize};
use swapbatch_core::JobId;

/// Terminal outcome of one job within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The pipeline finished and the job file was moved to the completed
    /// store.
    Success {
        /// Output artifact path, when the pipeline reported one.
        output_path: Option<String>,
        /// Wall-clock pipeline time.
        elapsed_ms: u64,
    },
    /// The job could not be loaded, or the pipeline reported an error.
    /// The job file stays in the pending store.
    Failed { reason: String },
    /// The job loaded but failed runnability validation and was never
    /// handed to the pipeline.
    Skipped { reason: String },
}

impl JobOutcome {
    /// True for `Success`, false for `Failed` and `Skipped`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Events emitted by the job processor over one batch run.
///
/// Delivery is ordered and at-least-once per event kind per job; receivers
/// must tolerate a duplicate `JobFinished` for the same id without
/// double-counting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A run began draining a queue of `total` jobs.
    RunStarted { total: usize },

    /// The worker picked up the job at position `index` (0-based) in the
    /// run snapshot.
    JobStarted { id: JobId, index: usize },

    /// The job reached a terminal outcome.
    JobFinished { id: JobId, outcome: JobOutcome },

    /// The run terminated. Emitted exactly once per run, cancelled or not,
    /// even when every job failed.
    RunFinished {
        succeeded: usize,
        failed: usize,
        cancelled: bool,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = BatchEvent::JobStarted {
            id: JobId::new("clip"),
            index: 0,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "job_started");
        assert_eq!(json["id"], "clip");
        assert_eq!(json["index"], 0);
    }

    #[test]
    fn outcome_serializes_with_result_tag() {
        let event = BatchEvent::JobFinished {
            id: JobId::new("clip"),
            outcome: JobOutcome::Failed {
                reason: "pipeline exploded".into(),
            },
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "job_finished");
        assert_eq!(json["outcome"]["result"], "failed");
        assert_eq!(json["outcome"]["reason"], "pipeline exploded");
    }

    #[test]
    fn run_finished_round_trips() {
        let event = BatchEvent::RunFinished {
            succeeded: 2,
            failed: 1,
            cancelled: true,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let parsed: BatchEvent = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, event);
    }

    #[test]
    fn outcome_success_classification() {
        let ok = JobOutcome::Success {
            output_path: None,
            elapsed_ms: 10,
        };
        assert!(ok.is_success());
        assert!(!JobOutcome::Skipped { reason: "x".into() }.is_success());
        assert!(!JobOutcome::Failed { reason: "x".into() }.is_success());
    }
}
