//! The batch scheduling core: an ordered job queue drained one job at a
//! time by a single background worker.
//!
//! The worker loads each job from the store, validates it, hands it to the
//! external [`Pipeline`], relocates the job file on success, and reports
//! progress through the notifier. Failures are isolated per job; only queue
//! exhaustion or an explicit cancel ends a run.

pub mod error;
pub mod pipeline;
pub mod processor;
pub mod queue;

pub use error::SchedulerError;
pub use pipeline::{Pipeline, PipelineError, PipelineOutput};
pub use processor::{JobProcessor, Progress, RunState, RunStatus};
pub use queue::JobQueue;
