//! The job processor: a single background worker draining the queue.
//!
//! One processor instance owns one run at a time. The caller stages job ids
//! while idle, then `start()` snapshots the staged queue and spawns the
//! worker task. Cancellation is cooperative: a token checked between jobs,
//! never preempting an in-flight pipeline call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use swapbatch_core::validation::validate_runnable;
use swapbatch_core::{naming, JobId};
use swapbatch_events::{BatchEvent, JobOutcome, Notifier};
use swapbatch_store::{JobStore, StoreError};

use crate::error::SchedulerError;
use crate::pipeline::Pipeline;
use crate::queue::JobQueue;

// ---------------------------------------------------------------------------
// Run state and progress
// ---------------------------------------------------------------------------

/// Lifecycle of a batch run: `Idle → Running → {Finished, Cancelling → Finished}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Cancelling,
    Finished,
}

impl RunState {
    /// True while a worker task is (or may still be) draining the queue.
    fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Cancelling)
    }
}

/// Point-in-time progress counters for the current or last run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Jobs in the run snapshot taken at `start()`.
    pub total: usize,
    /// Jobs that reached a terminal outcome so far.
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Answer to [`JobProcessor::query_state`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunStatus {
    pub state: RunState,
    pub progress: Progress,
}

// ---------------------------------------------------------------------------
// JobProcessor
// ---------------------------------------------------------------------------

struct Inner {
    store: Arc<JobStore>,
    pipeline: Arc<dyn Pipeline>,
    notifier: Arc<Notifier>,

    state: Mutex<RunState>,
    /// Jobs staged for the next run. Only mutable while no run is active.
    staged: Mutex<JobQueue>,
    /// Token for the current run; replaced on every `start()`.
    cancel: Mutex<CancellationToken>,

    total: AtomicUsize,
    completed: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,

    handle: Mutex<Option<JoinHandle<()>>>,
}

/// The scheduling core. Share one instance via `Arc` between the UI and
/// whatever owns the runtime; there is no process-wide singleton.
pub struct JobProcessor {
    inner: Arc<Inner>,
}

impl JobProcessor {
    pub fn new(store: Arc<JobStore>, pipeline: Arc<dyn Pipeline>, notifier: Arc<Notifier>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                pipeline,
                notifier,
                state: Mutex::new(RunState::Idle),
                staged: Mutex::new(JobQueue::new()),
                cancel: Mutex::new(CancellationToken::new()),
                total: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                succeeded: AtomicUsize::new(0),
                failed: AtomicUsize::new(0),
                handle: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to the run's event stream.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BatchEvent> {
        self.inner.notifier.subscribe()
    }

    // -- staging ------------------------------------------------------------

    /// Stage a job for the next run.
    ///
    /// Returns whether the id was added (`false` means it was already
    /// staged). Rejected with [`SchedulerError::BatchActive`] while a run is
    /// active: the FIFO snapshot taken at `start()` is semantically closed.
    pub fn enqueue(&self, id: JobId) -> Result<bool, SchedulerError> {
        // The staged mutation happens under the state lock so a concurrent
        // start() cannot slip between the idle check and the enqueue.
        let state = self.inner.state.lock().expect("state lock");
        if state.is_active() {
            return Err(SchedulerError::BatchActive);
        }
        Ok(self.inner.staged.lock().expect("staged lock").enqueue(id))
    }

    /// Drop all staged jobs. Invalid while a run is active.
    pub fn clear_queue(&self) -> Result<(), SchedulerError> {
        let state = self.inner.state.lock().expect("state lock");
        if state.is_active() {
            return Err(SchedulerError::BatchActive);
        }
        self.inner.staged.lock().expect("staged lock").clear();
        Ok(())
    }

    /// Ordered copy of the currently staged ids, for UI display.
    pub fn queue_snapshot(&self) -> Vec<JobId> {
        self.inner.staged.lock().expect("staged lock").snapshot()
    }

    // -- run control --------------------------------------------------------

    /// Start draining the staged queue on a background worker.
    ///
    /// Rejected with [`SchedulerError::AlreadyRunning`] while a run is
    /// active. An empty queue still produces a complete (empty) run, so the
    /// caller always gets its end-of-run event.
    pub fn start(&self) -> Result<(), SchedulerError> {
        self.begin_run(std::iter::empty())
    }

    /// Stage every pending job from the store (listing order), then start.
    pub fn start_all(&self) -> Result<(), SchedulerError> {
        let summaries = self.inner.store.list()?;
        self.begin_run(summaries.into_iter().map(|summary| summary.id))
    }

    /// Stage exactly `ids` (duplicates collapsed, order kept), then start.
    pub fn start_selected(
        &self,
        ids: impl IntoIterator<Item = JobId>,
    ) -> Result<(), SchedulerError> {
        self.begin_run(ids)
    }

    /// Transition `Idle` -> `Running`: stage `extra`, snapshot the queue,
    /// install a fresh cancellation token, reset the progress counters, and
    /// spawn the worker.
    ///
    /// The token swap and counter reset happen inside the state-lock critical
    /// section. A `cancel()` observing `Running` therefore always cancels the
    /// token belonging to this run, never a stale one from a finished run.
    fn begin_run(
        &self,
        extra: impl IntoIterator<Item = JobId>,
    ) -> Result<(), SchedulerError> {
        let (queue, token) = {
            let mut state = self.inner.state.lock().expect("state lock");
            if state.is_active() {
                return Err(SchedulerError::AlreadyRunning);
            }

            let queue = {
                let mut staged = self.inner.staged.lock().expect("staged lock");
                for id in extra {
                    staged.enqueue(id);
                }
                std::mem::take(&mut *staged)
            };

            let token = CancellationToken::new();
            *self.inner.cancel.lock().expect("cancel lock") = token.clone();

            self.inner.total.store(queue.len(), Ordering::Relaxed);
            self.inner.completed.store(0, Ordering::Relaxed);
            self.inner.succeeded.store(0, Ordering::Relaxed);
            self.inner.failed.store(0, Ordering::Relaxed);

            *state = RunState::Running;
            (queue, token)
        };

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            Inner::run_loop(inner, queue, token).await;
        });
        *self.inner.handle.lock().expect("handle lock") = Some(handle);

        Ok(())
    }

    /// Request cooperative cancellation of the active run.
    ///
    /// The in-flight job is allowed to finish; no further job is dequeued.
    /// Safe to call from any thread; a no-op unless the state is `Running`.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock().expect("state lock");
        if *state == RunState::Running {
            *state = RunState::Cancelling;
            self.inner.cancel.lock().expect("cancel lock").cancel();
            tracing::info!("Batch cancellation requested");
        }
    }

    /// Current run state plus progress counters. Never blocks the worker.
    pub fn query_state(&self) -> RunStatus {
        RunStatus {
            state: *self.inner.state.lock().expect("state lock"),
            progress: Progress {
                total: self.inner.total.load(Ordering::Relaxed),
                completed: self.inner.completed.load(Ordering::Relaxed),
                succeeded: self.inner.succeeded.load(Ordering::Relaxed),
                failed: self.inner.failed.load(Ordering::Relaxed),
            },
        }
    }

    /// Wait for the active run's worker task to terminate.
    pub async fn wait(&self) {
        let handle = self.inner.handle.lock().expect("handle lock").take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

// ---------------------------------------------------------------------------
// Worker loop
// ---------------------------------------------------------------------------

impl Inner {
    async fn run_loop(inner: Arc<Inner>, mut queue: JobQueue, cancel: CancellationToken) {
        let total = queue.len();
        tracing::info!(total, "Batch run started");
        inner.notifier.publish(BatchEvent::RunStarted { total });

        let mut index = 0usize;
        let mut cancelled = false;

        loop {
            // Cancellation is only honored between jobs; an in-flight
            // pipeline call always runs to a terminal outcome first.
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let Some(id) = queue.dequeue_next() else {
                break;
            };

            inner.notifier.publish(BatchEvent::JobStarted {
                id: id.clone(),
                index,
            });
            tracing::info!(job_id = %id, index, "Job started");

            let outcome = inner.run_one(&id).await;

            inner.completed.fetch_add(1, Ordering::Relaxed);
            if outcome.is_success() {
                inner.succeeded.fetch_add(1, Ordering::Relaxed);
            } else {
                inner.failed.fetch_add(1, Ordering::Relaxed);
            }

            inner
                .notifier
                .publish(BatchEvent::JobFinished { id, outcome });
            index += 1;
        }

        let succeeded = inner.succeeded.load(Ordering::Relaxed);
        let failed = inner.failed.load(Ordering::Relaxed);
        *inner.state.lock().expect("state lock") = RunState::Finished;

        tracing::info!(succeeded, failed, cancelled, "Batch run finished");
        inner.notifier.publish(BatchEvent::RunFinished {
            succeeded,
            failed,
            cancelled,
        });
    }

    /// Execute one job to a terminal outcome. Never propagates an error:
    /// one bad job must not end the batch.
    async fn run_one(&self, id: &JobId) -> JobOutcome {
        let record = match self.store.load(id) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(job_id = %id, error = %e, "Failed to load job");
                return JobOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if let Err(e) = validate_runnable(&record.workspace) {
            tracing::warn!(job_id = %id, error = %e, "Job is not runnable, skipping");
            return JobOutcome::Skipped {
                reason: e.to_string(),
            };
        }

        let output_base_name = naming::output_base_name(&record).map(str::to_owned);
        let started = Instant::now();

        match self
            .pipeline
            .process(&record.workspace, output_base_name.as_deref())
            .await
        {
            Ok(output) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match self.store.mark_completed(id) {
                    Ok(()) => JobOutcome::Success {
                        output_path: output.output_path,
                        elapsed_ms,
                    },
                    Err(e @ StoreError::NotFound(_)) => {
                        // The file vanished while the pipeline ran; the
                        // output exists but the job cannot be accounted for.
                        tracing::error!(job_id = %id, error = %e, "Job file disappeared mid-run");
                        JobOutcome::Failed {
                            reason: format!("Job finished but its file is gone: {e}"),
                        }
                    }
                    Err(e) => {
                        tracing::error!(job_id = %id, error = %e, "Failed to relocate job file");
                        JobOutcome::Failed {
                            reason: format!("Job finished but could not be relocated: {e}"),
                        }
                    }
                }
            }
            Err(e) => {
                // Pipeline failure: the job file stays in pending storage.
                tracing::error!(job_id = %id, error = %e, "Pipeline failed");
                JobOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
