use swapbatch_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("A batch run is already active")]
    AlreadyRunning,

    #[error("The queue cannot be modified while a batch run is active")]
    BatchActive,

    #[error(transparent)]
    Store(#[from] StoreError),
}
