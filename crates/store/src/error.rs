use swapbatch_core::{CoreError, JobId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Job file for \"{id}\" is corrupt: {source}")]
    Corrupt {
        id: JobId,
        #[source]
        source: serde_json::Error,
    },

    #[error("A job named \"{0}\" already exists")]
    NameCollision(JobId),

    #[error("Invalid job name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidName(msg) => Self::InvalidName(msg),
            CoreError::Validation(msg) => Self::InvalidName(msg),
        }
    }
}
