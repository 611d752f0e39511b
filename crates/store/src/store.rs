//! The [`JobStore`]: list, load, save, relocate, and delete job files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swapbatch_core::naming::{sanitize_job_name, unique_stem};
use swapbatch_core::{JobId, JobRecord, JobSummary};

use crate::config::StoreConfig;
use crate::error::StoreError;

/// File extension for job documents.
const JOB_EXT: &str = "json";

/// Name of the completed-jobs subdirectory.
const COMPLETED_DIR: &str = "completed";

/// What `save` does when a job with the same stem already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCollision {
    /// Fail with [`StoreError::NameCollision`].
    Reject,
    /// Replace the existing pending file.
    Overwrite,
    /// Append `_1`, `_2`, ... until the stem is free.
    Suffix,
}

/// Filesystem-backed repository of pending and completed job files.
///
/// All side effects are confined to the two directories this store owns;
/// the pending→completed transition is a single atomic rename.
pub struct JobStore {
    pending_dir: PathBuf,
    completed_dir: PathBuf,
}

impl JobStore {
    /// Open (and create, if missing) a store rooted at `jobs_dir`.
    pub fn new(jobs_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let pending_dir = jobs_dir.into();
        let completed_dir = pending_dir.join(COMPLETED_DIR);
        fs::create_dir_all(&completed_dir)?;
        Ok(Self {
            pending_dir,
            completed_dir,
        })
    }

    /// Open a store from environment configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::new(&config.jobs_dir)
    }

    /// Directory holding pending job files.
    pub fn pending_dir(&self) -> &Path {
        &self.pending_dir
    }

    /// Directory completed job files are moved into.
    pub fn completed_dir(&self) -> &Path {
        &self.completed_dir
    }

    fn pending_path(&self, id: &JobId) -> PathBuf {
        self.pending_dir.join(format!("{id}.{JOB_EXT}"))
    }

    fn completed_path(&self, id: &JobId) -> PathBuf {
        self.completed_dir.join(format!("{id}.{JOB_EXT}"))
    }

    /// List summaries of all pending jobs, sorted by id.
    ///
    /// The directory is rescanned on every call, so the listing is always a
    /// fresh point-in-time view. Malformed or unreadable files are skipped
    /// with a warning; they never fail the listing.
    pub fn list(&self) -> Result<Vec<JobSummary>, StoreError> {
        let mut summaries = Vec::new();

        for entry in fs::read_dir(&self.pending_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(JOB_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let id = JobId::new(stem);

            match self.load(&id) {
                Ok(record) => summaries.push(JobSummary {
                    id,
                    display_name: record.display_name,
                    created_at: record.created_at,
                }),
                Err(e) => {
                    tracing::warn!(job_id = %id, error = %e, "Skipping unreadable job file");
                }
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    /// Load the full record of a pending job.
    pub fn load(&self, id: &JobId) -> Result<JobRecord, StoreError> {
        let path = self.pending_path(id);
        let data = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(id.clone()),
            _ => StoreError::Io(e),
        })?;
        JobRecord::from_json(&data).map_err(|source| StoreError::Corrupt {
            id: id.clone(),
            source,
        })
    }

    /// Write a new pending job file and return its id.
    ///
    /// The file stem is derived from the record's display name; `on_collision`
    /// decides what happens when that stem is already taken. The write is
    /// atomic: the document lands in a temp file first and is renamed into
    /// place.
    pub fn save(&self, record: &JobRecord, on_collision: OnCollision) -> Result<JobId, StoreError> {
        let stem = sanitize_job_name(&record.display_name)?;

        let stem = match on_collision {
            OnCollision::Reject => {
                let id = JobId::new(stem.clone());
                if self.pending_path(&id).exists() {
                    return Err(StoreError::NameCollision(id));
                }
                stem
            }
            OnCollision::Overwrite => stem,
            OnCollision::Suffix => unique_stem(&stem, |candidate| {
                self.pending_path(&JobId::new(candidate)).exists()
            }),
        };

        let id = JobId::new(stem);
        let path = self.pending_path(&id);
        let tmp = path.with_extension(format!("{JOB_EXT}.tmp"));

        let json = record.to_json().map_err(|source| StoreError::Corrupt {
            id: id.clone(),
            source,
        })?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!(job_id = %id, path = %path.display(), "Job saved");
        Ok(id)
    }

    /// Atomically relocate a job file from pending to completed storage.
    ///
    /// Idempotent: if the file was already moved, a second call is a no-op.
    /// `NotFound` is returned only when the job exists in neither location.
    pub fn mark_completed(&self, id: &JobId) -> Result<(), StoreError> {
        let pending = self.pending_path(id);
        let completed = self.completed_path(id);

        match fs::rename(&pending, &completed) {
            Ok(()) => {
                tracing::info!(job_id = %id, "Job moved to completed store");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if completed.exists() {
                    // Already moved by an earlier call.
                    Ok(())
                } else {
                    Err(StoreError::NotFound(id.clone()))
                }
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Remove a pending job file.
    pub fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        match fs::remove_file(self.pending_path(id)) {
            Ok(()) => {
                tracing::debug!(job_id = %id, "Job deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
