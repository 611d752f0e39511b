//! Shared job types, codec, naming, and runnability validation.
//!
//! Everything in this crate is pure data plus local filesystem probes;
//! the store and scheduler crates build on top of it.

pub mod error;
pub mod job;
pub mod naming;
pub mod validation;

pub use error::CoreError;
pub use job::{EmbeddingRef, FaceRef, JobId, JobRecord, JobSummary, MediaRef, WorkspaceConfig};
