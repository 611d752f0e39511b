//! Filesystem-backed job repository.
//!
//! Jobs live as one JSON file each under a pending directory; successful
//! jobs are relocated (atomic rename) into a `completed/` sibling. The
//! directory scan and the rename *are* the storage engine — there is no
//! other persistence layer.

pub mod config;
pub mod error;
mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::{JobStore, OnCollision};
