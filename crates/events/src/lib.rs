//! Batch run events and the in-process notifier.
//!
//! The scheduler publishes [`BatchEvent`]s here; the host UI subscribes and
//! renders progress without ever touching the store or queue directly.

pub mod bus;
pub mod event;

pub use bus::Notifier;
pub use event::{BatchEvent, JobOutcome};
