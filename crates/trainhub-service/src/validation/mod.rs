//! The validation pipeline: gate decisions and the pending queue.

pub mod engine;
pub mod queue;

pub use engine::{ValidationEngine, ValidationRequest};
pub use queue::{PendingSessions, ValidationQueue};
