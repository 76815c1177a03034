//! Clock-driven session progression.

pub mod service;

pub use service::{ProgressReport, ScheduleService};
