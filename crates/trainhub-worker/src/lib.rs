//! Background processing for TrainHub.
//!
//! A single [`ProgressionRunner`] ticks on a fixed interval and moves
//! fully validated sessions to `ongoing` and `completed` as their
//! scheduled times pass.

pub mod runner;

pub use runner::ProgressionRunner;
