//! # trainhub-core
//!
//! Core crate for TrainHub. Contains configuration schemas, typed
//! identifiers, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TrainHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
