//! Route handlers organized by domain.

pub mod embed;
pub mod health;
pub mod me;
pub mod sessions;
pub mod validation;
