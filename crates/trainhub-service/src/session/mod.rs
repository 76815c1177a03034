//! Session entity access.

pub mod service;

pub use service::{NewSession, SessionService};
