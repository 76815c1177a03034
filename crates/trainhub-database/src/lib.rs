//! # trainhub-database
//!
//! Persistence for TrainHub sessions and the audit trail. The
//! [`store`] traits are what the service layer consumes; PostgreSQL
//! [`repositories`] and the in-memory [`store::memory`] stores implement
//! them. [`store::open`] picks one from configuration.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{AuditStore, SessionStore, Stores};
