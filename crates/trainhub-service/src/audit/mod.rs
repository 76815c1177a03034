//! Audit trail recording and lookup.

pub mod service;

pub use service::AuditService;
