//! PostgreSQL repositories.

pub mod audit;
pub mod session;

pub use audit::AuditLogRepository;
pub use session::SessionRepository;
