//! # trainhub-service
//!
//! Business logic service layer for TrainHub. Services are constructed
//! with their stores injected as `Arc<dyn …>` and never reach for ambient
//! state: the acting user is always passed in.

pub mod audit;
pub mod context;
pub mod schedule;
pub mod session;
pub mod validation;

pub use audit::AuditService;
pub use context::RequestContext;
pub use schedule::{ProgressReport, ScheduleService};
pub use session::{NewSession, SessionService};
pub use validation::{PendingSessions, ValidationEngine, ValidationQueue, ValidationRequest};
