//! Training session domain entities and lifecycle.

pub mod kind;
pub mod model;
pub mod status;
pub mod transition;

pub use kind::SessionKind;
pub use model::{Cancellation, CreateSession, GateStamp, Session, SessionChange};
pub use status::SessionStatus;
pub use transition::{Decision, Gate, Progression, Transition, legal_gates};
