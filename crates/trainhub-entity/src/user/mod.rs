//! User domain values.
//!
//! Users are owned by the host platform (standalone login or the Moodle
//! LMS); TrainHub only sees the acting user through an [`Actor`].

pub mod actor;
pub mod role;

pub use actor::Actor;
pub use role::UserRole;
