//! # trainhub-entity
//!
//! Domain entity models for TrainHub. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.
//!
//! The [`session::transition`] module holds the session lifecycle state
//! machine; it is pure and performs no I/O.

pub mod audit;
pub mod session;
pub mod user;
