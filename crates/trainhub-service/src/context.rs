//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trainhub_entity::user::{Actor, UserRole};

/// Context for the current authenticated request.
///
/// Built by the API extractor from verified token claims and passed into
/// service methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated actor.
    pub actor: Actor,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            request_time: Utc::now(),
        }
    }

    /// The actor's role.
    pub fn role(&self) -> UserRole {
        self.actor.role
    }

    /// The actor's user ID as a raw UUID.
    pub fn user_id(&self) -> Uuid {
        self.actor.id.into_uuid()
    }
}
