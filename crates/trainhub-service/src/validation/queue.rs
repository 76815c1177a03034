//! Validation queue: sessions waiting for a gate.

use std::sync::Arc;

use serde::Serialize;

use trainhub_core::result::AppResult;
use trainhub_database::store::SessionStore;
use trainhub_entity::session::{Gate, Session, SessionStatus};
use trainhub_entity::user::Actor;

/// A point-in-time snapshot of pending sessions, ordered by start time.
///
/// The snapshot does not follow later writes; call the queue again after
/// any mutation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PendingSessions(Vec<Session>);

impl PendingSessions {
    /// Number of sessions in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate without consuming.
    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.0.iter()
    }
}

impl IntoIterator for PendingSessions {
    type Item = Session;
    type IntoIter = std::vec::IntoIter<Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Read-only view over sessions awaiting validation.
#[derive(Debug, Clone)]
pub struct ValidationQueue {
    store: Arc<dyn SessionStore>,
}

impl ValidationQueue {
    /// Creates a new validation queue view.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Sessions in `planned` or `awaiting_hse`.
    pub async fn list_pending(&self) -> AppResult<PendingSessions> {
        self.store
            .find_by_status(&SessionStatus::PENDING)
            .await
            .map(PendingSessions)
    }

    /// Sessions whose pending gate `actor` owns.
    pub async fn list_pending_for(&self, actor: &Actor) -> AppResult<PendingSessions> {
        let statuses: Vec<SessionStatus> = SessionStatus::PENDING
            .into_iter()
            .filter(|status| Gate::awaited_in(*status).is_some_and(|g| g.is_owned_by(actor.role)))
            .collect();

        if statuses.is_empty() {
            return Ok(PendingSessions::default());
        }
        self.store.find_by_status(&statuses).await.map(PendingSessions)
    }
}
