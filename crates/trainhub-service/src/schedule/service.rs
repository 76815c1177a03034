//! Schedule progression service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use trainhub_core::error::ErrorKind;
use trainhub_core::result::AppResult;
use trainhub_database::store::SessionStore;
use trainhub_entity::session::Progression;

use crate::audit::AuditService;

/// Outcome of one progression pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Sessions moved to `ongoing`.
    pub started: u32,
    /// Sessions moved to `completed`.
    pub completed: u32,
    /// Sessions skipped because another writer got there first.
    pub conflicts: u32,
}

impl ProgressReport {
    /// Number of sessions that changed status.
    pub fn changed(&self) -> u32 {
        self.started + self.completed
    }
}

/// Moves fully validated sessions through `ongoing` and `completed` by clock.
#[derive(Debug, Clone)]
pub struct ScheduleService {
    store: Arc<dyn SessionStore>,
    audit: AuditService,
}

impl ScheduleService {
    /// Creates a new schedule service.
    pub fn new(store: Arc<dyn SessionStore>, audit: AuditService) -> Self {
        Self { store, audit }
    }

    /// Apply every change due at `now`.
    ///
    /// A session that starts and ends before the next pass is started on
    /// this pass and completed on the following one.
    pub async fn advance_due(&self, now: DateTime<Utc>) -> AppResult<ProgressReport> {
        let candidates = self.store.find_by_status(&Progression::SCANNED).await?;
        let mut report = ProgressReport::default();

        for session in candidates {
            let Some(change) = Progression::due(&session, now) else {
                continue;
            };

            match self
                .store
                .apply_change(session.id, session.version, &change)
                .await
            {
                Ok(_) => {
                    info!(
                        session_id = %session.id,
                        from = %change.from,
                        to = %change.to,
                        "Session progressed"
                    );
                    self.audit.record_change(None, session.id, &change).await;
                    if change.to.is_terminal() {
                        report.completed += 1;
                    } else {
                        report.started += 1;
                    }
                }
                Err(e) if matches!(e.kind, ErrorKind::Conflict | ErrorKind::NotFound) => {
                    warn!(session_id = %session.id, error = %e, "Skipping session changed concurrently");
                    report.conflicts += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            started = report.started,
            completed = report.completed,
            conflicts = report.conflicts,
            "Progression pass finished"
        );
        Ok(report)
    }
}
