//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trainhub_auth::rbac::SystemPermission;
use trainhub_entity::session::{Gate, Session};
use trainhub_entity::user::UserRole;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A session together with the gates the caller may decide right now.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: Session,
    /// Empty when the caller has nothing to do on this session.
    pub legal_actions: Vec<Gate>,
}

/// Current actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: UserRole,
    /// Permissions granted by the role.
    pub permissions: Vec<SystemPermission>,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// Store reachability.
    pub store: ComponentHealth,
    /// Worker configuration.
    pub worker_enabled: bool,
    /// Moodle bridge configured.
    pub embed_enabled: bool,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// `postgres` or `memory`.
    pub provider: String,
    /// Whether the last check succeeded.
    pub healthy: bool,
    /// Check latency.
    pub latency_ms: u64,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
