//! Database models for project phase history.

use crate::api::models::projects::ProjectPhase;
use crate::types::{PhaseHistoryId, ProjectId};
use chrono::{DateTime, Utc};

/// One period a project spent in a phase. The open row has no `completed_at`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhaseHistoryDBResponse {
    pub id: PhaseHistoryId,
    pub project_id: ProjectId,
    pub phase: ProjectPhase,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
