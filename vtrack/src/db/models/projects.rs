//! Database models for projects and worker assignments.

use crate::api::models::projects::{ProjectCreate, ProjectPhase, ProjectSortField, ProjectStatus, ProjectUpdate, SortOrder};
use crate::types::{ProjectId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Database request for creating a project together with its initial assignments.
#[derive(Debug, Clone)]
pub struct ProjectCreateDBRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub client_id: UserId,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub progress: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub estimated_end_date: Option<DateTime<Utc>>,
    pub budget: Option<Decimal>,
    pub worker_ids: Vec<UserId>,
}

impl From<ProjectCreate> for ProjectCreateDBRequest {
    fn from(api: ProjectCreate) -> Self {
        let mut worker_ids = api.worker_ids;
        dedup_preserving_order(&mut worker_ids);
        Self {
            title: api.title.trim().to_string(),
            description: api.description.trim().to_string(),
            location: api.location.trim().to_string(),
            client_id: api.client_id,
            status: api.status,
            current_phase: api.current_phase,
            progress: api.progress,
            start_date: api.start_date,
            estimated_end_date: api.estimated_end_date,
            budget: api.budget,
            worker_ids,
        }
    }
}

/// Database request for a partial project update.
///
/// Date and budget fields are tri-state: `None` leaves the column alone, `Some(None)` clears it.
/// `worker_ids`, when present, replaces every assignment.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub client_id: Option<UserId>,
    pub status: Option<ProjectStatus>,
    pub current_phase: Option<ProjectPhase>,
    pub progress: Option<i32>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub estimated_end_date: Option<Option<DateTime<Utc>>>,
    pub budget: Option<Option<Decimal>>,
    pub worker_ids: Option<Vec<UserId>>,
}

impl From<ProjectUpdate> for ProjectUpdateDBRequest {
    fn from(api: ProjectUpdate) -> Self {
        Self {
            title: api.title.map(|s| s.trim().to_string()),
            description: api.description.map(|s| s.trim().to_string()),
            location: api.location.map(|s| s.trim().to_string()),
            client_id: api.client_id,
            status: api.status,
            current_phase: api.current_phase,
            progress: api.progress,
            start_date: api.start_date,
            estimated_end_date: api.estimated_end_date,
            budget: api.budget,
            worker_ids: api.worker_ids.map(|mut ids| {
                dedup_preserving_order(&mut ids);
                ids
            }),
        }
    }
}

fn dedup_preserving_order(ids: &mut Vec<UserId>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

/// Database response for a project row
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDBResponse {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub client_id: UserId,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub progress: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub estimated_end_date: Option<DateTime<Utc>>,
    pub budget: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What changed in an update, so callers can fan out notifications after commit.
#[derive(Debug, Clone)]
pub struct ProjectUpdateOutcome {
    pub project: ProjectDBResponse,
    pub previous_phase: ProjectPhase,
    pub previous_status: ProjectStatus,
    /// Workers that were not assigned before this update
    pub added_workers: Vec<UserId>,
}

impl ProjectUpdateOutcome {
    pub fn phase_changed(&self) -> bool {
        self.previous_phase != self.project.current_phase
    }

    pub fn became_completed(&self) -> bool {
        self.previous_status != ProjectStatus::Completed && self.project.status == ProjectStatus::Completed
    }
}

/// Which projects a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    All,
    ClientOf(UserId),
    AssignedTo(UserId),
}

/// Filter for listing projects
#[derive(Debug, Clone)]
pub struct ProjectFilter {
    pub scope: ProjectScope,
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub current_phase: Option<ProjectPhase>,
    pub client_id: Option<UserId>,
    pub sort_by: ProjectSortField,
    pub sort_order: SortOrder,
}

impl ProjectFilter {
    pub fn new(scope: ProjectScope) -> Self {
        Self {
            scope,
            search: None,
            status: None,
            current_phase: None,
            client_id: None,
            sort_by: ProjectSortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectClientDBSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectWorkerDBSummary {
    pub project_id: ProjectId,
    pub worker_id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ProjectCountsDBResponse {
    pub images: i64,
    pub comments: i64,
}
