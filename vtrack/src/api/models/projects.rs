//! API request/response models for projects, worker assignments and phase history.

use crate::api::models::comments::CommentResponse;
use crate::api::models::images::ImageResponse;
use crate::api::models::validation::{Validator, blank_as_none_datetime, nullable_datetime};
use crate::db::models::phase_history::PhaseHistoryDBResponse;
use crate::db::models::projects::{ProjectClientDBSummary, ProjectCountsDBResponse, ProjectDBResponse, ProjectWorkerDBSummary};
use crate::errors::Result;
use crate::types::{PhaseHistoryId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use std::fmt;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Pending,
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// Statuses that count as "active" on the dashboard.
    pub const ACTIVE: [ProjectStatus; 3] = [ProjectStatus::Pending, ProjectStatus::InProgress, ProjectStatus::Paused];
}

/// Installation phase. Any phase may follow any other; there is no transition table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "project_phase", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectPhase {
    #[default]
    Measurement,
    Design,
    Approval,
    Installation,
    Finishing,
    Delivery,
}

impl ProjectPhase {
    /// Human-readable label used in notification messages.
    pub fn label(self) -> &'static str {
        match self {
            ProjectPhase::Measurement => "Measurement",
            ProjectPhase::Design => "Design",
            ProjectPhase::Approval => "Approval",
            ProjectPhase::Installation => "Installation",
            ProjectPhase::Finishing => "Finishing",
            ProjectPhase::Delivery => "Delivery",
        }
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = match self {
            ProjectPhase::Measurement => "MEASUREMENT",
            ProjectPhase::Design => "DESIGN",
            ProjectPhase::Approval => "APPROVAL",
            ProjectPhase::Installation => "INSTALLATION",
            ProjectPhase::Finishing => "FINISHING",
            ProjectPhase::Delivery => "DELIVERY",
        };
        f.write_str(wire)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreate {
    pub title: String,
    pub description: String,
    pub location: String,
    #[schema(value_type = String, format = "uuid")]
    pub client_id: UserId,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub current_phase: ProjectPhase,
    #[serde(default)]
    pub progress: i32,
    #[serde(default, deserialize_with = "blank_as_none_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "blank_as_none_datetime")]
    pub estimated_end_date: Option<DateTime<Utc>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub worker_ids: Vec<UserId>,
}

impl ProjectCreate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.length("title", self.title.trim(), 3, 200)
            .length("description", self.description.trim(), 10, 2000)
            .length("location", self.location.trim(), 3, 500)
            .range("progress", self.progress, 0, 100);
        if let Some(budget) = self.budget {
            v.check(budget > Decimal::ZERO, "budget", "Must be greater than 0");
        }
        v.finish()
    }
}

/// Partial project update.
///
/// Absent fields are left unchanged. `startDate`, `estimatedEndDate` and `budget` accept
/// `null` (and `""` for dates) to clear the stored value. `workerIds`, when present,
/// replaces the full set of assigned workers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub client_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<ProjectPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable_datetime")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable_datetime")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub estimated_end_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<String>>)]
    pub worker_ids: Option<Vec<UserId>>,
}

impl ProjectUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            v.length("title", title.trim(), 3, 200);
        }
        if let Some(description) = &self.description {
            v.length("description", description.trim(), 10, 2000);
        }
        if let Some(location) = &self.location {
            v.length("location", location.trim(), 3, 500);
        }
        if let Some(progress) = self.progress {
            v.range("progress", progress, 0, 100);
        }
        if let Some(Some(budget)) = self.budget {
            v.check(budget > Decimal::ZERO, "budget", "Must be greater than 0");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectClientSummary {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectWorkerSummary {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectCounts {
    pub images: i64,
    pub comments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhaseHistoryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PhaseHistoryId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    pub phase: ProjectPhase,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub location: String,
    #[schema(value_type = String, format = "uuid")]
    pub client_id: UserId,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub progress: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub estimated_end_date: Option<DateTime<Utc>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ProjectClientSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<ProjectWorkerSummary>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<ProjectCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub images: Option<Vec<ImageResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub comments: Option<Vec<CommentResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<PhaseHistoryResponse>>,
}

impl From<ProjectDBResponse> for ProjectResponse {
    fn from(db: ProjectDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            location: db.location,
            client_id: db.client_id,
            status: db.status,
            current_phase: db.current_phase,
            progress: db.progress,
            start_date: db.start_date,
            estimated_end_date: db.estimated_end_date,
            budget: db.budget,
            created_at: db.created_at,
            updated_at: db.updated_at,
            client: None,
            workers: None,
            count: None,
            images: None,
            comments: None,
            phases: None,
        }
    }
}

impl ProjectResponse {
    pub fn with_client(mut self, client: ProjectClientSummary) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_workers(mut self, workers: Vec<ProjectWorkerSummary>) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_counts(mut self, counts: ProjectCounts) -> Self {
        self.count = Some(counts);
        self
    }

    pub fn with_images(mut self, images: Vec<ImageResponse>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_comments(mut self, comments: Vec<CommentResponse>) -> Self {
        self.comments = Some(comments);
        self
    }

    pub fn with_phases(mut self, phases: Vec<PhaseHistoryResponse>) -> Self {
        self.phases = Some(phases);
        self
    }
}

impl From<ProjectClientDBSummary> for ProjectClientSummary {
    fn from(db: ProjectClientDBSummary) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            phone: db.phone,
        }
    }
}

impl From<ProjectWorkerDBSummary> for ProjectWorkerSummary {
    fn from(db: ProjectWorkerDBSummary) -> Self {
        Self {
            id: db.worker_id,
            name: db.name,
            email: db.email,
        }
    }
}

impl From<ProjectCountsDBResponse> for ProjectCounts {
    fn from(db: ProjectCountsDBResponse) -> Self {
        Self {
            images: db.images,
            comments: db.comments,
        }
    }
}

impl From<PhaseHistoryDBResponse> for PhaseHistoryResponse {
    fn from(db: PhaseHistoryDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            phase: db.phase,
            started_at: db.started_at,
            completed_at: db.completed_at,
            notes: db.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
}

/// Sortable project columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Progress,
}

impl ProjectSortField {
    /// Resolve `sortBy` and `sortOrder` together. A missing `sortBy` means `createdAt`;
    /// an unrecognised one sorts by `createdAt` descending whatever `sortOrder` says.
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> (Self, SortOrder) {
        let field = match sort_by.unwrap_or("createdAt") {
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            "title" => Self::Title,
            "progress" => Self::Progress,
            _ => return (Self::CreatedAt, SortOrder::Desc),
        };
        (field, SortOrder::parse(sort_order))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` sorts descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Query parameters for listing projects
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    /// Case-insensitive substring match on title, description or location
    pub search: Option<String>,
    /// Status filter; `ALL` or unknown values are ignored
    pub status: Option<String>,
    /// Phase filter; `ALL` or unknown values are ignored
    pub current_phase: Option<String>,
    /// Client filter (administrators only); `ALL` is ignored
    pub client_id: Option<String>,
    /// One of `createdAt`, `updatedAt`, `title`, `progress`
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default)
    pub sort_order: Option<String>,
}
