//! Database models for project images.

use crate::api::models::images::ImageCreate;
use crate::api::models::projects::{ProjectPhase, ProjectStatus, SortOrder};
use crate::db::models::projects::ProjectScope;
use crate::types::{ImageId, ProjectId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ImageCreateDBRequest {
    pub project_id: ProjectId,
    pub url: String,
    pub public_id: String,
    pub phase: ProjectPhase,
    pub description: Option<String>,
    pub uploaded_by: Option<UserId>,
}

impl ImageCreateDBRequest {
    pub fn new(project_id: ProjectId, uploaded_by: UserId, api: ImageCreate) -> Self {
        Self {
            project_id,
            url: api.url,
            public_id: api.public_id.trim().to_string(),
            phase: api.phase,
            description: api.description,
            uploaded_by: Some(uploaded_by),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageDBResponse {
    pub id: ImageId,
    pub project_id: ProjectId,
    pub url: String,
    pub public_id: String,
    pub phase: ProjectPhase,
    pub description: Option<String>,
    pub uploaded_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An image joined with the project and client it belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GalleryImageDBResponse {
    #[sqlx(flatten)]
    pub image: ImageDBResponse,
    pub project_title: String,
    pub project_location: String,
    pub project_status: ProjectStatus,
    pub project_phase: ProjectPhase,
    pub client_name: String,
}

/// Sortable gallery columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GallerySortField {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl GallerySortField {
    /// Same fallback as project lists: an unrecognised `sortBy` means `createdAt` descending.
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> (Self, SortOrder) {
        let field = match sort_by.unwrap_or("createdAt") {
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            _ => return (Self::CreatedAt, SortOrder::Desc),
        };
        (field, SortOrder::parse(sort_order))
    }
}

#[derive(Debug, Clone)]
pub struct GalleryFilter {
    pub scope: ProjectScope,
    pub project_id: Option<ProjectId>,
    pub search: Option<String>,
    pub sort_by: GallerySortField,
    pub sort_order: SortOrder,
}
