//! API models for the cross-project image gallery.

use crate::api::models::images::ImageResponse;
use crate::api::models::projects::{ProjectPhase, ProjectStatus};
use crate::db::models::images::GalleryImageDBResponse;
use crate::types::ProjectId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryClient {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryProject {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProjectId,
    pub title: String,
    pub location: String,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub client: GalleryClient,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryImageResponse {
    #[serde(flatten)]
    pub image: ImageResponse,
    pub project: GalleryProject,
}

impl From<GalleryImageDBResponse> for GalleryImageResponse {
    fn from(db: GalleryImageDBResponse) -> Self {
        let project = GalleryProject {
            id: db.image.project_id,
            title: db.project_title,
            location: db.project_location,
            status: db.project_status,
            current_phase: db.project_phase,
            client: GalleryClient { name: db.client_name },
        };
        Self {
            image: db.image.into(),
            project,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryListResponse {
    pub images: Vec<GalleryImageResponse>,
}

/// Query parameters for the gallery
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListGalleryQuery {
    /// Restrict to one project; `ALL` is ignored
    pub project_id: Option<String>,
    /// Case-insensitive substring match on the project title
    pub search: Option<String>,
    /// `createdAt` (default) or `updatedAt`
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default)
    pub sort_order: Option<String>,
}
