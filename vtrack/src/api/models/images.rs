//! API request/response models for project progress images.

use crate::api::models::projects::ProjectPhase;
use crate::api::models::validation::Validator;
use crate::db::models::images::ImageDBResponse;
use crate::errors::Result;
use crate::types::{ImageId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Metadata for an image the browser has already uploaded to the image host.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreate {
    pub url: String,
    pub public_id: String,
    pub phase: ProjectPhase,
    #[serde(default)]
    pub description: Option<String>,
}

impl ImageCreate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.url("url", &self.url)
            .check(!self.public_id.trim().is_empty(), "publicId", "Required");
        if let Some(description) = &self.description {
            v.length("description", description, 0, 500);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ImageId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    pub url: String,
    pub public_id: String,
    pub phase: ProjectPhase,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub uploaded_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ImageDBResponse> for ImageResponse {
    fn from(db: ImageDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            url: db.url,
            public_id: db.public_id,
            phase: db.phase,
            description: db.description,
            uploaded_by: db.uploaded_by,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageListResponse {
    pub images: Vec<ImageResponse>,
}

/// Query parameters for listing a project's images
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListImagesQuery {
    /// Phase filter; unknown values are ignored
    pub phase: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Path)]
pub struct ImagePathParams {
    /// Project ID
    #[param(value_type = String, format = "uuid")]
    pub id: ProjectId,
    /// Image ID
    #[param(value_type = String, format = "uuid")]
    pub image_id: ImageId,
}
