//! Database repository for project images and the cross-project gallery.

use crate::api::models::projects::{ProjectPhase, SortOrder};
use crate::db::{
    errors::Result,
    handlers::{projects::push_scope, push_search},
    models::images::{GalleryFilter, GallerySortField, GalleryImageDBResponse, ImageCreateDBRequest, ImageDBResponse},
};
use crate::types::{ImageId, ProjectId, abbrev_uuid};
use sqlx::{PgConnection, QueryBuilder};
use tracing::instrument;

/// Filter for listing a single project's images
#[derive(Debug, Clone)]
pub struct ImageFilter {
    pub project_id: ProjectId,
    pub phase: Option<ProjectPhase>,
    pub limit: Option<i64>,
}

impl ImageFilter {
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id,
            phase: None,
            limit: None,
        }
    }
}

pub struct Images<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Images<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&request.project_id), phase = %request.phase), err)]
    pub async fn create(&mut self, request: &ImageCreateDBRequest) -> Result<ImageDBResponse> {
        let image = sqlx::query_as::<_, ImageDBResponse>(
            r#"
            INSERT INTO project_images (project_id, url, public_id, phase, description, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.project_id)
        .bind(&request.url)
        .bind(&request.public_id)
        .bind(request.phase)
        .bind(&request.description)
        .bind(request.uploaded_by)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(image)
    }

    #[instrument(skip(self), fields(image_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: ImageId) -> Result<Option<ImageDBResponse>> {
        let image = sqlx::query_as::<_, ImageDBResponse>("SELECT * FROM project_images WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(image)
    }

    /// Images of one project, newest first.
    #[instrument(skip(self, filter), fields(project_id = %abbrev_uuid(&filter.project_id), phase = ?filter.phase), err)]
    pub async fn list(&mut self, filter: &ImageFilter) -> Result<Vec<ImageDBResponse>> {
        let mut query = QueryBuilder::new("SELECT * FROM project_images WHERE project_id = ");
        query.push_bind(filter.project_id);

        if let Some(phase) = filter.phase {
            query.push(" AND phase = ");
            query.push_bind(phase);
        }

        query.push(" ORDER BY created_at DESC, id");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
        }

        let images = query.build_query_as::<ImageDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(images)
    }

    /// Remove the metadata row only; the stored file is left with the image host.
    #[instrument(skip(self), fields(image_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&mut self, id: ImageId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project_images WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Images across every project in the caller's scope, each joined with its project and client.
    #[instrument(skip(self, filter), fields(scope = ?filter.scope, sort_by = ?filter.sort_by), err)]
    pub async fn gallery(&mut self, filter: &GalleryFilter) -> Result<Vec<GalleryImageDBResponse>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                i.*,
                p.title AS project_title,
                p.location AS project_location,
                p.status AS project_status,
                p.current_phase AS project_phase,
                u.name AS client_name
            FROM project_images i
            JOIN projects p ON p.id = i.project_id
            JOIN users u ON u.id = p.client_id
            WHERE 1=1
            "#,
        );

        push_scope(&mut query, filter.scope, "p");

        if let Some(project_id) = filter.project_id {
            query.push(" AND p.id = ");
            query.push_bind(project_id);
        }

        push_search(&mut query, &["p.title"], filter.search.as_deref());

        let column = match filter.sort_by {
            GallerySortField::CreatedAt => "i.created_at",
            GallerySortField::UpdatedAt => "i.updated_at",
        };
        let direction = match filter.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        query.push(format!(" ORDER BY {column} {direction}, i.id"));

        let images = query
            .build_query_as::<GalleryImageDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;

        Ok(images)
    }
}
