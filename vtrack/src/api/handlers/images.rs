use crate::{
    AppState,
    api::{
        extract::{Json, Query},
        handlers::projects::{load_accessible_project, project_not_found},
        models::{
            MessageResponse,
            images::{ImageCreate, ImageListResponse, ImagePathParams, ImageResponse, ListImagesQuery},
            projects::ProjectPhase,
            validation::enum_filter,
        },
    },
    auth::permissions::{RequiresPermission, operation, resource},
    db::{
        handlers::{Images, Projects, Repository, images::ImageFilter},
        models::images::ImageCreateDBRequest,
    },
    errors::{Error, Result},
    types::{Operation, ProjectId},
};
use axum::{
    Json as AxumJson,
    extract::{Path, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/projects/{id}/images",
    tag = "images",
    summary = "List project images",
    params(("id" = uuid::Uuid, Path, description = "Project ID"), ListImagesQuery),
    responses(
        (status = 200, description = "Images, newest first", body = ImageListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not attached to this project"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Query(query): Query<ListImagesQuery>,
    current_user: RequiresPermission<resource::Images, operation::ReadOwn>,
) -> Result<AxumJson<ImageListResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_accessible_project(&mut pool_conn, &current_user, id, Operation::ReadOwn, "images of this project").await?;

    let filter = ImageFilter {
        phase: enum_filter::<ProjectPhase>(query.phase.as_deref()),
        ..ImageFilter::for_project(id)
    };
    let images = Images::new(&mut pool_conn).list(&filter).await?;

    Ok(AxumJson(ImageListResponse {
        images: images.into_iter().map(ImageResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/images",
    tag = "images",
    summary = "Record an uploaded image",
    request_body = ImageCreate,
    params(("id" = uuid::Uuid, Path, description = "Project ID")),
    responses(
        (status = 201, description = "Image recorded", body = ImageResponse),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Clients cannot upload, workers must be assigned"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_image(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    current_user: RequiresPermission<resource::Images, operation::CreateOwn>,
    Json(create): Json<ImageCreate>,
) -> Result<(StatusCode, AxumJson<ImageResponse>)> {
    create.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let project = load_accessible_project(&mut pool_conn, &current_user, id, Operation::CreateOwn, "images on this project").await?;

    let image = Images::new(&mut pool_conn)
        .create(&ImageCreateDBRequest::new(project.id, current_user.id, create))
        .await?;

    state.notifier().new_image(project.id, current_user.name.clone());

    Ok((StatusCode::CREATED, AxumJson(ImageResponse::from(image))))
}

/// Removes the database record only; the file stays on the image host.
#[utoipa::path(
    delete,
    path = "/projects/{id}/images/{imageId}",
    tag = "images",
    summary = "Delete image",
    params(ImagePathParams),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, description = "Image belongs to another project"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Image not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(params): Path<ImagePathParams>,
    _: RequiresPermission<resource::Images, operation::DeleteAll>,
) -> Result<AxumJson<MessageResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if Projects::new(&mut pool_conn).get_by_id(params.id).await?.is_none() {
        return Err(project_not_found(params.id));
    }

    let mut repo = Images::new(&mut pool_conn);
    let image = repo.get_by_id(params.image_id).await?.ok_or_else(|| Error::NotFound {
        resource: "Image".to_string(),
        id: params.image_id.to_string(),
    })?;

    if image.project_id != params.id {
        return Err(Error::BadRequest {
            message: "Image does not belong to this project".to_string(),
        });
    }

    repo.delete(image.id).await?;
    tracing::info!(image_id = %image.id, public_id = %image.public_id, "Image record deleted");

    Ok(AxumJson(MessageResponse::new("Image deleted successfully")))
}
