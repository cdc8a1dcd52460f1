use crate::{
    AppState,
    api::{
        extract::Query,
        models::gallery::{GalleryImageResponse, GalleryListResponse, ListGalleryQuery},
    },
    auth::permissions::{RequiresPermission, operation, project_scope, resource},
    db::{
        handlers::Images,
        models::images::{GalleryFilter, GallerySortField},
    },
    errors::{Error, Result},
};
use axum::{Json as AxumJson, extract::State};
use uuid::Uuid;

/// `ALL` (or nothing) means every project in scope.
fn parse_project_filter(raw: Option<&str>) -> Result<Option<Uuid>> {
    match raw.map(str::trim) {
        None | Some("") | Some("ALL") => Ok(None),
        Some(id) => Uuid::parse_str(id).map(Some).map_err(|_| Error::BadRequest {
            message: "Invalid projectId".to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/gallery",
    tag = "gallery",
    summary = "Browse images across projects",
    description = "Images from every project the caller can see, each with a summary of its project.",
    params(ListGalleryQuery),
    responses(
        (status = 200, description = "Gallery images", body = GalleryListResponse),
        (status = 400, description = "Malformed projectId"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<ListGalleryQuery>,
    current_user: RequiresPermission<resource::Images, operation::ReadOwn>,
) -> Result<AxumJson<GalleryListResponse>> {
    let (sort_by, sort_order) = GallerySortField::parse(query.sort_by.as_deref(), query.sort_order.as_deref());
    let filter = GalleryFilter {
        scope: project_scope(&current_user),
        project_id: parse_project_filter(query.project_id.as_deref())?,
        search: query.search,
        sort_by,
        sort_order,
    };

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let images = Images::new(&mut pool_conn).gallery(&filter).await?;

    Ok(AxumJson(GalleryListResponse {
        images: images.into_iter().map(GalleryImageResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::parse_project_filter;
    use crate::{
        api::models::{gallery::GalleryListResponse, projects::ProjectStatus, users::Role},
        db::models::users::UserDBResponse,
        test_utils::*,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::PgPool;
    use uuid::Uuid;

    #[test]
    fn all_means_no_project_filter() {
        assert_eq!(parse_project_filter(Some("ALL")).unwrap(), None);
        assert_eq!(parse_project_filter(None).unwrap(), None);
        let id = Uuid::new_v4();
        assert_eq!(parse_project_filter(Some(&id.to_string())).unwrap(), Some(id));
        assert!(parse_project_filter(Some("nope")).is_err());
    }

    async fn upload(app: &TestServer, user: &UserDBResponse, project_id: Uuid, public_id: &str) {
        app.post(&format!("/api/v1/projects/{project_id}/images"))
            .add_header(add_auth_headers(user).0, add_auth_headers(user).1)
            .json(&json!({
                "url": format!("https://res.example.com/{public_id}.jpg"),
                "publicId": public_id,
                "phase": "MEASUREMENT",
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_gallery_is_scoped_and_filtered(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;
        let other_client = create_test_user(&pool, Role::Client).await;
        let mine = create_test_project(&pool, client.id, &[]).await;
        let theirs = create_test_project(&pool, other_client.id, &[]).await;

        upload(&app, &admin, mine.id, "first").await;
        upload(&app, &admin, mine.id, "second").await;
        upload(&app, &admin, theirs.id, "elsewhere").await;

        let all: GalleryListResponse = app
            .get("/api/v1/gallery?projectId=ALL")
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .json();
        assert_eq!(all.images.len(), 3);

        let own: GalleryListResponse = app
            .get("/api/v1/gallery")
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .await
            .json();
        assert_eq!(own.images.len(), 2);
        assert!(own.images.iter().all(|i| i.project.id == mine.id));
        assert_eq!(own.images[0].image.public_id, "second");
        assert_eq!(own.images[0].project.client.name, client.name);
        assert_eq!(own.images[0].project.status, ProjectStatus::Pending);

        let oldest_first: GalleryListResponse = app
            .get("/api/v1/gallery?sortBy=createdAt&sortOrder=asc")
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .await
            .json();
        assert_eq!(oldest_first.images[0].image.public_id, "first");

        // Unrecognised sort fields ignore sortOrder and list newest first
        let fallback: GalleryListResponse = app
            .get("/api/v1/gallery?sortBy=bogus&sortOrder=asc")
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .await
            .json();
        assert_eq!(fallback.images[0].image.public_id, "second");

        let narrowed: GalleryListResponse = app
            .get(&format!("/api/v1/gallery?projectId={}", theirs.id))
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .await
            .json();
        assert!(narrowed.images.is_empty());

        let searched: GalleryListResponse = app
            .get(&format!("/api/v1/gallery?search={}", theirs.title.to_uppercase().replace(' ', "%20")))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .json();
        assert_eq!(searched.images.len(), 1);
        assert_eq!(searched.images[0].project.id, theirs.id);

        for literal in ["%25", "c_bin"] {
            let body: GalleryListResponse = app
                .get(&format!("/api/v1/gallery?search={literal}"))
                .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
                .await
                .json();
            assert!(body.images.is_empty(), "search {literal} matched {} images", body.images.len());
        }

        app.get("/api/v1/gallery?projectId=not-a-uuid")
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
