use crate::{
    AppState,
    api::{
        extract::{Json, Query},
        handlers::projects::load_accessible_project,
        models::{
            MessageResponse,
            comments::{CommentCreate, CommentListResponse, CommentResponse, CommentUpdate, ListCommentsQuery},
            users::CurrentUser,
        },
    },
    auth::permissions::{RequiresPermission, operation, resource},
    db::{
        handlers::{Comments, Repository},
        models::comments::{CommentCreateDBRequest, CommentDBResponse, CommentFilter, CommentUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{CommentId, Operation, Permission},
};
use axum::{
    Json as AxumJson,
    extract::{Path, State},
    http::StatusCode,
};

fn comment_not_found(id: CommentId) -> Error {
    Error::NotFound {
        resource: "Comment".to_string(),
        id: id.to_string(),
    }
}

/// Only the author or an administrator may change a comment.
fn require_author(user: &CurrentUser, comment: &CommentDBResponse, operation: Operation) -> Result<()> {
    if user.is_admin() || comment.user_id == user.id {
        Ok(())
    } else {
        Err(Error::InsufficientPermissions {
            required: Permission::Granted,
            action: operation,
            resource: "comments by other users".to_string(),
        })
    }
}

#[utoipa::path(
    get,
    path = "/comments",
    tag = "comments",
    summary = "List project comments",
    params(ListCommentsQuery),
    responses(
        (status = 200, description = "Comments, newest first, with author", body = CommentListResponse),
        (status = 400, description = "projectId missing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not attached to this project"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
    current_user: RequiresPermission<resource::Comments, operation::ReadOwn>,
) -> Result<AxumJson<CommentListResponse>> {
    let project_id = query.project_id.ok_or_else(|| Error::BadRequest {
        message: "projectId is required".to_string(),
    })?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_accessible_project(&mut pool_conn, &current_user, project_id, Operation::ReadOwn, "comments on this project").await?;

    let comments = Comments::new(&mut pool_conn)
        .list(&CommentFilter { project_id, limit: None })
        .await?;

    Ok(AxumJson(CommentListResponse {
        comments: comments.into_iter().map(CommentResponse::detailed).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/comments",
    tag = "comments",
    summary = "Comment on a project",
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Cannot comment on this project"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_comment(
    State(state): State<AppState>,
    current_user: RequiresPermission<resource::Comments, operation::CreateOwn>,
    Json(create): Json<CommentCreate>,
) -> Result<(StatusCode, AxumJson<CommentResponse>)> {
    create.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let project = load_accessible_project(
        &mut pool_conn,
        &current_user,
        create.project_id,
        Operation::CreateOwn,
        "comments on this project",
    )
    .await?;

    let comment = Comments::new(&mut pool_conn)
        .create(&CommentCreateDBRequest {
            content: create.content,
            project_id: project.id,
            user_id: current_user.id,
        })
        .await?;

    state.notifier().new_comment(project.id, current_user.id, current_user.name.clone());

    Ok((StatusCode::CREATED, AxumJson(CommentResponse::detailed(comment))))
}

#[utoipa::path(
    put,
    path = "/comments/{id}",
    tag = "comments",
    summary = "Edit comment",
    request_body = CommentUpdate,
    params(("id" = uuid::Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<CommentId>,
    current_user: RequiresPermission<resource::Comments, operation::UpdateOwn>,
    Json(update): Json<CommentUpdate>,
) -> Result<AxumJson<CommentResponse>> {
    update.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Comments::new(&mut pool_conn);

    let comment = repo.get_by_id(id).await?.ok_or_else(|| comment_not_found(id))?;
    require_author(&current_user, &comment, Operation::UpdateOwn)?;

    let updated = repo.update(id, &CommentUpdateDBRequest { content: update.content }).await?;
    Ok(AxumJson(CommentResponse::detailed(updated)))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "comments",
    summary = "Delete comment",
    params(("id" = uuid::Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<CommentId>,
    current_user: RequiresPermission<resource::Comments, operation::DeleteOwn>,
) -> Result<AxumJson<MessageResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Comments::new(&mut pool_conn);

    let comment = repo.get_by_id(id).await?.ok_or_else(|| comment_not_found(id))?;
    require_author(&current_user, &comment, Operation::DeleteOwn)?;

    if repo.delete(id).await? {
        Ok(AxumJson(MessageResponse::new("Comment deleted successfully")))
    } else {
        Err(comment_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{
            comments::{CommentListResponse, CommentResponse},
            users::Role,
        },
        test_utils::*,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;
    use std::time::Duration;
    use uuid::Uuid;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_list_comments(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;
        let outsider = create_test_user(&pool, Role::Client).await;
        let project = create_test_project(&pool, client.id, &[worker.id]).await;

        let response = app
            .post("/api/v1/comments")
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .json(&json!({"content": "  Looks great!  ", "projectId": project.id}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let comment: CommentResponse = response.json();
        assert_eq!(comment.content, "Looks great!");
        assert_eq!(comment.user.id, client.id);
        assert_eq!(comment.user.role, Some(Role::Client));

        app.post("/api/v1/comments")
            .add_header(add_auth_headers(&outsider).0, add_auth_headers(&outsider).1)
            .json(&json!({"content": "Hello", "projectId": project.id}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        app.post("/api/v1/comments")
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .json(&json!({"content": "   ", "projectId": project.id}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.post("/api/v1/comments")
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .json(&json!({"content": "Hello", "projectId": Uuid::new_v4()}))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let listed: CommentListResponse = app
            .get(&format!("/api/v1/comments?projectId={}", project.id))
            .add_header(add_auth_headers(&worker).0, add_auth_headers(&worker).1)
            .await
            .json();
        assert_eq!(listed.comments.len(), 1);
        assert_eq!(listed.comments[0].user.email.as_deref(), Some(client.email.as_str()));

        app.get("/api/v1/comments")
            .add_header(add_auth_headers(&worker).0, add_auth_headers(&worker).1)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Worker is told, the author is not
        let mut notified = 0i64;
        for _ in 0..50 {
            notified = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(worker.id)
                .fetch_one(&pool)
                .await
                .unwrap();
            if notified > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(notified, 1);
        let author_notes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(client.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(author_notes, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_only_author_or_admin_can_edit(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;
        let project = create_test_project(&pool, client.id, &[worker.id]).await;

        let comment: CommentResponse = app
            .post("/api/v1/comments")
            .add_header(add_auth_headers(&worker).0, add_auth_headers(&worker).1)
            .json(&json!({"content": "Panels installed", "projectId": project.id}))
            .await
            .json();
        let path = format!("/api/v1/comments/{}", comment.id);

        app.put(&path)
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .json(&json!({"content": "Edited by client"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let edited: CommentResponse = app
            .put(&path)
            .add_header(add_auth_headers(&worker).0, add_auth_headers(&worker).1)
            .json(&json!({"content": "Panels installed and sealed"}))
            .await
            .json();
        assert_eq!(edited.content, "Panels installed and sealed");

        app.delete(&path)
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        app.delete(&path)
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .assert_status_ok();

        app.put(&path)
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({"content": "Too late"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
