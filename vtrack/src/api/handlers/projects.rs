use crate::{
    AppState,
    api::{
        extract::{Json, Query},
        models::{
            MessageResponse,
            comments::CommentResponse,
            images::ImageResponse,
            projects::{
                ListProjectsQuery, PhaseHistoryResponse, ProjectClientSummary, ProjectCounts, ProjectCreate, ProjectListResponse,
                ProjectPhase, ProjectResponse, ProjectSortField, ProjectStatus, ProjectUpdate, ProjectWorkerSummary,
            },
            users::CurrentUser,
            validation::enum_filter,
        },
    },
    auth::permissions::{RequiresPermission, can_read_all_resources, operation, project_scope, require_project_access, resource},
    db::{
        errors::DbError,
        handlers::{Comments, Images, PhaseHistory, Projects, Repository, images::ImageFilter},
        models::{
            comments::CommentFilter,
            projects::{ProjectCreateDBRequest, ProjectDBResponse, ProjectFilter, ProjectUpdateDBRequest},
        },
    },
    errors::{Error, Result},
    types::{Operation, ProjectId, Resource},
};
use axum::{
    Json as AxumJson,
    extract::{Path, State},
    http::StatusCode,
};
use sqlx::PgConnection;

/// Images and comments embedded in the project detail view.
const DETAIL_PREVIEW_LIMIT: i64 = 10;

pub(crate) fn project_not_found(id: ProjectId) -> Error {
    Error::NotFound {
        resource: "Project".to_string(),
        id: id.to_string(),
    }
}

/// Load a project the caller may act on: 404 when it does not exist, 403 when the caller
/// is neither an administrator, its client nor an assigned worker.
pub(crate) async fn load_accessible_project(
    conn: &mut PgConnection,
    user: &CurrentUser,
    id: ProjectId,
    operation: Operation,
    what: &str,
) -> Result<ProjectDBResponse> {
    let project = Projects::new(&mut *conn).get_by_id(id).await?.ok_or_else(|| project_not_found(id))?;
    require_project_access(conn, user, &project, operation, what).await?;
    Ok(project)
}

/// Attach client and workers (and optionally counts) to each project.
async fn with_relations(conn: &mut PgConnection, projects: Vec<ProjectDBResponse>, counts: bool) -> Result<Vec<ProjectResponse>> {
    let ids: Vec<ProjectId> = projects.iter().map(|p| p.id).collect();
    let mut repo = Projects::new(conn);

    let mut clients = repo.get_clients(&ids).await?;
    let mut workers = repo.get_workers(&ids).await?;
    let mut counts_map = if counts { repo.get_counts(&ids).await? } else { Default::default() };

    Ok(projects
        .into_iter()
        .map(|project| {
            let id = project.id;
            let mut response = ProjectResponse::from(project).with_workers(
                workers
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(ProjectWorkerSummary::from)
                    .collect(),
            );
            if let Some(client) = clients.remove(&id) {
                response = response.with_client(ProjectClientSummary::from(client));
            }
            if counts {
                response = response.with_counts(ProjectCounts::from(counts_map.remove(&id).unwrap_or_default()));
            }
            response
        })
        .collect())
}

async fn single_with_relations(conn: &mut PgConnection, project: ProjectDBResponse) -> Result<ProjectResponse> {
    let id = project.id;
    with_relations(conn, vec![project], false)
        .await?
        .pop()
        .ok_or_else(|| project_not_found(id))
}

#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    summary = "List projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "Projects visible to the caller, with client, workers and counts", body = ProjectListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
    current_user: RequiresPermission<resource::Projects, operation::ReadOwn>,
) -> Result<AxumJson<ProjectListResponse>> {
    let mut filter = ProjectFilter::new(project_scope(&current_user));
    filter.search = query.search;
    filter.status = enum_filter::<ProjectStatus>(query.status.as_deref());
    filter.current_phase = enum_filter::<ProjectPhase>(query.current_phase.as_deref());
    (filter.sort_by, filter.sort_order) = ProjectSortField::parse(query.sort_by.as_deref(), query.sort_order.as_deref());

    // Only administrators may narrow by arbitrary client
    if can_read_all_resources(&current_user, Resource::Projects) {
        filter.client_id = query
            .client_id
            .as_deref()
            .filter(|raw| *raw != "ALL")
            .and_then(|raw| raw.parse().ok());
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let projects = Projects::new(&mut pool_conn).list(&filter).await?;
    let projects = with_relations(&mut pool_conn, projects, true).await?;

    Ok(AxumJson(ProjectListResponse { projects }))
}

#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    summary = "Create project",
    request_body = ProjectCreate,
    responses(
        (status = 201, description = "Project created with its initial phase", body = ProjectResponse),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Projects, operation::CreateAll>,
    Json(create): Json<ProjectCreate>,
) -> Result<(StatusCode, AxumJson<ProjectResponse>)> {
    create.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let request = ProjectCreateDBRequest::from(create);
    let project = Projects::new(&mut pool_conn).create(&request).await?;

    tracing::info!(project_id = %project.id, workers = request.worker_ids.len(), "Project created");
    state.notifier().workers_assigned(project.id, request.worker_ids);

    let response = single_with_relations(&mut pool_conn, project).await?;
    Ok((StatusCode::CREATED, AxumJson(response)))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    summary = "Get project",
    params(("id" = uuid::Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project with client, workers, latest images and comments, and phase history", body = ProjectResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not attached to this project"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    current_user: RequiresPermission<resource::Projects, operation::ReadOwn>,
) -> Result<AxumJson<ProjectResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let project = load_accessible_project(&mut pool_conn, &current_user, id, Operation::ReadOwn, "this project").await?;

    let images = Images::new(&mut pool_conn)
        .list(&ImageFilter {
            limit: Some(DETAIL_PREVIEW_LIMIT),
            ..ImageFilter::for_project(id)
        })
        .await?;
    let comments = Comments::new(&mut pool_conn)
        .list(&CommentFilter {
            project_id: id,
            limit: Some(DETAIL_PREVIEW_LIMIT),
        })
        .await?;
    let phases = PhaseHistory::new(&mut pool_conn).list_for_project(id).await?;

    let response = single_with_relations(&mut pool_conn, project)
        .await?
        .with_images(images.into_iter().map(ImageResponse::from).collect())
        .with_comments(comments.into_iter().map(CommentResponse::brief).collect())
        .with_phases(phases.into_iter().map(PhaseHistoryResponse::from).collect());

    Ok(AxumJson(response))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "projects",
    summary = "Update project",
    request_body = ProjectUpdate,
    params(("id" = uuid::Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    _: RequiresPermission<resource::Projects, operation::UpdateAll>,
    Json(update): Json<ProjectUpdate>,
) -> Result<AxumJson<ProjectResponse>> {
    update.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = match Projects::new(&mut pool_conn)
        .update_with_outcome(id, &ProjectUpdateDBRequest::from(update))
        .await
    {
        Ok(outcome) => outcome,
        Err(DbError::NotFound) => return Err(project_not_found(id)),
        Err(e) => return Err(e.into()),
    };

    // Fan-out runs only after the update has committed
    let notifier = state.notifier();
    if outcome.phase_changed() {
        notifier.phase_change(id, outcome.previous_phase, outcome.project.current_phase);
    }
    if outcome.became_completed() {
        notifier.project_completed(id);
    }
    notifier.workers_assigned(id, outcome.added_workers.clone());

    let response = single_with_relations(&mut pool_conn, outcome.project).await?;
    Ok(AxumJson(response))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    summary = "Delete project",
    params(("id" = uuid::Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project and everything attached to it deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    _: RequiresPermission<resource::Projects, operation::DeleteAll>,
) -> Result<AxumJson<MessageResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if Projects::new(&mut pool_conn).delete(id).await? {
        tracing::info!(project_id = %id, "Project deleted");
        Ok(AxumJson(MessageResponse::new("Project deleted successfully")))
    } else {
        Err(project_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{
            notifications::NotificationKind,
            projects::{ProjectListResponse, ProjectPhase, ProjectResponse, ProjectStatus},
            users::Role,
        },
        db::models::users::UserDBResponse,
        test_utils::*,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::PgPool;
    use std::time::Duration;
    use uuid::Uuid;

    async fn wait_for_notifications(pool: &PgPool, user_id: Uuid, kind: NotificationKind, expected: i64) -> i64 {
        let mut count = 0;
        for _ in 0..50 {
            count = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND kind = $2")
                .bind(user_id)
                .bind(kind)
                .fetch_one(pool)
                .await
                .unwrap();
            if count >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        count
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_project_as_admin(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;

        let response = app
            .post("/api/v1/projects")
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({
                "title": "Lobby cabin refit",
                "description": "Full interior refit for the lobby elevator",
                "location": "Calle Mayor 1, Madrid",
                "clientId": client.id,
                "startDate": "",
                "budget": 15000.5,
                "workerIds": [worker.id, worker.id]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let project: ProjectResponse = response.json();
        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.current_phase, ProjectPhase::Measurement);
        assert_eq!(project.progress, 0);
        assert_eq!(project.start_date, None);
        assert_eq!(project.client.as_ref().unwrap().id, client.id);
        assert_eq!(project.workers.as_ref().unwrap().len(), 1);

        assert_eq!(wait_for_notifications(&pool, worker.id, NotificationKind::ProjectAssigned, 1).await, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_project_permissions_and_validation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let worker = create_test_user(&pool, Role::Worker).await;

        app.post("/api/v1/projects")
            .add_header(add_auth_headers(&worker).0, add_auth_headers(&worker).1)
            .json(&json!({}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let response = app
            .post("/api/v1/projects")
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({
                "title": "ab",
                "description": "too short",
                "location": "Madrid",
                "clientId": Uuid::new_v4(),
                "progress": 101
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let fields: Vec<String> = response.json::<serde_json::Value>()["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert!(fields.contains(&"title".to_string()));
        assert!(fields.contains(&"description".to_string()));
        assert!(fields.contains(&"progress".to_string()));

        // Unknown client is a bad reference
        app.post("/api/v1/projects")
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({
                "title": "Lobby cabin refit",
                "description": "Full interior refit for the lobby elevator",
                "location": "Calle Mayor 1, Madrid",
                "clientId": Uuid::new_v4()
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    async fn list_as(app: &TestServer, user: &UserDBResponse) -> Vec<ProjectResponse> {
        list_query(app, user, "").await
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_projects_is_role_scoped(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client_a = create_test_user(&pool, Role::Client).await;
        let client_b = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;

        let a = create_test_project(&pool, client_a.id, &[worker.id]).await;
        let b = create_test_project(&pool, client_b.id, &[]).await;

        assert_eq!(list_as(&app, &admin).await.len(), 2);

        let for_a = list_as(&app, &client_a).await;
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].id, a.id);
        let counts = for_a[0].count.as_ref().unwrap();
        assert_eq!((counts.images, counts.comments), (0, 0));

        let for_worker = list_as(&app, &worker).await;
        assert_eq!(for_worker.len(), 1);
        assert_eq!(for_worker[0].id, a.id);

        // clientId is honoured for administrators only
        let body: ProjectListResponse = app
            .get(&format!("/api/v1/projects?clientId={}", client_b.id))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .json();
        assert_eq!(body.projects.len(), 1);
        assert_eq!(body.projects[0].id, b.id);

        let body: ProjectListResponse = app
            .get(&format!("/api/v1/projects?clientId={}", client_b.id))
            .add_header(add_auth_headers(&client_a).0, add_auth_headers(&client_a).1)
            .await
            .json();
        assert_eq!(body.projects.len(), 1);
        assert_eq!(body.projects[0].id, a.id);

        let body: ProjectListResponse = app
            .get("/api/v1/projects?status=ALL&currentPhase=DESIGN")
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .json();
        assert!(body.projects.is_empty());
    }

    async fn list_query(app: &TestServer, user: &UserDBResponse, query: &str) -> Vec<ProjectResponse> {
        app.get(&format!("/api/v1/projects{query}"))
            .add_header(add_auth_headers(user).0, add_auth_headers(user).1)
            .await
            .json::<ProjectListResponse>()
            .projects
    }

    async fn ids(app: &TestServer, user: &UserDBResponse, query: &str) -> Vec<Uuid> {
        list_query(app, user, query).await.into_iter().map(|p| p.id).collect()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_projects_sort_fallback(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;

        let older = create_test_project(&pool, client.id, &[]).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        let newer = create_test_project(&pool, client.id, &[]).await;

        assert_eq!(ids(&app, &admin, "").await, vec![newer.id, older.id]);
        assert_eq!(ids(&app, &admin, "?sortOrder=asc").await, vec![older.id, newer.id]);
        assert_eq!(ids(&app, &admin, "?sortBy=createdAt&sortOrder=asc").await, vec![older.id, newer.id]);
        // An unrecognised field sorts by creation, newest first, whatever the order says
        assert_eq!(ids(&app, &admin, "?sortBy=bogus&sortOrder=asc").await, vec![newer.id, older.id]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_projects_search_is_literal(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;
        let project = create_test_project(&pool, client.id, &[]).await;

        assert_eq!(ids(&app, &admin, "?search=MAYOR").await, vec![project.id]);

        for literal in ["%25", "_", "c_bin"] {
            let found = list_query(&app, &admin, &format!("?search={literal}")).await;
            assert!(found.is_empty(), "search {literal} matched {} projects", found.len());
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_project_access(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let client = create_test_user(&pool, Role::Client).await;
        let other_client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;
        let outsider = create_test_user(&pool, Role::Worker).await;
        let project = create_test_project(&pool, client.id, &[worker.id]).await;

        for user in [&client, &worker] {
            let response = app
                .get(&format!("/api/v1/projects/{}", project.id))
                .add_header(add_auth_headers(user).0, add_auth_headers(user).1)
                .await;
            response.assert_status_ok();
            let detail: ProjectResponse = response.json();
            assert_eq!(detail.images.as_ref().unwrap().len(), 0);
            let phases = detail.phases.unwrap();
            assert_eq!(phases.len(), 1);
            assert_eq!(phases[0].notes.as_deref(), Some("Initial project phase"));
        }

        for user in [&other_client, &outsider] {
            app.get(&format!("/api/v1/projects/{}", project.id))
                .add_header(add_auth_headers(user).0, add_auth_headers(user).1)
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }

        app.get(&format!("/api/v1/projects/{}", Uuid::new_v4()))
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_phase_status_and_workers(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;
        let newcomer = create_test_user(&pool, Role::Worker).await;
        let project = create_test_project(&pool, client.id, &[worker.id]).await;

        let response = app
            .put(&format!("/api/v1/projects/{}", project.id))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({
                "currentPhase": "DESIGN",
                "status": "COMPLETED",
                "progress": 100,
                "workerIds": [worker.id, newcomer.id, newcomer.id]
            }))
            .await;
        response.assert_status_ok();
        let updated: ProjectResponse = response.json();
        assert_eq!(updated.current_phase, ProjectPhase::Design);
        assert_eq!(updated.workers.unwrap().len(), 2);

        assert_eq!(wait_for_notifications(&pool, client.id, NotificationKind::PhaseChange, 1).await, 1);
        assert_eq!(wait_for_notifications(&pool, worker.id, NotificationKind::ProjectCompleted, 1).await, 1);
        assert_eq!(wait_for_notifications(&pool, newcomer.id, NotificationKind::ProjectAssigned, 1).await, 1);
        // Already-assigned workers are not told again
        assert_eq!(wait_for_notifications(&pool, worker.id, NotificationKind::ProjectAssigned, 0).await, 0);

        let detail: ProjectResponse = app
            .get(&format!("/api/v1/projects/{}", project.id))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .json();
        let phases = detail.phases.unwrap();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].notes.as_deref(), Some("Phase change: MEASUREMENT → DESIGN"));
        assert!(phases[1].completed_at.is_some());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_and_delete_errors(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let admin = create_test_user(&pool, Role::Admin).await;
        let client = create_test_user(&pool, Role::Client).await;
        let project = create_test_project(&pool, client.id, &[]).await;

        app.put(&format!("/api/v1/projects/{}", project.id))
            .add_header(add_auth_headers(&client).0, add_auth_headers(&client).1)
            .json(&json!({"title": "Client edit"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        app.put(&format!("/api/v1/projects/{}", Uuid::new_v4()))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({"title": "Valid title"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Validation before existence
        app.put(&format!("/api/v1/projects/{}", Uuid::new_v4()))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .json(&json!({"progress": -1}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.delete(&format!("/api/v1/projects/{}", project.id))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .assert_status_ok();
        app.delete(&format!("/api/v1/projects/{}", project.id))
            .add_header(add_auth_headers(&admin).0, add_auth_headers(&admin).1)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
