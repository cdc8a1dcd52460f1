use crate::{
    AppState,
    api::{
        extract::{Json, Query},
        models::{
            MessageResponse,
            users::{ListUsersQuery, Role, UserCounts, UserCreate, UserListResponse, UserResponse, UserUpdate},
            validation::enum_filter,
        },
    },
    auth::{
        password::{self, Argon2Params},
        permissions::{RequiresPermission, operation, resource},
    },
    db::{
        handlers::{Repository, Users, users::UserFilter},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::{Error, Result},
    types::UserId,
};
use axum::{
    Json as AxumJson,
    extract::{Path, State},
    http::StatusCode,
};

fn email_taken() -> Error {
    Error::BadRequest {
        message: "Email is already registered".to_string(),
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::NotFound {
        resource: "User".to_string(),
        id: id.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    summary = "List users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users, newest first, with project counts", body = UserListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    _: RequiresPermission<resource::Users, operation::ReadAll>,
) -> Result<AxumJson<UserListResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut pool_conn);

    let filter = UserFilter::new(enum_filter::<Role>(query.role.as_deref()), query.search);
    let users = repo.list(&filter).await?;

    let ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
    let mut counts = repo.get_counts_bulk(&ids).await?;

    let users = users
        .into_iter()
        .map(|user| {
            let user_counts = counts.remove(&user.id).unwrap_or_default();
            UserResponse::from(user).with_counts(UserCounts::from(user_counts))
        })
        .collect();

    Ok(AxumJson(UserListResponse { users }))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    summary = "Create user",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid data or email already registered"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Users, operation::CreateAll>,
    Json(create): Json<UserCreate>,
) -> Result<(StatusCode, AxumJson<UserResponse>)> {
    create.validate(&state.config.auth.password)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut pool_conn);

    if repo.get_user_by_email(&create.email).await?.is_some() {
        return Err(email_taken());
    }

    let params = Argon2Params::from(&state.config.auth.password);
    let password_hash = password::hash_password_blocking(create.password.clone(), params).await?;

    let user = repo.create(&UserCreateDBRequest::new(create, password_hash)).await?;
    tracing::info!(user_id = %user.id, role = ?user.role, "User created");

    Ok((StatusCode::CREATED, AxumJson(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    summary = "Get user",
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with project and comment counts", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    _: RequiresPermission<resource::Users, operation::ReadAll>,
) -> Result<AxumJson<UserResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut pool_conn);

    let user = repo.get_by_id(id).await?.ok_or_else(|| user_not_found(id))?;
    let counts = repo.get_counts(id).await?;

    Ok(AxumJson(UserResponse::from(user).with_counts(UserCounts::from(counts))))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    summary = "Update user",
    request_body = UserUpdate,
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid data or email already registered"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    _: RequiresPermission<resource::Users, operation::UpdateAll>,
    Json(update): Json<UserUpdate>,
) -> Result<AxumJson<UserResponse>> {
    update.validate(&state.config.auth.password)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut pool_conn);

    repo.get_by_id(id).await?.ok_or_else(|| user_not_found(id))?;

    if let Some(email) = &update.email {
        let owner = repo.get_user_by_email(email).await?;
        if owner.is_some_and(|other| other.id != id) {
            return Err(email_taken());
        }
    }

    let password_hash = match &update.password {
        Some(password) => {
            let params = Argon2Params::from(&state.config.auth.password);
            Some(password::hash_password_blocking(password.clone(), params).await?)
        }
        None => None,
    };

    let user = repo.update(id, &UserUpdateDBRequest::new(update, password_hash)).await?;
    Ok(AxumJson(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    summary = "Delete user",
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete yourself, or the user is still a project client"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    current_user: RequiresPermission<resource::Users, operation::DeleteAll>,
) -> Result<AxumJson<MessageResponse>> {
    if current_user.id == id {
        return Err(Error::BadRequest {
            message: "You cannot delete your own account".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut pool_conn);

    if repo.delete(id).await? {
        tracing::info!(user_id = %id, "User deleted");
        Ok(AxumJson(MessageResponse::new("User deleted successfully")))
    } else {
        Err(user_not_found(id))
    }
}
