use crate::{
    AppState,
    api::{
        extract::{Json, Query},
        models::notifications::{
            ListNotificationsQuery, MarkNotificationsRead, MarkReadResponse, NotificationListResponse, NotificationResponse,
        },
    },
    auth::permissions::{RequiresPermission, operation, resource},
    db::{handlers::Notifications, models::notifications::NotificationFilter},
    errors::{Error, Result},
};
use axum::{Json as AxumJson, extract::State};

/// Most notifications returned by a single listing.
const LIST_LIMIT: i64 = 50;

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    summary = "List own notifications",
    description = "Newest first, at most 50. `unreadCount` counts every unread notification, not just the returned page.",
    params(ListNotificationsQuery),
    responses(
        (status = 200, description = "Notifications and unread count", body = NotificationListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
    current_user: RequiresPermission<resource::Notifications, operation::ReadOwn>,
) -> Result<AxumJson<NotificationListResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Notifications::new(&mut pool_conn);

    let notifications = repo
        .list(&NotificationFilter {
            user_id: current_user.id,
            unread_only: query.unread_only(),
            limit: LIST_LIMIT,
        })
        .await?;
    let unread_count = repo.unread_count(current_user.id).await?;

    Ok(AxumJson(NotificationListResponse {
        notifications: notifications.into_iter().map(NotificationResponse::from).collect(),
        unread_count,
    }))
}

#[utoipa::path(
    put,
    path = "/notifications",
    tag = "notifications",
    summary = "Mark notifications as read",
    description = "Ids that belong to other users are ignored.",
    request_body = MarkNotificationsRead,
    responses(
        (status = 200, description = "Notifications marked read", body = MarkReadResponse),
        (status = 400, description = "Empty id list"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn mark_notifications_read(
    State(state): State<AppState>,
    current_user: RequiresPermission<resource::Notifications, operation::UpdateOwn>,
    Json(request): Json<MarkNotificationsRead>,
) -> Result<AxumJson<MarkReadResponse>> {
    request.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let count = Notifications::new(&mut pool_conn)
        .mark_read(current_user.id, &request.notification_ids)
        .await?;

    Ok(AxumJson(MarkReadResponse {
        message: "Notifications marked as read".to_string(),
        count,
    }))
}

#[utoipa::path(
    delete,
    path = "/notifications",
    tag = "notifications",
    summary = "Mark all notifications as read",
    responses(
        (status = 200, description = "All notifications marked read", body = MarkReadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    current_user: RequiresPermission<resource::Notifications, operation::UpdateOwn>,
) -> Result<AxumJson<MarkReadResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let count = Notifications::new(&mut pool_conn).mark_all_read(current_user.id).await?;

    Ok(AxumJson(MarkReadResponse {
        message: "All notifications marked as read".to_string(),
        count,
    }))
}
