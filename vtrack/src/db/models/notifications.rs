//! Database models for notifications.

use crate::api::models::notifications::NotificationKind;
use crate::types::{NotificationId, ProjectId, UserId};
use chrono::{DateTime, Utc};

/// One notification to insert. Fan-out builds several and inserts them together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCreateDBRequest {
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationDBResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub project_title: Option<String>,
}

/// Filter for listing a user's notifications
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    pub user_id: UserId,
    pub unread_only: bool,
    pub limit: i64,
}
