//! API request/response models for in-app notifications.

use crate::api::models::validation::Validator;
use crate::db::models::notifications::NotificationDBResponse;
use crate::errors::Result;
use crate::types::{NotificationId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "notification_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewComment,
    NewImage,
    PhaseChange,
    ProjectCompleted,
    ProjectAssigned,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationProject {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProjectId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: NotificationId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub project_id: Option<ProjectId>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub project: Option<NotificationProject>,
}

impl From<NotificationDBResponse> for NotificationResponse {
    fn from(db: NotificationDBResponse) -> Self {
        let project = match (db.project_id, db.project_title) {
            (Some(id), Some(title)) => Some(NotificationProject { id, title }),
            _ => None,
        };
        Self {
            id: db.id,
            user_id: db.user_id,
            project_id: db.project_id,
            kind: db.kind,
            title: db.title,
            message: db.message,
            read: db.read,
            created_at: db.created_at,
            project,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
}

/// Query parameters for listing notifications
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    /// Only return unread notifications when `true`
    pub unread_only: Option<String>,
}

impl ListNotificationsQuery {
    pub fn unread_only(&self) -> bool {
        self.unread_only.as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkNotificationsRead {
    #[schema(value_type = Vec<String>)]
    pub notification_ids: Vec<NotificationId>,
}

impl MarkNotificationsRead {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.check(!self.notification_ids.is_empty(), "notificationIds", "At least one notification is required");
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkReadResponse {
    pub message: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_only_requires_literal_true() {
        let q = ListNotificationsQuery {
            unread_only: Some("true".to_string()),
        };
        assert!(q.unread_only());
        let q = ListNotificationsQuery {
            unread_only: Some("1".to_string()),
        };
        assert!(!q.unread_only());
        assert!(!ListNotificationsQuery::default().unread_only());
    }

    #[test]
    fn empty_id_list_is_rejected() {
        let req = MarkNotificationsRead { notification_ids: vec![] };
        assert!(req.validate().is_err());
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_value(NotificationKind::PhaseChange).unwrap();
        assert_eq!(json, "PHASE_CHANGE");
    }
}
