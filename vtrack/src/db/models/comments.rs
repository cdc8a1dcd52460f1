//! Database models for comments.

use crate::api::models::users::Role;
use crate::types::{CommentId, ProjectId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CommentCreateDBRequest {
    pub content: String,
    pub project_id: ProjectId,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct CommentUpdateDBRequest {
    pub content: String,
}

/// Filter for listing a project's comments
#[derive(Debug, Clone)]
pub struct CommentFilter {
    pub project_id: ProjectId,
    pub limit: Option<i64>,
}

/// A comment joined with its author.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentDBResponse {
    pub id: CommentId,
    pub content: String,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
    pub author_image: Option<String>,
    pub author_role: Role,
}
