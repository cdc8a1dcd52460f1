//! API request/response models for project comments.

use crate::api::models::users::Role;
use crate::api::models::validation::Validator;
use crate::db::models::comments::CommentDBResponse;
use crate::errors::Result;
use crate::types::{CommentId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreate {
    pub content: String,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
}

impl CommentCreate {
    pub fn validate(&self) -> Result<()> {
        validate_content(&self.content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentUpdate {
    pub content: String,
}

impl CommentUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_content(&self.content)
    }
}

fn validate_content(content: &str) -> Result<()> {
    let mut v = Validator::new();
    v.length("content", content.trim(), 1, 2000);
    v.finish()
}

/// Author details embedded in a comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentAuthor {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CommentId,
    pub content: String,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: CommentAuthor,
}

impl CommentResponse {
    /// Full author details (comment listings and writes).
    pub fn detailed(db: CommentDBResponse) -> Self {
        let user = CommentAuthor {
            id: db.user_id,
            name: db.author_name.clone(),
            email: Some(db.author_email.clone()),
            image: db.author_image.clone(),
            role: Some(db.author_role),
        };
        Self::with_author(db, user)
    }

    /// Author name and avatar only (embedded in project details).
    pub fn brief(db: CommentDBResponse) -> Self {
        let user = CommentAuthor {
            id: db.user_id,
            name: db.author_name.clone(),
            email: None,
            image: db.author_image.clone(),
            role: None,
        };
        Self::with_author(db, user)
    }

    fn with_author(db: CommentDBResponse, user: CommentAuthor) -> Self {
        Self {
            id: db.id,
            content: db.content,
            project_id: db.project_id,
            user_id: db.user_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
}

/// Query parameters for listing comments
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    /// Project whose comments to list (required)
    #[schema(value_type = Option<String>, format = "uuid")]
    #[param(value_type = Option<String>, format = "uuid")]
    pub project_id: Option<ProjectId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed_before_length_check() {
        let blank = CommentUpdate {
            content: "   \n ".to_string(),
        };
        assert!(blank.validate().is_err());

        let long = CommentUpdate {
            content: "a".repeat(2001),
        };
        assert!(long.validate().is_err());

        let ok = CommentUpdate {
            content: "  Looks great  ".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
