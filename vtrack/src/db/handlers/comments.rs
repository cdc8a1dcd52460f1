//! Database repository for comments.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::comments::{CommentCreateDBRequest, CommentDBResponse, CommentFilter, CommentUpdateDBRequest},
};
use crate::types::{CommentId, abbrev_uuid};
use sqlx::{PgConnection, QueryBuilder};
use std::collections::HashMap;
use tracing::instrument;

const AUTHOR_COLUMNS: &str = "u.name AS author_name, u.email AS author_email, u.image AS author_image, u.role AS author_role";

pub struct Comments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Comments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Comments<'c> {
    type CreateRequest = CommentCreateDBRequest;
    type UpdateRequest = CommentUpdateDBRequest;
    type Response = CommentDBResponse;
    type Id = CommentId;
    type Filter = CommentFilter;

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&request.project_id), user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let comment = sqlx::query_as::<_, CommentDBResponse>(&format!(
            r#"
            WITH c AS (
                INSERT INTO comments (content, project_id, user_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT c.*, {AUTHOR_COLUMNS}
            FROM c JOIN users u ON u.id = c.user_id
            "#
        ))
        .bind(request.content.trim())
        .bind(request.project_id)
        .bind(request.user_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(comment)
    }

    #[instrument(skip(self), fields(comment_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let comment = sqlx::query_as::<_, CommentDBResponse>(&format!(
            "SELECT c.*, {AUTHOR_COLUMNS} FROM comments c JOIN users u ON u.id = c.user_id WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(comment)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<CommentId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let comments = sqlx::query_as::<_, CommentDBResponse>(&format!(
            "SELECT c.*, {AUTHOR_COLUMNS} FROM comments c JOIN users u ON u.id = c.user_id WHERE c.id = ANY($1)"
        ))
        .bind(ids.as_slice())
        .fetch_all(&mut *self.db)
        .await?;

        Ok(comments.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Comments on one project, newest first.
    #[instrument(skip(self, filter), fields(project_id = %abbrev_uuid(&filter.project_id), limit = ?filter.limit), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT c.*, {AUTHOR_COLUMNS} FROM comments c JOIN users u ON u.id = c.user_id WHERE c.project_id = "
        ));
        query.push_bind(filter.project_id);
        query.push(" ORDER BY c.created_at DESC, c.id");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
        }

        let comments = query.build_query_as::<CommentDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(comments)
    }

    #[instrument(skip(self), fields(comment_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(comment_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let comment = sqlx::query_as::<_, CommentDBResponse>(&format!(
            r#"
            WITH c AS (
                UPDATE comments SET content = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT c.*, {AUTHOR_COLUMNS}
            FROM c JOIN users u ON u.id = c.user_id
            "#
        ))
        .bind(id)
        .bind(request.content.trim())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_project, create_test_user};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_comment_lifecycle(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let project = create_test_project(&pool, client.id, &[]).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Comments::new(&mut conn);

        let created = repo
            .create(&CommentCreateDBRequest {
                content: "  Please use brushed steel  ".to_string(),
                project_id: project.id,
                user_id: client.id,
            })
            .await
            .unwrap();
        assert_eq!(created.content, "Please use brushed steel");
        assert_eq!(created.author_name, client.name);
        assert_eq!(created.author_role, Role::Client);

        let updated = repo
            .update(
                created.id,
                &CommentUpdateDBRequest {
                    content: "Mirror finish instead".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "Mirror finish instead");
        assert!(updated.updated_at >= created.updated_at);

        let bulk = repo.get_bulk(vec![created.id]).await.unwrap();
        assert!(bulk.contains_key(&created.id));

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.update(created.id, &CommentUpdateDBRequest { content: "x".to_string() }).await,
            Err(DbError::NotFound)
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_is_newest_first_with_limit(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let project = create_test_project(&pool, client.id, &[]).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Comments::new(&mut conn);
        for n in 0..3 {
            repo.create(&CommentCreateDBRequest {
                content: format!("comment {n}"),
                project_id: project.id,
                user_id: client.id,
            })
            .await
            .unwrap();
        }

        let all = repo
            .list(&CommentFilter {
                project_id: project.id,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].content, "comment 2");

        let limited = repo
            .list(&CommentFilter {
                project_id: project.id,
                limit: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }
}
