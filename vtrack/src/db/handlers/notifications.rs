//! Database repository for notifications.

use crate::db::{
    errors::Result,
    models::notifications::{NotificationCreateDBRequest, NotificationDBResponse, NotificationFilter},
};
use crate::types::{NotificationId, UserId, abbrev_uuid};
use sqlx::{PgConnection, QueryBuilder};
use tracing::instrument;

pub struct Notifications<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Notifications<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert all rows in one statement and return how many were written.
    #[instrument(skip(self, requests), fields(count = requests.len()), err)]
    pub async fn create_many(&mut self, requests: &[NotificationCreateDBRequest]) -> Result<u64> {
        if requests.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::new("INSERT INTO notifications (user_id, project_id, kind, title, message) ");
        query.push_values(requests, |mut row, n| {
            row.push_bind(n.user_id)
                .push_bind(n.project_id)
                .push_bind(n.kind)
                .push_bind(&n.title)
                .push_bind(&n.message);
        });

        let result = query.build().execute(&mut *self.db).await?;

        Ok(result.rows_affected())
    }

    /// A user's notifications, newest first, each with its project title when it has one.
    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id), unread_only = filter.unread_only), err)]
    pub async fn list(&mut self, filter: &NotificationFilter) -> Result<Vec<NotificationDBResponse>> {
        let mut query = QueryBuilder::new(
            "SELECT n.*, p.title AS project_title FROM notifications n LEFT JOIN projects p ON p.id = n.project_id WHERE n.user_id = ",
        );
        query.push_bind(filter.user_id);

        if filter.unread_only {
            query.push(" AND n.read = FALSE");
        }

        query.push(" ORDER BY n.created_at DESC, n.id LIMIT ");
        query.push_bind(filter.limit);

        let notifications = query
            .build_query_as::<NotificationDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;

        Ok(notifications)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn unread_count(&mut self, user_id: UserId) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE")
            .bind(user_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Mark the given notifications read. Ids owned by other users are ignored.
    #[instrument(skip(self, ids), fields(user_id = %abbrev_uuid(&user_id), count = ids.len()), err)]
    pub async fn mark_read(&mut self, user_id: UserId, ids: &[NotificationId]) -> Result<u64> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND id = ANY($2)")
            .bind(user_id)
            .bind(ids)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn mark_all_read(&mut self, user_id: UserId) -> Result<u64> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
            .bind(user_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::notifications::NotificationKind;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_project, create_test_user};
    use sqlx::PgPool;

    fn request(user_id: UserId, project_id: Option<uuid::Uuid>, title: &str) -> NotificationCreateDBRequest {
        NotificationCreateDBRequest {
            user_id,
            project_id,
            kind: NotificationKind::NewComment,
            title: title.to_string(),
            message: format!("{title} message"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_many_and_list(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;
        let project = create_test_project(&pool, client.id, &[worker.id]).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Notifications::new(&mut conn);

        assert_eq!(repo.create_many(&[]).await.unwrap(), 0);
        let written = repo
            .create_many(&[
                request(client.id, Some(project.id), "first"),
                request(worker.id, Some(project.id), "other user"),
                request(client.id, None, "no project"),
            ])
            .await
            .unwrap();
        assert_eq!(written, 3);

        let list = repo
            .list(&NotificationFilter {
                user_id: client.id,
                unread_only: false,
                limit: 50,
            })
            .await
            .unwrap();
        assert_eq!(list.len(), 2);
        let with_project = list.iter().find(|n| n.project_id.is_some()).unwrap();
        assert_eq!(with_project.project_title.as_deref(), Some(project.title.as_str()));
        assert!(list.iter().all(|n| !n.read));

        let limited = repo
            .list(&NotificationFilter {
                user_id: client.id,
                unread_only: false,
                limit: 1,
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_mark_read_is_scoped_to_owner(pool: PgPool) {
        let alice = create_test_user(&pool, Role::Client).await;
        let bob = create_test_user(&pool, Role::Worker).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Notifications::new(&mut conn);
        repo.create_many(&[
            request(alice.id, None, "a1"),
            request(alice.id, None, "a2"),
            request(bob.id, None, "b1"),
        ])
        .await
        .unwrap();

        let filter = |user_id| NotificationFilter {
            user_id,
            unread_only: true,
            limit: 50,
        };
        let alice_ids: Vec<_> = repo.list(&filter(alice.id)).await.unwrap().into_iter().map(|n| n.id).collect();
        let bob_ids: Vec<_> = repo.list(&filter(bob.id)).await.unwrap().into_iter().map(|n| n.id).collect();

        let marked = repo.mark_read(alice.id, &[alice_ids[0], bob_ids[0]]).await.unwrap();
        assert_eq!(marked, 1);
        assert_eq!(repo.unread_count(alice.id).await.unwrap(), 1);
        assert_eq!(repo.unread_count(bob.id).await.unwrap(), 1);
        assert_eq!(repo.list(&filter(alice.id)).await.unwrap().len(), 1);

        assert_eq!(repo.mark_all_read(alice.id).await.unwrap(), 1);
        assert_eq!(repo.mark_all_read(alice.id).await.unwrap(), 0);
        assert_eq!(repo.unread_count(alice.id).await.unwrap(), 0);
    }
}
