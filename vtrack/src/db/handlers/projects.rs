//! Database repository for projects, worker assignments and phase bookkeeping.

use crate::types::{ProjectId, UserId, abbrev_uuid};
use crate::{
    api::models::projects::{ProjectPhase, ProjectSortField, ProjectStatus, SortOrder},
    db::{
        errors::{DbError, Result},
        handlers::{push_search, repository::Repository},
        models::projects::{
            ProjectClientDBSummary, ProjectCountsDBResponse, ProjectCreateDBRequest, ProjectDBResponse, ProjectFilter, ProjectScope,
            ProjectUpdateDBRequest, ProjectUpdateOutcome, ProjectWorkerDBSummary,
        },
    },
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Connection, FromRow, PgConnection, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::instrument;

pub const INITIAL_PHASE_NOTE: &str = "Initial project phase";

pub fn phase_change_note(from: ProjectPhase, to: ProjectPhase) -> String {
    format!("Phase change: {from} → {to}")
}

/// Append a role-scope restriction on the `projects` table aliased as `alias`.
pub(crate) fn push_scope(query: &mut QueryBuilder<'_, Postgres>, scope: ProjectScope, alias: &str) {
    match scope {
        ProjectScope::All => {}
        ProjectScope::ClientOf(user_id) => {
            query.push(format!(" AND {alias}.client_id = "));
            query.push_bind(user_id);
        }
        ProjectScope::AssignedTo(user_id) => {
            query.push(format!(
                " AND EXISTS (SELECT 1 FROM project_workers pw WHERE pw.project_id = {alias}.id AND pw.worker_id = "
            ));
            query.push_bind(user_id);
            query.push(")");
        }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub client_id: UserId,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub progress: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub estimated_end_date: Option<DateTime<Utc>>,
    pub budget: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectDBResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            location: p.location,
            client_id: p.client_id,
            status: p.status,
            current_phase: p.current_phase,
            progress: p.progress,
            start_date: p.start_date,
            estimated_end_date: p.estimated_end_date,
            budget: p.budget,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProjectClientRow {
    project_id: ProjectId,
    #[sqlx(flatten)]
    client: ProjectClientDBSummary,
}

#[derive(Debug, FromRow)]
struct ProjectCountsRow {
    project_id: ProjectId,
    #[sqlx(flatten)]
    counts: ProjectCountsDBResponse,
}

pub struct Projects<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Projects<'c> {
    type CreateRequest = ProjectCreateDBRequest;
    type UpdateRequest = ProjectUpdateDBRequest;
    type Response = ProjectDBResponse;
    type Id = ProjectId;
    type Filter = ProjectFilter;

    /// Insert the project, its worker assignments and the opening phase-history row.
    #[instrument(skip(self, request), fields(client_id = %abbrev_uuid(&request.client_id), workers = request.worker_ids.len()), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, description, location, client_id, status, current_phase,
                progress, start_date, estimated_end_date, budget
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.client_id)
        .bind(request.status)
        .bind(request.current_phase)
        .bind(request.progress)
        .bind(request.start_date)
        .bind(request.estimated_end_date)
        .bind(request.budget)
        .fetch_one(&mut *tx)
        .await?;

        if !request.worker_ids.is_empty() {
            sqlx::query("INSERT INTO project_workers (project_id, worker_id) SELECT $1, UNNEST($2::uuid[])")
                .bind(project.id)
                .bind(request.worker_ids.as_slice())
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("INSERT INTO project_phase_history (project_id, phase, started_at, notes) VALUES ($1, $2, $3, $4)")
            .bind(project.id)
            .bind(project.current_phase)
            .bind(project.created_at)
            .bind(INITIAL_PHASE_NOTE)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(project.into())
    }

    #[instrument(skip(self), fields(project_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(project.map(Into::into))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<ProjectId>) -> Result<HashMap<Self::Id, ProjectDBResponse>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ANY($1)")
            .bind(ids.as_slice())
            .fetch_all(&mut *self.db)
            .await?;

        Ok(projects.into_iter().map(|p| (p.id, p.into())).collect())
    }

    #[instrument(skip(self, filter), fields(scope = ?filter.scope, sort_by = ?filter.sort_by), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::new("SELECT p.* FROM projects p WHERE 1=1");

        push_scope(&mut query, filter.scope, "p");

        push_search(&mut query, &["p.title", "p.description", "p.location"], filter.search.as_deref());

        if let Some(status) = filter.status {
            query.push(" AND p.status = ");
            query.push_bind(status);
        }

        if let Some(phase) = filter.current_phase {
            query.push(" AND p.current_phase = ");
            query.push_bind(phase);
        }

        if let Some(client_id) = filter.client_id {
            query.push(" AND p.client_id = ");
            query.push_bind(client_id);
        }

        let column = match filter.sort_by {
            ProjectSortField::CreatedAt => "p.created_at",
            ProjectSortField::UpdatedAt => "p.updated_at",
            ProjectSortField::Title => "p.title",
            ProjectSortField::Progress => "p.progress",
        };
        let direction = match filter.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        query.push(format!(" ORDER BY {column} {direction}, p.id"));

        let projects = query.build_query_as::<Project>().fetch_all(&mut *self.db).await?;

        Ok(projects.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), fields(project_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        Ok(self.update_with_outcome(id, request).await?.project)
    }
}

impl<'c> Projects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Apply a partial update and report what changed.
    ///
    /// A phase change closes the open history row and opens a new one. A present
    /// `worker_ids` replaces every assignment. Both happen in the same transaction as
    /// the row update.
    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&id)), err)]
    pub async fn update_with_outcome(&mut self, id: ProjectId, request: &ProjectUpdateDBRequest) -> Result<ProjectUpdateOutcome> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

        let previous_workers: Vec<UserId> = sqlx::query_scalar("SELECT worker_id FROM project_workers WHERE project_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                client_id = COALESCE($5, client_id),
                status = COALESCE($6, status),
                current_phase = COALESCE($7, current_phase),
                progress = COALESCE($8, progress),
                start_date = CASE WHEN $9 THEN $10 ELSE start_date END,
                estimated_end_date = CASE WHEN $11 THEN $12 ELSE estimated_end_date END,
                budget = CASE WHEN $13 THEN $14 ELSE budget END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.client_id)
        .bind(request.status)
        .bind(request.current_phase)
        .bind(request.progress)
        .bind(request.start_date.is_some())
        .bind(request.start_date.flatten())
        .bind(request.estimated_end_date.is_some())
        .bind(request.estimated_end_date.flatten())
        .bind(request.budget.is_some())
        .bind(request.budget.flatten())
        .fetch_one(&mut *tx)
        .await?;

        if project.current_phase != existing.current_phase {
            sqlx::query("UPDATE project_phase_history SET completed_at = NOW() WHERE project_id = $1 AND completed_at IS NULL")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO project_phase_history (project_id, phase, notes) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(project.current_phase)
                .bind(phase_change_note(existing.current_phase, project.current_phase))
                .execute(&mut *tx)
                .await?;
        }

        let mut added_workers = Vec::new();
        if let Some(worker_ids) = &request.worker_ids {
            sqlx::query("DELETE FROM project_workers WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if !worker_ids.is_empty() {
                sqlx::query("INSERT INTO project_workers (project_id, worker_id) SELECT $1, UNNEST($2::uuid[])")
                    .bind(id)
                    .bind(worker_ids.as_slice())
                    .execute(&mut *tx)
                    .await?;
            }

            added_workers = worker_ids.iter().filter(|w| !previous_workers.contains(w)).copied().collect();
        }

        tx.commit().await?;

        Ok(ProjectUpdateOutcome {
            project: project.into(),
            previous_phase: existing.current_phase,
            previous_status: existing.status,
            added_workers,
        })
    }

    /// Whether `worker_id` holds an assignment on `project_id`.
    #[instrument(skip(self), fields(project_id = %abbrev_uuid(&project_id), worker_id = %abbrev_uuid(&worker_id)), err)]
    pub async fn is_worker_assigned(&mut self, project_id: ProjectId, worker_id: UserId) -> Result<bool> {
        let assigned: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM project_workers WHERE project_id = $1 AND worker_id = $2)")
                .bind(project_id)
                .bind(worker_id)
                .fetch_one(&mut *self.db)
                .await?;

        Ok(assigned)
    }

    #[instrument(skip(self), fields(project_id = %abbrev_uuid(&project_id)), err)]
    pub async fn worker_ids(&mut self, project_id: ProjectId) -> Result<Vec<UserId>> {
        let ids = sqlx::query_scalar("SELECT worker_id FROM project_workers WHERE project_id = $1 ORDER BY assigned_at, worker_id")
            .bind(project_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(ids)
    }

    /// Client contact details for each project, keyed by project.
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn get_clients(&mut self, ids: &[ProjectId]) -> Result<HashMap<ProjectId, ProjectClientDBSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ProjectClientRow>(
            r#"
            SELECT p.id AS project_id, u.id, u.name, u.email, u.phone
            FROM projects p
            JOIN users u ON u.id = p.client_id
            WHERE p.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(|r| (r.project_id, r.client)).collect())
    }

    /// Assigned workers for each project, keyed by project. Projects without workers are absent.
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn get_workers(&mut self, ids: &[ProjectId]) -> Result<HashMap<ProjectId, Vec<ProjectWorkerDBSummary>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ProjectWorkerDBSummary>(
            r#"
            SELECT pw.project_id, u.id AS worker_id, u.name, u.email
            FROM project_workers pw
            JOIN users u ON u.id = pw.worker_id
            WHERE pw.project_id = ANY($1)
            ORDER BY pw.assigned_at, u.name
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.db)
        .await?;

        let mut result: HashMap<ProjectId, Vec<ProjectWorkerDBSummary>> = HashMap::new();
        for row in rows {
            result.entry(row.project_id).or_default().push(row);
        }
        Ok(result)
    }

    /// Image and comment counts for each project, keyed by project.
    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub async fn get_counts(&mut self, ids: &[ProjectId]) -> Result<HashMap<ProjectId, ProjectCountsDBResponse>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ProjectCountsRow>(
            r#"
            SELECT
                p.id AS project_id,
                (SELECT COUNT(*) FROM project_images i WHERE i.project_id = p.id) AS images,
                (SELECT COUNT(*) FROM comments c WHERE c.project_id = p.id) AS comments
            FROM projects p
            WHERE p.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(|r| (r.project_id, r.counts)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::db::handlers::PhaseHistory;
    use crate::test_utils::create_test_user;
    use sqlx::PgPool;

    fn create_request(client_id: UserId, worker_ids: Vec<UserId>) -> ProjectCreateDBRequest {
        ProjectCreateDBRequest {
            title: "Lobby cabin refit".to_string(),
            description: "Full interior refit for the lobby elevator".to_string(),
            location: "Calle Mayor 1, Madrid".to_string(),
            client_id,
            status: ProjectStatus::Pending,
            current_phase: ProjectPhase::Measurement,
            progress: 0,
            start_date: None,
            estimated_end_date: None,
            budget: Some(Decimal::new(1250050, 2)),
            worker_ids,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_records_workers_and_initial_phase(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Projects::new(&mut conn);
        let project = repo.create(&create_request(client.id, vec![worker.id])).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.budget, Some(Decimal::new(1250050, 2)));
        assert_eq!(repo.worker_ids(project.id).await.unwrap(), vec![worker.id]);
        assert!(repo.is_worker_assigned(project.id, worker.id).await.unwrap());
        assert!(!repo.is_worker_assigned(project.id, client.id).await.unwrap());

        let history = PhaseHistory::new(&mut conn).list_for_project(project.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].phase, ProjectPhase::Measurement);
        assert_eq!(history[0].notes.as_deref(), Some(INITIAL_PHASE_NOTE));
        assert!(history[0].completed_at.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_with_unknown_client_rolls_back(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Projects::new(&mut conn);

        let err = repo.create(&create_request(uuid::Uuid::new_v4(), vec![])).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects").fetch_one(&pool).await.unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_phase_change_closes_open_history(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Projects::new(&mut conn);
        let project = repo.create(&create_request(client.id, vec![])).await.unwrap();

        let outcome = repo
            .update_with_outcome(
                project.id,
                &ProjectUpdateDBRequest {
                    current_phase: Some(ProjectPhase::Design),
                    progress: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.phase_changed());
        assert!(!outcome.became_completed());
        assert_eq!(outcome.project.progress, 20);

        // Same phase again: no new history row
        let outcome = repo
            .update_with_outcome(
                project.id,
                &ProjectUpdateDBRequest {
                    current_phase: Some(ProjectPhase::Design),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!outcome.phase_changed());

        let history = PhaseHistory::new(&mut conn).list_for_project(project.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].phase, ProjectPhase::Design);
        assert_eq!(history[0].notes.as_deref(), Some("Phase change: MEASUREMENT → DESIGN"));
        assert!(history[0].completed_at.is_none());
        assert_eq!(history[1].phase, ProjectPhase::Measurement);
        assert!(history[1].completed_at.is_some());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_replaces_workers_and_clears_fields(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let w1 = create_test_user(&pool, Role::Worker).await;
        let w2 = create_test_user(&pool, Role::Worker).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Projects::new(&mut conn);
        let project = repo.create(&create_request(client.id, vec![w1.id])).await.unwrap();

        let outcome = repo
            .update_with_outcome(
                project.id,
                &ProjectUpdateDBRequest {
                    worker_ids: Some(vec![w1.id, w2.id]),
                    budget: Some(None),
                    status: Some(ProjectStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.added_workers, vec![w2.id]);
        assert!(outcome.became_completed());
        assert_eq!(outcome.project.budget, None);
        assert_eq!(outcome.project.title, project.title);

        let outcome = repo
            .update_with_outcome(
                project.id,
                &ProjectUpdateDBRequest {
                    worker_ids: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.added_workers.is_empty());
        assert!(!outcome.became_completed(), "already completed");
        assert!(repo.worker_ids(project.id).await.unwrap().is_empty());

        let missing = repo
            .update_with_outcome(uuid::Uuid::new_v4(), &ProjectUpdateDBRequest::default())
            .await;
        assert!(matches!(missing, Err(DbError::NotFound)));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_applies_scope_filters_and_sort(pool: PgPool) {
        let client_a = create_test_user(&pool, Role::Client).await;
        let client_b = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Projects::new(&mut conn);

        let mut first = create_request(client_a.id, vec![worker.id]);
        first.title = "Alpha tower".to_string();
        first.progress = 80;
        let first = repo.create(&first).await.unwrap();

        let mut second = create_request(client_b.id, vec![]);
        second.title = "Beta plaza".to_string();
        second.location = "Gran Via 10".to_string();
        second.status = ProjectStatus::InProgress;
        second.progress = 30;
        let second = repo.create(&second).await.unwrap();

        let all = repo.list(&ProjectFilter::new(ProjectScope::All)).await.unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        let mine = repo.list(&ProjectFilter::new(ProjectScope::ClientOf(client_a.id))).await.unwrap();
        assert_eq!(mine.iter().map(|p| p.id).collect::<Vec<_>>(), vec![first.id]);

        let assigned = repo.list(&ProjectFilter::new(ProjectScope::AssignedTo(worker.id))).await.unwrap();
        assert_eq!(assigned.iter().map(|p| p.id).collect::<Vec<_>>(), vec![first.id]);

        let mut filter = ProjectFilter::new(ProjectScope::All);
        filter.search = Some("GRAN via".to_string());
        assert_eq!(repo.list(&filter).await.unwrap().len(), 1);

        let mut filter = ProjectFilter::new(ProjectScope::All);
        filter.status = Some(ProjectStatus::InProgress);
        assert_eq!(repo.list(&filter).await.unwrap()[0].id, second.id);

        let mut filter = ProjectFilter::new(ProjectScope::All);
        filter.sort_by = ProjectSortField::Progress;
        filter.sort_order = SortOrder::Asc;
        let by_progress = repo.list(&filter).await.unwrap();
        assert_eq!(by_progress[0].progress, 30);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_related_lookups_and_delete(pool: PgPool) {
        let client = create_test_user(&pool, Role::Client).await;
        let worker = create_test_user(&pool, Role::Worker).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Projects::new(&mut conn);
        let project = repo.create(&create_request(client.id, vec![worker.id])).await.unwrap();

        sqlx::query("INSERT INTO comments (content, project_id, user_id) VALUES ('hi', $1, $2)")
            .bind(project.id)
            .bind(client.id)
            .execute(&pool)
            .await
            .unwrap();

        let mut repo = Projects::new(&mut conn);
        let clients = repo.get_clients(&[project.id]).await.unwrap();
        assert_eq!(clients[&project.id].id, client.id);

        let workers = repo.get_workers(&[project.id]).await.unwrap();
        assert_eq!(workers[&project.id][0].worker_id, worker.id);

        let counts = repo.get_counts(&[project.id]).await.unwrap();
        assert_eq!(counts[&project.id], ProjectCountsDBResponse { images: 0, comments: 1 });

        assert!(repo.delete(project.id).await.unwrap());
        assert!(!repo.delete(project.id).await.unwrap());
        let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments").fetch_one(&pool).await.unwrap();
        assert_eq!(comments, 0, "comments cascade with the project");
    }
}
