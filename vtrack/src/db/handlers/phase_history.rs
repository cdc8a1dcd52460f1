//! Database repository for project phase history.

use crate::db::{errors::Result, models::phase_history::PhaseHistoryDBResponse};
use crate::types::{ProjectId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct PhaseHistory<'c> {
    db: &'c mut PgConnection,
}

impl<'c> PhaseHistory<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Full history for a project, most recent phase first.
    #[instrument(skip(self), fields(project_id = %abbrev_uuid(&project_id)), err)]
    pub async fn list_for_project(&mut self, project_id: ProjectId) -> Result<Vec<PhaseHistoryDBResponse>> {
        let rows = sqlx::query_as::<_, PhaseHistoryDBResponse>(
            "SELECT * FROM project_phase_history WHERE project_id = $1 ORDER BY started_at DESC, id",
        )
        .bind(project_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }
}
