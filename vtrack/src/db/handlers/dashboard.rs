//! Aggregate queries behind the dashboard.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::projects::push_scope,
    models::{
        dashboard::{ProjectStatsDBResponse, RecentProjectDBResponse},
        projects::ProjectScope,
    },
};

const ACTIVE: &str = "p.status IN ('PENDING', 'IN_PROGRESS', 'PAUSED')";

/// Midnight UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Counts and progress averages over the projects in `scope`.
#[instrument(skip(db), err)]
pub async fn get_project_stats(db: &PgPool, scope: ProjectScope, month_start: DateTime<Utc>) -> Result<ProjectStatsDBResponse> {
    let mut query = QueryBuilder::new(format!(
        "SELECT \
            COUNT(*) FILTER (WHERE {ACTIVE}) AS active, \
            COUNT(*) FILTER (WHERE p.status = 'IN_PROGRESS') AS in_progress, \
            COUNT(*) FILTER (WHERE p.status = 'COMPLETED') AS completed, \
            COUNT(*) FILTER (WHERE {ACTIVE} AND p.created_at >= "
    ));
    query.push_bind(month_start);
    query.push(") AS active_created_this_month, COUNT(*) FILTER (WHERE p.status = 'COMPLETED' AND p.updated_at >= ");
    query.push_bind(month_start);
    query.push(format!(
        ") AS completed_this_month, \
            (AVG(p.progress) FILTER (WHERE {ACTIVE}))::float8 AS average_progress, \
            (AVG(p.progress) FILTER (WHERE {ACTIVE} AND p.updated_at < "
    ));
    query.push_bind(month_start);
    query.push("))::float8 AS previous_average_progress FROM projects p WHERE 1=1");

    push_scope(&mut query, scope, "p");

    let stats = query.build_query_as::<ProjectStatsDBResponse>().fetch_one(db).await?;

    Ok(stats)
}

/// Most recently updated projects in `scope`, with their client's name.
#[instrument(skip(db), err)]
pub async fn get_recent_projects(db: &PgPool, scope: ProjectScope, limit: i64) -> Result<Vec<RecentProjectDBResponse>> {
    let mut query = QueryBuilder::new(
        "SELECT p.id, p.title, p.status, p.current_phase, p.progress, p.updated_at, u.name AS client_name \
         FROM projects p JOIN users u ON u.id = p.client_id WHERE 1=1",
    );

    push_scope(&mut query, scope, "p");

    query.push(" ORDER BY p.updated_at DESC, p.id LIMIT ");
    query.push_bind(limit);

    let projects = query.build_query_as::<RecentProjectDBResponse>().fetch_all(db).await?;

    Ok(projects)
}
