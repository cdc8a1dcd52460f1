use crate::{
    AppState,
    api::models::dashboard::{DashboardResponse, DashboardStats, RecentActivity, StatCard},
    auth::permissions::{RequiresPermission, operation, project_scope, resource},
    db::{
        handlers::dashboard::{get_project_stats, get_recent_projects, month_start},
        models::dashboard::ProjectStatsDBResponse,
    },
    errors::Result,
};
use axum::{Json as AxumJson, extract::State};
use chrono::Utc;

const RECENT_ACTIVITY_LIMIT: i64 = 10;

fn rounded(value: Option<f64>) -> i64 {
    value.map(|v| v.round() as i64).unwrap_or(0)
}

fn monthly_card(value: i64, this_month: i64) -> StatCard {
    StatCard {
        value,
        change: Some(this_month),
        change_text: format!("+{this_month} this month"),
        change_positive: Some(this_month > 0),
    }
}

/// Shape raw aggregates into the four headline cards.
pub(crate) fn build_stats(raw: &ProjectStatsDBResponse) -> DashboardStats {
    let in_progress_share = if raw.active > 0 {
        (raw.in_progress as f64 / raw.active as f64 * 100.0).round() as i64
    } else {
        0
    };

    let average = rounded(raw.average_progress);
    let diff = average - rounded(raw.previous_average_progress);
    let diff_text = if diff >= 0 {
        format!("+{diff}% vs last month")
    } else {
        format!("{diff}% vs last month")
    };

    DashboardStats {
        active_projects: monthly_card(raw.active, raw.active_created_this_month),
        in_progress: StatCard {
            value: raw.in_progress,
            change: None,
            change_text: format!("{in_progress_share}% of active"),
            change_positive: None,
        },
        completed: monthly_card(raw.completed, raw.completed_this_month),
        average_progress: StatCard {
            value: average,
            change: Some(diff),
            change_text: diff_text,
            change_positive: Some(diff >= 0),
        },
    }
}

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    summary = "Dashboard summary",
    description = "Headline figures and recent activity over the projects the caller can see. Month boundaries are UTC.",
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    current_user: RequiresPermission<resource::Dashboard, operation::ReadOwn>,
) -> Result<AxumJson<DashboardResponse>> {
    let scope = project_scope(&current_user);

    let (raw, recent) = tokio::try_join!(
        get_project_stats(&state.db, scope, month_start(Utc::now())),
        get_recent_projects(&state.db, scope, RECENT_ACTIVITY_LIMIT),
    )?;

    Ok(AxumJson(DashboardResponse {
        stats: build_stats(&raw),
        recent_activity: recent.into_iter().map(RecentActivity::from).collect(),
    }))
}
