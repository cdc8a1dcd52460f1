//! API models for the dashboard summary.

use crate::api::models::projects::{ProjectPhase, ProjectStatus};
use crate::db::models::dashboard::RecentProjectDBResponse;
use crate::types::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single headline figure with its month-over-month annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub value: i64,
    pub change: Option<i64>,
    pub change_text: String,
    pub change_positive: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_projects: StatCard,
    pub in_progress: StatCard,
    pub completed: StatCard,
    pub average_progress: StatCard,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentActivityClient {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProjectId,
    pub title: String,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub progress: i32,
    pub updated_at: DateTime<Utc>,
    pub client: RecentActivityClient,
}

impl From<RecentProjectDBResponse> for RecentActivity {
    fn from(db: RecentProjectDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            status: db.status,
            current_phase: db.current_phase,
            progress: db.progress,
            updated_at: db.updated_at,
            client: RecentActivityClient { name: db.client_name },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_activity: Vec<RecentActivity>,
}
