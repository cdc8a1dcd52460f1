//! Database models for dashboard aggregates.

use crate::api::models::projects::{ProjectPhase, ProjectStatus};
use crate::types::ProjectId;
use chrono::{DateTime, Utc};

/// Raw aggregates over a caller's projects, before they are shaped into stat cards.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct ProjectStatsDBResponse {
    pub active: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub active_created_this_month: i64,
    pub completed_this_month: i64,
    pub average_progress: Option<f64>,
    pub previous_average_progress: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentProjectDBResponse {
    pub id: ProjectId,
    pub title: String,
    pub status: ProjectStatus,
    pub current_phase: ProjectPhase,
    pub progress: i32,
    pub updated_at: DateTime<Utc>,
    pub client_name: String,
}
