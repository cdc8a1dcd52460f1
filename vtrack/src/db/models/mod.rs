//! Database record models matching table schemas.
//!
//! This module contains struct definitions that correspond to database rows and the
//! requests repositories accept. Repositories in [`crate::db::handlers`] return these
//! types; API handlers convert them into [`crate::api::models`] responses.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Response structs match a table row, sometimes joined with the
//!   columns a view needs (a comment carries its author, an image its project)
//! - **SQLx Integration**: Row types derive `sqlx::FromRow` or are converted from a
//!   private row struct inside the repository
//! - **Separation**: Database models are distinct from API models so storage and wire
//!   representations can evolve independently
//! - **Tri-state updates**: nullable columns in update requests are `Option<Option<T>>`;
//!   the outer `None` means "leave unchanged"
//!
//! # Model Categories
//!
//! - [`users`]: accounts, roles and relationship counts
//! - [`projects`]: projects, worker assignments, list filters and role scope
//! - [`phase_history`]: time spent in each installation phase
//! - [`images`]: image metadata and the gallery join
//! - [`comments`]: comments joined with their author
//! - [`notifications`]: per-user notifications
//! - [`dashboard`]: aggregate counts for the dashboard

pub mod comments;
pub mod dashboard;
pub mod images;
pub mod notifications;
pub mod phase_history;
pub mod projects;
pub mod users;
