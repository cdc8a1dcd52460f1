//! Repository implementations for database access.
//!
//! This module provides repository structs for each entity in the system.
//! Repositories wrap a borrowed `PgConnection` and return models from
//! [`crate::db::models`].
//!
//! # Available Repositories
//!
//! - [`Users`]: accounts, lookup by email and relationship counts
//! - [`Projects`]: projects, role-scoped listing, worker assignments and phase bookkeeping
//! - [`PhaseHistory`]: read access to a project's phase timeline
//! - [`Images`]: image metadata and the gallery
//! - [`Comments`]: comments joined with their authors
//! - [`Notifications`]: per-user notifications
//! - [`dashboard`]: aggregate queries (free functions over a pool)
//!
//! # Common Pattern
//!
//! ```ignore
//! use vtrack::db::handlers::{Projects, Repository};
//!
//! async fn example(pool: &sqlx::PgPool, id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Projects::new(&mut conn);
//!     let project = repo.get_by_id(id).await?;
//!     Ok(())
//! }
//! ```
//!
//! Writes that touch several tables (creating a project with its workers and initial
//! phase, updating a project's phase) open their own transaction on the borrowed
//! connection, so callers may pass a plain pooled connection.

pub mod comments;
pub mod dashboard;
pub mod images;
pub mod notifications;
pub mod phase_history;
pub mod projects;
pub mod repository;
pub mod users;

pub use comments::Comments;
pub use images::Images;
pub use notifications::Notifications;
pub use phase_history::PhaseHistory;
pub use projects::Projects;
pub use repository::Repository;
pub use users::Users;

use sqlx::{Postgres, QueryBuilder};

/// Lower-cased `%search%` pattern with `\`, `%` and `_` escaped, so the user's text
/// matches literally. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Push ` AND (LOWER(c1) LIKE $n ESCAPE '\' OR ...)` matching `search` as a
/// case-insensitive substring of any of `columns`. Blank searches push nothing.
pub(crate) fn push_search(query: &mut QueryBuilder<'_, Postgres>, columns: &[&str], search: Option<&str>) {
    let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    let pattern = contains_pattern(search);

    query.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            query.push(" OR ");
        }
        query.push(format!("LOWER({column}) LIKE "));
        query.push_bind(pattern.clone());
        query.push(r" ESCAPE '\'");
    }
    query.push(")");
}
