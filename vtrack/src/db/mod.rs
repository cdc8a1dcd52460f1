//! Database layer for data persistence and access.
//!
//! SQLx over PostgreSQL, organised as one repository per table:
//!
//! - [`handlers`]: repositories ([`handlers::Users`], [`handlers::Projects`], [`handlers::Images`],
//!   [`handlers::Comments`], [`handlers::Notifications`], [`handlers::PhaseHistory`]) and the
//!   dashboard aggregates
//! - [`models`]: the records they read and write
//! - [`errors`]: [`errors::DbError`], which classifies constraint violations so the API layer can
//!   turn them into 400/404/409 responses
//!
//! Queries are built at runtime with `sqlx::query_as` and `QueryBuilder`; there is no offline
//! query cache to keep in sync.
//!
//! # Connections and transactions
//!
//! Repositories borrow a `&mut PgConnection`. Take one from the pool for single statements, or
//! from a transaction when several writes must land together:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let outcome = Projects::new(&mut tx).update_with_outcome(id, &request).await?;
//! tx.commit().await?;
//! // only now tell anyone about it
//! notifier.phase_change(id, outcome.previous_phase, outcome.project.current_phase);
//! ```
//!
//! Scoping by role happens here too: list queries take a
//! [`models::projects::ProjectScope`] and add the matching `client_id` or `project_workers`
//! condition, so a listing can never include a project the caller is not attached to.
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and run on startup through [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
