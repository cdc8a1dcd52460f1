//! The CRUD surface shared by the entity repositories.

use std::collections::HashMap;

use crate::db::errors::Result;

/// CRUD over one table.
///
/// Implemented by [`Users`](super::Users), [`Projects`](super::Projects) and
/// [`Comments`](super::Comments). Each borrows a `&mut PgConnection`, so the caller decides
/// whether the calls share a transaction. Queries that do not fit this shape (gallery joins,
/// counts, phase history, notification fan-out) are inherent methods on the repository instead.
#[async_trait::async_trait]
pub trait Repository {
    /// Validated, normalised input for an insert
    type CreateRequest;

    /// Partial update; `None` fields are left alone
    type UpdateRequest;

    /// The row as returned to callers
    type Response;

    type Id: Send + Sync;

    /// Narrows [`list`](Repository::list)
    type Filter: Send + Sync;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// Rows for `ids`, keyed by id. Missing ids are absent from the map.
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>>;

    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// `false` when no row had that id
    async fn delete(&mut self, id: Self::Id) -> Result<bool>;

    /// Fails with [`DbError::NotFound`](crate::db::errors::DbError::NotFound) when no row had that id
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;
}
