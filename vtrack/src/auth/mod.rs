//! Authentication and authorization.
//!
//! Users log in at `/authentication/login` with email and password. On success the server
//! issues a signed JWT carried in an HTTP-only cookie; every `/api/v1` request is
//! authenticated by that cookie and the account it names is re-read from the database.
//!
//! Authorization has two layers:
//!
//! - **Roles**: each of `ADMIN`, `WORKER` and `CLIENT` holds a fixed set of
//!   `(Resource, Operation)` permissions, enforced with
//!   [`permissions::RequiresPermission`].
//! - **Attachment**: non-admins only see projects they are the client of or are
//!   assigned to, see [`permissions::project_scope`] and
//!   [`permissions::can_access_project`].
//!
//! # Modules
//!
//! - [`current_user`]: `CurrentUser` extractor
//! - [`password`]: Argon2id hashing and verification
//! - [`permissions`]: role matrix, scope and access helpers
//! - [`session`]: JWT creation, verification and the session cookie
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use vtrack::auth::permissions::{operation, resource, RequiresPermission};
//!
//! async fn delete_project(
//!     State(state): State<AppState>,
//!     Path(id): Path<ProjectId>,
//!     _: RequiresPermission<resource::Projects, operation::DeleteAll>,
//! ) -> Result<Json<MessageResponse>> {
//!     // ...
//! }
//! ```

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
