//! Role-based permission checks.
//!
//! Every role holds a fixed set of `(Resource, Operation)` pairs. Handlers declare what
//! they need with the [`RequiresPermission`] extractor; per-row rules (is this user the
//! project's client, an assigned worker, the author of a comment) are checked in the
//! handler with the helpers below once the row is loaded.

use std::{marker::PhantomData, ops::Deref};

use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgConnection;

use crate::{
    AppState,
    api::models::users::{CurrentUser, Role},
    db::{handlers::Projects, models::projects::{ProjectDBResponse, ProjectScope}},
    errors::{Error, Result},
    types::{Operation, Permission, Resource},
};

/// Type-level resource markers for [`RequiresPermission`].
pub mod resource {
    use crate::types::Resource;

    pub trait ResourceMarker: Send + Sync + 'static {
        const RESOURCE: Resource;
    }

    macro_rules! resource_marker {
        ($($name:ident),* $(,)?) => {
            $(
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $name;

                impl ResourceMarker for $name {
                    const RESOURCE: Resource = Resource::$name;
                }
            )*
        };
    }

    resource_marker!(Users, Projects, Images, Comments, Notifications, Uploads, Dashboard);
}

/// Type-level operation markers for [`RequiresPermission`].
pub mod operation {
    use crate::types::Operation;

    pub trait OperationMarker: Send + Sync + 'static {
        const OPERATION: Operation;
    }

    macro_rules! operation_marker {
        ($($name:ident),* $(,)?) => {
            $(
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $name;

                impl OperationMarker for $name {
                    const OPERATION: Operation = Operation::$name;
                }
            )*
        };
    }

    operation_marker!(CreateAll, CreateOwn, ReadAll, ReadOwn, UpdateAll, UpdateOwn, DeleteAll, DeleteOwn);
}

use operation::OperationMarker;
use resource::ResourceMarker;

const ALL_OPERATIONS: [Operation; 4] = [Operation::CreateAll, Operation::ReadAll, Operation::UpdateAll, Operation::DeleteAll];

const WORKER_PERMISSIONS: &[(Resource, Operation)] = &[
    (Resource::Projects, Operation::ReadOwn),
    (Resource::Images, Operation::ReadOwn),
    (Resource::Images, Operation::CreateOwn),
    (Resource::Comments, Operation::ReadOwn),
    (Resource::Comments, Operation::CreateOwn),
    (Resource::Comments, Operation::UpdateOwn),
    (Resource::Comments, Operation::DeleteOwn),
    (Resource::Notifications, Operation::ReadOwn),
    (Resource::Notifications, Operation::UpdateOwn),
    (Resource::Uploads, Operation::CreateOwn),
    (Resource::Dashboard, Operation::ReadOwn),
];

const CLIENT_PERMISSIONS: &[(Resource, Operation)] = &[
    (Resource::Projects, Operation::ReadOwn),
    (Resource::Images, Operation::ReadOwn),
    (Resource::Comments, Operation::ReadOwn),
    (Resource::Comments, Operation::CreateOwn),
    (Resource::Comments, Operation::UpdateOwn),
    (Resource::Comments, Operation::DeleteOwn),
    (Resource::Notifications, Operation::ReadOwn),
    (Resource::Notifications, Operation::UpdateOwn),
    (Resource::Dashboard, Operation::ReadOwn),
];

/// The `*All` counterpart of an operation, which always implies it.
fn widened(operation: Operation) -> Operation {
    match operation {
        Operation::CreateOwn => Operation::CreateAll,
        Operation::ReadOwn => Operation::ReadAll,
        Operation::UpdateOwn => Operation::UpdateAll,
        Operation::DeleteOwn => Operation::DeleteAll,
        other => other,
    }
}

fn role_has_permission(role: Role, resource: Resource, operation: Operation) -> bool {
    let held = |op: Operation| match role {
        Role::Admin => ALL_OPERATIONS.contains(&op),
        Role::Worker => WORKER_PERMISSIONS.contains(&(resource, op)),
        Role::Client => CLIENT_PERMISSIONS.contains(&(resource, op)),
    };
    held(operation) || held(widened(operation))
}

/// Whether the user's role holds `operation` on `resource`.
pub fn has_permission(user: &CurrentUser, resource: Resource, operation: Operation) -> bool {
    role_has_permission(user.role, resource, operation)
}

/// Whether the user may act on every row of `resource`, not just their own.
pub fn can_read_all_resources(user: &CurrentUser, resource: Resource) -> bool {
    has_permission(user, resource, Operation::ReadAll)
}

/// The rows of `projects` the user can see.
pub fn project_scope(user: &CurrentUser) -> ProjectScope {
    match user.role {
        Role::Admin => ProjectScope::All,
        Role::Client => ProjectScope::ClientOf(user.id),
        Role::Worker => ProjectScope::AssignedTo(user.id),
    }
}

/// Whether the user may see a single project: ADMIN, its client, or an assigned worker.
pub async fn can_access_project(conn: &mut PgConnection, user: &CurrentUser, project: &ProjectDBResponse) -> Result<bool> {
    Ok(match user.role {
        Role::Admin => true,
        Role::Client => project.client_id == user.id,
        Role::Worker => Projects::new(conn).is_worker_assigned(project.id, user.id).await?,
    })
}

/// [`can_access_project`] as a 403.
pub async fn require_project_access(
    conn: &mut PgConnection,
    user: &CurrentUser,
    project: &ProjectDBResponse,
    operation: Operation,
    resource: &str,
) -> Result<()> {
    if can_access_project(conn, user, project).await? {
        Ok(())
    } else {
        Err(Error::InsufficientPermissions {
            required: Permission::Granted,
            action: operation,
            resource: resource.to_string(),
        })
    }
}

/// Extractor that authenticates the caller and requires their role to hold `O` on `R`.
///
/// ```ignore
/// async fn list_users(_: RequiresPermission<resource::Users, operation::ReadAll>) { .. }
/// ```
#[derive(Debug, Clone)]
pub struct RequiresPermission<R, O> {
    pub user: CurrentUser,
    _marker: PhantomData<fn() -> (R, O)>,
}

impl<R, O> Deref for RequiresPermission<R, O> {
    type Target = CurrentUser;

    fn deref(&self) -> &CurrentUser {
        &self.user
    }
}

impl<R: ResourceMarker, O: OperationMarker> FromRequestParts<AppState> for RequiresPermission<R, O> {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !has_permission(&user, R::RESOURCE, O::OPERATION) {
            return Err(Error::InsufficientPermissions {
                required: Permission::Allow(R::RESOURCE, O::OPERATION),
                action: O::OPERATION,
                resource: R::RESOURCE.to_string(),
            });
        }

        Ok(Self {
            user,
            _marker: PhantomData,
        })
    }
}
