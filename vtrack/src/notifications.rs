//! In-app notification fan-out.
//!
//! Each `notify_*` function loads the project, works out who should hear about the event
//! and writes one notification per recipient in a single insert. They return the number
//! of rows written; a project that no longer exists yields 0.
//!
//! Request handlers go through [`Notifier`], which runs the fan-out on a spawned task
//! after the triggering write has committed. A failed fan-out is logged and otherwise
//! ignored; it never changes the HTTP response.

use std::future::Future;

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    api::models::{notifications::NotificationKind, projects::ProjectPhase},
    config::NotificationsConfig,
    db::{
        errors::DbError,
        handlers::{Notifications, Projects, Repository},
        models::{notifications::NotificationCreateDBRequest, projects::ProjectDBResponse},
    },
    errors::Result,
    types::{ProjectId, UserId, abbrev_uuid},
};

async fn load_project(db: &PgPool, project_id: ProjectId) -> Result<Option<(ProjectDBResponse, Vec<UserId>)>> {
    let mut conn = db.acquire().await.map_err(DbError::from)?;
    let mut repo = Projects::new(&mut conn);

    let Some(project) = repo.get_by_id(project_id).await? else {
        return Ok(None);
    };
    let workers = repo.worker_ids(project_id).await?;

    Ok(Some((project, workers)))
}

async fn insert_all(
    db: &PgPool,
    project_id: ProjectId,
    recipients: impl IntoIterator<Item = UserId>,
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> Result<u64> {
    let mut seen = Vec::new();
    let requests: Vec<_> = recipients
        .into_iter()
        .filter(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        })
        .map(|user_id| NotificationCreateDBRequest {
            user_id,
            project_id: Some(project_id),
            kind,
            title: title.to_string(),
            message: message.to_string(),
        })
        .collect();

    let mut conn = db.acquire().await.map_err(DbError::from)?;
    Ok(Notifications::new(&mut conn).create_many(&requests).await?)
}

/// Tell the project's client that an image was uploaded.
#[instrument(skip(db, uploader_name), fields(project_id = %abbrev_uuid(&project_id)), err)]
pub async fn notify_new_image(db: &PgPool, project_id: ProjectId, uploader_name: &str) -> Result<u64> {
    let Some((project, _)) = load_project(db, project_id).await? else {
        return Ok(0);
    };

    let message = format!("{uploader_name} uploaded a new image to project \"{}\"", project.title);
    insert_all(db, project_id, [project.client_id], NotificationKind::NewImage, "New image uploaded", &message).await
}

/// Tell the client and every assigned worker, except the author, about a new comment.
#[instrument(skip(db, author_name), fields(project_id = %abbrev_uuid(&project_id), author_id = %abbrev_uuid(&author_id)), err)]
pub async fn notify_new_comment(db: &PgPool, project_id: ProjectId, author_id: UserId, author_name: &str) -> Result<u64> {
    let Some((project, workers)) = load_project(db, project_id).await? else {
        return Ok(0);
    };

    let recipients = std::iter::once(project.client_id)
        .chain(workers)
        .filter(|id| *id != author_id);
    let message = format!("{author_name} commented on project \"{}\"", project.title);
    insert_all(db, project_id, recipients, NotificationKind::NewComment, "New comment", &message).await
}

/// Tell the client and workers that the project moved to another phase.
#[instrument(skip(db), fields(project_id = %abbrev_uuid(&project_id)), err)]
pub async fn notify_phase_change(db: &PgPool, project_id: ProjectId, from: ProjectPhase, to: ProjectPhase) -> Result<u64> {
    let Some((project, workers)) = load_project(db, project_id).await? else {
        return Ok(0);
    };

    let message = format!("Project \"{}\" moved from {} to {}", project.title, from.label(), to.label());
    let recipients = std::iter::once(project.client_id).chain(workers);
    insert_all(db, project_id, recipients, NotificationKind::PhaseChange, "Phase change", &message).await
}

/// Tell the client and workers that the project is complete.
#[instrument(skip(db), fields(project_id = %abbrev_uuid(&project_id)), err)]
pub async fn notify_project_completed(db: &PgPool, project_id: ProjectId) -> Result<u64> {
    let Some((project, workers)) = load_project(db, project_id).await? else {
        return Ok(0);
    };

    let message = format!("Project \"{}\" has been completed successfully", project.title);
    let recipients = std::iter::once(project.client_id).chain(workers);
    insert_all(db, project_id, recipients, NotificationKind::ProjectCompleted, "Project completed!", &message).await
}

/// Tell newly assigned workers about their project.
#[instrument(skip(db, worker_ids), fields(project_id = %abbrev_uuid(&project_id), workers = worker_ids.len()), err)]
pub async fn notify_workers_assigned(db: &PgPool, project_id: ProjectId, worker_ids: &[UserId]) -> Result<u64> {
    if worker_ids.is_empty() {
        return Ok(0);
    }
    let Some((project, _)) = load_project(db, project_id).await? else {
        return Ok(0);
    };

    let message = format!("You have been assigned to project \"{}\"", project.title);
    insert_all(
        db,
        project_id,
        worker_ids.iter().copied(),
        NotificationKind::ProjectAssigned,
        "Assigned to new project",
        &message,
    )
    .await
}

/// Fire-and-forget dispatcher for the fan-out functions.
#[derive(Debug, Clone)]
pub struct Notifier {
    db: PgPool,
    enabled: bool,
}

impl Notifier {
    pub fn new(db: PgPool, config: &NotificationsConfig) -> Self {
        Self {
            db,
            enabled: config.enabled,
        }
    }

    fn dispatch<F, Fut>(&self, event: &'static str, f: F)
    where
        F: FnOnce(PgPool) -> Fut + Send + 'static,
        Fut: Future<Output = Result<u64>> + Send + 'static,
    {
        if !self.enabled {
            tracing::trace!(event, "Notifications disabled, skipping");
            return;
        }

        let db = self.db.clone();
        tokio::spawn(async move {
            match f(db).await {
                Ok(count) => tracing::debug!(event, count, "Notifications created"),
                Err(e) => tracing::warn!(event, error = %e, "Failed to create notifications"),
            }
        });
    }

    pub fn new_image(&self, project_id: ProjectId, uploader_name: String) {
        self.dispatch("new_image", move |db| async move { notify_new_image(&db, project_id, &uploader_name).await });
    }

    pub fn new_comment(&self, project_id: ProjectId, author_id: UserId, author_name: String) {
        self.dispatch("new_comment", move |db| async move {
            notify_new_comment(&db, project_id, author_id, &author_name).await
        });
    }

    pub fn phase_change(&self, project_id: ProjectId, from: ProjectPhase, to: ProjectPhase) {
        self.dispatch("phase_change", move |db| async move { notify_phase_change(&db, project_id, from, to).await });
    }

    pub fn project_completed(&self, project_id: ProjectId) {
        self.dispatch("project_completed", move |db| async move { notify_project_completed(&db, project_id).await });
    }

    pub fn workers_assigned(&self, project_id: ProjectId, worker_ids: Vec<UserId>) {
        if worker_ids.is_empty() {
            return;
        }
        self.dispatch("workers_assigned", move |db| async move {
            notify_workers_assigned(&db, project_id, &worker_ids).await
        });
    }
}
