//! # vtrack: Vertical Tracker
//!
//! `vtrack` tracks elevator-interior refit projects from first measurement to handover. Administrators
//! create projects for clients and assign workers to them; workers upload progress photos and move a
//! project through its phases; clients follow along, comment, and get notified when something happens.
//!
//! ## Overview
//!
//! Every request is made on behalf of a user with one of three roles:
//!
//! - **ADMIN** manages users and projects and sees everything.
//! - **WORKER** sees the projects they are assigned to, uploads images and signs uploads.
//! - **CLIENT** sees the projects they own and can comment on them.
//!
//! The role decides both *whether* an operation is allowed (see [`auth::permissions`]) and *which*
//! rows a listing returns: project, gallery and dashboard queries are all filtered through the
//! caller's [`db::models::projects::ProjectScope`].
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL for all persistence.
//!
//! ### Request Flow
//!
//! A request to `/api/v1/*` carries a session cookie set by `POST /authentication/login`. The
//! [`auth::permissions::RequiresPermission`] extractor verifies the cookie's JWT, reloads the user
//! so that role changes and deletions take effect immediately, and checks the role against the
//! handler's resource and operation. The handler then validates the body, talks to the database
//! through the repositories in [`db::handlers`], and returns JSON.
//!
//! Writes that other users should hear about (a new image, a comment, a phase change, a completed
//! project, a new assignment) hand off to [`notifications::Notifier`] once they have committed. The
//! notifier fans out on a spawned task; failures are logged and never reach the caller.
//!
//! ### Core Components
//!
//! - [`api`]: handlers, request/response models and extractors
//! - [`auth`]: password hashing, session tokens, the current user and role permissions
//! - [`db`]: repositories over PostgreSQL
//! - [`notifications`]: recipient selection and asynchronous fan-out
//! - [`uploads`]: signing direct browser uploads to the image host
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use vtrack::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = vtrack::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     vtrack::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations run automatically on startup. To run them by hand:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! vtrack::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod notifications;
mod openapi;
pub mod telemetry;
mod types;
pub mod uploads;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::password::{self, Argon2Params},
    config::CorsOrigin,
    db::{
        handlers::{Repository, Users},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::Error,
    notifications::Notifier,
    openapi::ApiDoc,
};
use axum::{
    Router,
    http::{self, HeaderValue, Method},
    routing::{delete, get, post, put},
};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, warn, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{CommentId, ImageId, NotificationId, ProjectId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

impl AppState {
    /// Fan-out handle for notifications; cheap to create per request.
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.db.clone(), &self.config.notifications)
    }
}

/// Get the vtrack database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Make sure the bootstrap administrator exists.
///
/// Creates an ADMIN account for `email` when none exists, or resets its password hash when it does
/// and a password is configured. Calling it again with the same arguments changes nothing else.
///
/// A missing account with no configured password cannot be created; this is logged and `None`
/// is returned.
#[instrument(skip(password, params, db))]
pub async fn create_initial_admin_user(
    email: &str,
    name: &str,
    password: Option<&str>,
    params: Argon2Params,
    db: &PgPool,
) -> errors::Result<Option<UserId>> {
    let password_hash = match password {
        Some(pwd) => Some(password::hash_password_blocking(pwd.to_string(), params).await?),
        None => None,
    };

    let mut tx = db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut tx);

    let user_id = match (user_repo.get_user_by_email(email).await?, password_hash) {
        (Some(existing), Some(password_hash)) => {
            user_repo
                .update(
                    existing.id,
                    &UserUpdateDBRequest {
                        password_hash: Some(password_hash),
                        ..Default::default()
                    },
                )
                .await?;
            debug!("Reset bootstrap admin password");
            Some(existing.id)
        }
        (Some(existing), None) => Some(existing.id),
        (None, Some(password_hash)) => {
            let created = user_repo
                .create(&UserCreateDBRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password_hash,
                    role: Role::Admin,
                    phone: None,
                    image: None,
                })
                .await?;
            info!("Created bootstrap admin user {}", email);
            Some(created.id)
        }
        (None, None) => {
            warn!("No admin_password configured; bootstrap admin {} was not created", email);
            None
        }
    };

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(user_id)
}

/// Connect, run migrations and bootstrap the admin account.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url()
        .ok_or_else(|| anyhow::anyhow!("database.url (or DATABASE_URL) must be set"))?;

    let settings = &config.database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .connect(database_url)
        .await?;

    migrator().run(&pool).await?;

    create_initial_admin_user(
        &config.admin_email,
        &config.admin_name,
        config.admin_password.as_deref(),
        Argon2Params::from(&config.auth.password),
        &pool,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create initial admin user: {}", e))?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.security.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(config.auth.security.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.auth.security.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// - `/authentication/*`: login, logout and session lookup
/// - `/api/v1/*`: the REST API
/// - `/api/docs` and `/api/v1/openapi.json`: API documentation
/// - `/healthz`: liveness
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, comments, dashboard, gallery, images, notifications, projects, uploads, users};

    let auth_routes = Router::new()
        .route("/authentication/login", post(auth::login))
        .route("/authentication/logout", post(auth::logout))
        .route("/authentication/session", get(auth::get_session))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).put(users::update_user).delete(users::delete_user))
        .route("/projects", get(projects::list_projects).post(projects::create_project))
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/{id}/images", get(images::list_images).post(images::create_image))
        .route("/projects/{id}/images/{imageId}", delete(images::delete_image))
        .route("/comments", get(comments::list_comments).post(comments::create_comment))
        .route("/comments/{id}", put(comments::update_comment).delete(comments::delete_comment))
        .route(
            "/notifications",
            get(notifications::list_notifications)
                .put(notifications::mark_notifications_read)
                .delete(notifications::mark_all_notifications_read),
        )
        .route("/gallery", get(gallery::list_gallery))
        .route("/dashboard/stats", get(dashboard::get_dashboard_stats))
        .route("/uploads/sign", post(uploads::sign_upload))
        .route("/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(auth_routes)
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(cors_layer),
    );

    Ok(router)
}

/// The assembled server.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations and bootstraps
///    the admin account
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests until the shutdown
///    future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting vtrack on {}", config.bind_address());

        let pool = setup_database(&config).await?;
        Self::new_with_pool(config, pool).await
    }

    /// Build on an existing, already migrated pool.
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("vtrack listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{AppState, create_initial_admin_user};
    use crate::{
        api::models::users::Role,
        auth::password::{Argon2Params, verify_password},
        db::handlers::Users,
        test_utils::*,
    };
    use axum::http::{HeaderValue, StatusCode, header};
    use sqlx::PgPool;

    fn cheap_params() -> Argon2Params {
        Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[sqlx::test]
    async fn test_create_initial_admin_user_new_user(pool: PgPool) {
        let email = "new-admin@example.com";

        let user_id = create_initial_admin_user(email, "Site Admin", Some("bootstrap-pass"), cheap_params(), &pool)
            .await
            .expect("Should create admin user successfully")
            .expect("Admin should have been created");

        let mut conn = pool.acquire().await.unwrap();
        let created = Users::new(&mut conn)
            .get_user_by_email(email)
            .await
            .unwrap()
            .expect("User should exist");

        assert_eq!(created.id, user_id);
        assert_eq!(created.name, "Site Admin");
        assert_eq!(created.role, Role::Admin);
        assert!(verify_password("bootstrap-pass", &created.password_hash).unwrap());
    }

    #[sqlx::test]
    async fn test_create_initial_admin_user_existing_user(pool: PgPool) {
        let existing = create_test_user(&pool, Role::Admin).await;

        let returned = create_initial_admin_user(&existing.email, "Ignored", Some("rotated-pass"), cheap_params(), &pool)
            .await
            .unwrap();
        assert_eq!(returned, Some(existing.id));

        let returned_again = create_initial_admin_user(&existing.email, "Ignored", None, cheap_params(), &pool)
            .await
            .unwrap();
        assert_eq!(returned_again, Some(existing.id));

        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn)
            .get_user_by_email(&existing.email)
            .await
            .unwrap()
            .expect("User should still exist");
        assert_eq!(user.name, existing.name);
        assert!(verify_password("rotated-pass", &user.password_hash).unwrap());
        assert!(!verify_password(TEST_PASSWORD, &user.password_hash).unwrap());
    }

    #[sqlx::test]
    async fn test_missing_admin_without_password_is_skipped(pool: PgPool) {
        let created = create_initial_admin_user("nobody@example.com", "Nobody", None, cheap_params(), &pool)
            .await
            .unwrap();
        assert_eq!(created, None);
    }

    #[sqlx::test]
    async fn test_application_routes(pool: PgPool) {
        let server = create_test_app(pool).await;

        let health = server.get("/healthz").await;
        health.assert_status_ok();
        assert_eq!(health.text(), "OK");

        let openapi = server.get("/api/v1/openapi.json").await;
        openapi.assert_status_ok();
        assert!(openapi.json::<serde_json::Value>()["paths"]["/projects"].is_object());

        server.get("/api/docs").await.assert_status_ok();

        // Unauthenticated API requests are rejected
        server.get("/api/v1/projects").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_cors_allows_configured_origin(pool: PgPool) {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let router = super::build_router(&state).expect("Failed to build router");
        let server = axum_test::TestServer::new(router).expect("Failed to create test server");

        let response = server
            .get("/healthz")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
            .await;

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
    }
}
