//! Shared fixtures for unit and HTTP tests.

use crate::{
    api::models::{
        projects::{ProjectPhase, ProjectStatus},
        users::{CurrentUser, Role},
    },
    auth::{
        password::{self, Argon2Params},
        session,
    },
    config::{Config, CorsConfig, CorsOrigin, PasswordConfig, PoolSettings, SecurityConfig},
    db::{
        handlers::{Projects, Repository, Users},
        models::{
            projects::{ProjectCreateDBRequest, ProjectDBResponse},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
};
use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use sqlx::PgPool;
use uuid::Uuid;

/// Plain-text password of every user made by [`create_test_user`].
pub const TEST_PASSWORD: &str = "password123";

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: crate::config::DatabaseConfig {
            // Will get overriden by the sqlx test pool
            url: None,
            pool: PoolSettings {
                max_connections: 2,
                min_connections: 0,
                ..Default::default()
            },
        },
        admin_email: "admin@test.com".to_string(),
        admin_password: None,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: crate::config::AuthConfig {
            password: PasswordConfig {
                // Cheap hashing keeps the suite fast
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            security: SecurityConfig {
                cors: CorsConfig {
                    allowed_origins: vec![CorsOrigin::Url("http://localhost:3000".parse().unwrap())],
                    allow_credentials: true,
                    max_age: None,
                },
                ..Default::default()
            },
            ..Default::default()
        },
        uploads: crate::config::UploadsConfig {
            cloud_name: Some("test-cloud".to_string()),
            api_key: Some("test-api-key".to_string()),
            api_secret: Some("test-api-secret".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Router over the given pool, with no background tasks.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, pool)
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub async fn create_test_user(pool: &PgPool, role: Role) -> UserDBResponse {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let password_hash = password::hash_password(
        TEST_PASSWORD,
        Argon2Params {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    )
    .expect("Failed to hash test password");

    let request = UserCreateDBRequest {
        name: format!("Test {role:?} {suffix}"),
        email: format!("{}_{suffix}@example.com", format!("{role:?}").to_lowercase()),
        password_hash,
        role,
        phone: None,
        image: None,
    };

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn).create(&request).await.expect("Failed to create test user")
}

pub async fn create_test_project(pool: &PgPool, client_id: Uuid, worker_ids: &[Uuid]) -> ProjectDBResponse {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let request = ProjectCreateDBRequest {
        title: format!("Cabin refit {suffix}"),
        description: "Full interior refit of a passenger cabin".to_string(),
        location: "Calle Mayor 1, Madrid".to_string(),
        client_id,
        status: ProjectStatus::Pending,
        current_phase: ProjectPhase::Measurement,
        progress: 0,
        start_date: None,
        estimated_end_date: None,
        budget: None,
        worker_ids: worker_ids.to_vec(),
    };

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Projects::new(&mut conn).create(&request).await.expect("Failed to create test project")
}

/// `Cookie` header value carrying a valid session for `user`.
pub fn session_cookie_for(user: &UserDBResponse, config: &Config) -> String {
    let current = CurrentUser::from(user.clone());
    let token = session::create_session_token(&current, config).expect("Failed to create session token");
    format!("{}={}", config.auth.session.cookie_name, token)
}

/// Header pair authenticating requests as `user` against [`create_test_app`].
pub fn add_auth_headers(user: &UserDBResponse) -> (HeaderName, HeaderValue) {
    let cookie = session_cookie_for(user, &create_test_config());
    (header::COOKIE, HeaderValue::from_str(&cookie).expect("Invalid cookie header"))
}
