//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] covers the `/authentication/*` routes and everything nested under `/api/v1`.
//! It is served as JSON at `/api/v1/openapi.json` and rendered with Scalar at `/api/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{api, errors};

/// Session cookie scheme used by every authenticated route.
struct CookieSecurityAddon;

impl Modify for CookieSecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "CookieAuth".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "vtrack_session",
                    "Session JWT set by `POST /authentication/login`. The cookie name is configurable with `auth.session.cookie_name`.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vertical Tracker API",
        description = "Project tracking for elevator interior work: projects and their phases, progress images, comments and notifications."
    ),
    modifiers(&CookieSecurityAddon),
    paths(
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::get_session,
        api::handlers::users::list_users,
        api::handlers::users::create_user,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::projects::list_projects,
        api::handlers::projects::create_project,
        api::handlers::projects::get_project,
        api::handlers::projects::update_project,
        api::handlers::projects::delete_project,
        api::handlers::images::list_images,
        api::handlers::images::create_image,
        api::handlers::images::delete_image,
        api::handlers::comments::list_comments,
        api::handlers::comments::create_comment,
        api::handlers::comments::update_comment,
        api::handlers::comments::delete_comment,
        api::handlers::notifications::list_notifications,
        api::handlers::notifications::mark_notifications_read,
        api::handlers::notifications::mark_all_notifications_read,
        api::handlers::gallery::list_gallery,
        api::handlers::dashboard::get_dashboard_stats,
        api::handlers::uploads::sign_upload,
    ),
    components(
        schemas(
            errors::ErrorBody,
            errors::FieldError,
            api::models::MessageResponse,
            api::models::auth::LoginRequest,
            api::models::auth::AuthResponse,
            api::models::auth::AuthSuccessResponse,
            api::models::users::Role,
            api::models::users::UserCreate,
            api::models::users::UserUpdate,
            api::models::users::UserCounts,
            api::models::users::UserResponse,
            api::models::users::UserListResponse,
            api::models::users::CurrentUser,
            api::models::projects::ProjectStatus,
            api::models::projects::ProjectPhase,
            api::models::projects::ProjectCreate,
            api::models::projects::ProjectUpdate,
            api::models::projects::ProjectClientSummary,
            api::models::projects::ProjectWorkerSummary,
            api::models::projects::ProjectCounts,
            api::models::projects::PhaseHistoryResponse,
            api::models::projects::ProjectResponse,
            api::models::projects::ProjectListResponse,
            api::models::images::ImageCreate,
            api::models::images::ImageResponse,
            api::models::images::ImageListResponse,
            api::models::comments::CommentCreate,
            api::models::comments::CommentUpdate,
            api::models::comments::CommentAuthor,
            api::models::comments::CommentResponse,
            api::models::comments::CommentListResponse,
            api::models::notifications::NotificationKind,
            api::models::notifications::NotificationProject,
            api::models::notifications::NotificationResponse,
            api::models::notifications::NotificationListResponse,
            api::models::notifications::MarkNotificationsRead,
            api::models::notifications::MarkReadResponse,
            api::models::gallery::GalleryClient,
            api::models::gallery::GalleryProject,
            api::models::gallery::GalleryImageResponse,
            api::models::gallery::GalleryListResponse,
            api::models::dashboard::StatCard,
            api::models::dashboard::DashboardStats,
            api::models::dashboard::RecentActivity,
            api::models::dashboard::RecentActivityClient,
            api::models::dashboard::DashboardResponse,
            api::models::uploads::UploadSignatureResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Login, logout and the current session"),
        (name = "users", description = "Account management. Administrators only."),
        (name = "projects", description = "Projects, their phases and worker assignments"),
        (name = "images", description = "Progress images attached to a project"),
        (name = "comments", description = "Discussion on a project"),
        (name = "notifications", description = "The caller's in-app notifications"),
        (name = "gallery", description = "Images across every project the caller can see"),
        (name = "dashboard", description = "Headline figures and recent activity"),
        (name = "uploads", description = "Signed direct uploads to the image host"),
    )
)]
pub struct ApiDoc;
