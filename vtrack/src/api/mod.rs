//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`extract`]**: JSON body and query extractors that reject with the crate's error body
//!
//! # API Structure
//!
//! - **Authentication** (`/authentication/*`): Login, logout and the current session
//! - **Users** (`/api/v1/users/*`): Account management, administrators only
//! - **Projects** (`/api/v1/projects/*`): Projects, worker assignments and progress images
//! - **Comments** (`/api/v1/comments/*`): Project discussion
//! - **Notifications** (`/api/v1/notifications`): The caller's in-app notifications
//! - **Gallery & Dashboard** (`/api/v1/gallery`, `/api/v1/dashboard/stats`): Read-only views
//! - **Uploads** (`/api/v1/uploads/sign`): Signed direct uploads to the image host
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/api/docs` when the server is running.

pub mod extract;
pub mod handlers;
pub mod models;
