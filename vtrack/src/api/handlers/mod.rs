//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication and authorization checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Login, logout and session lookup
//! - [`comments`]: Project comments; edits restricted to the author
//! - [`dashboard`]: Headline figures and recent activity
//! - [`gallery`]: Images across every visible project
//! - [`images`]: Progress images attached to a project
//! - [`notifications`]: Listing and marking the caller's notifications
//! - [`projects`]: Project CRUD, worker assignment and phase changes
//! - [`uploads`]: Signing direct uploads
//! - [`users`]: Account management
//!
//! # Authentication
//!
//! Every handler outside [`auth::login`] requires a session cookie. Handlers take a
//! [`crate::auth::permissions::RequiresPermission`] extractor, which resolves the
//! [`crate::api::models::users::CurrentUser`] and checks the role before the body is read.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and JSON error responses.

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod gallery;
pub mod images;
pub mod notifications;
pub mod projects;
pub mod uploads;
pub mod users;
