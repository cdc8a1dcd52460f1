//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract; they are
//! kept separate from the database records in [`crate::db::models`].
//!
//! Wire format conventions:
//!
//! - field names are camelCase (`clientId`, `currentPhase`, `unreadCount`)
//! - enum values use their upper-case names (`IN_PROGRESS`, `MEASUREMENT`)
//! - relationship counts are nested under `_count`
//! - list endpoints wrap their items in a named field (`{"projects": [...]}`)
//!
//! Request bodies expose a `validate` method built on [`validation::Validator`].

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod gallery;
pub mod images;
pub mod notifications;
pub mod projects;
pub mod uploads;
pub mod users;
pub mod validation;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned by deletes and other writes with nothing else to report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
