//! Database models for users.

use crate::api::models::users::{Role, UserCreate, UserUpdate};
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub image: Option<String>,
}

impl UserCreateDBRequest {
    /// Build from the API payload; the caller hashes the password first.
    pub fn new(api: UserCreate, password_hash: String) -> Self {
        Self {
            name: api.name.trim().to_string(),
            email: api.email.trim().to_string(),
            password_hash,
            role: api.role,
            phone: api.phone,
            image: api.image,
        }
    }
}

/// Database request for updating a user
///
/// `phone` and `image` are tri-state: `None` leaves the column alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<Option<String>>,
    pub image: Option<Option<String>>,
}

impl UserUpdateDBRequest {
    pub fn new(update: UserUpdate, password_hash: Option<String>) -> Self {
        Self {
            name: update.name.map(|n| n.trim().to_string()),
            email: update.email.map(|e| e.trim().to_string()),
            password_hash,
            role: update.role,
            phone: update.phone,
            image: update.image,
        }
    }
}

/// Database response for a user
#[derive(Debug, Clone)]
pub struct UserDBResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Relationship counts for a single user. `comments` is only loaded for detail views.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct UserCountsDBResponse {
    pub projects_as_client: i64,
    pub projects_as_worker: i64,
    pub comments: Option<i64>,
}
