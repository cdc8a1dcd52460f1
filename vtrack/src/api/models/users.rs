//! API request/response models for users.

use crate::api::models::validation::Validator;
use crate::config::PasswordConfig;
use crate::db::models::users::{UserCountsDBResponse, UserDBResponse};
use crate::errors::Result;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

/// Account role. Every user has exactly one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Worker,
    Client,
}

// User request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl UserCreate {
    pub fn validate(&self, rules: &PasswordConfig) -> Result<()> {
        let mut v = Validator::new();
        v.length("name", self.name.trim(), 2, 100)
            .email("email", self.email.trim())
            .length("password", &self.password, rules.min_length, rules.max_length);
        if let Some(phone) = &self.phone {
            v.length("phone", phone, 0, 20);
        }
        if let Some(image) = &self.image {
            v.url("image", image);
        }
        v.finish()
    }
}

/// Partial user update. `phone` and `image` accept `null` to clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl UserUpdate {
    pub fn validate(&self, rules: &PasswordConfig) -> Result<()> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.length("name", name.trim(), 2, 100);
        }
        if let Some(email) = &self.email {
            v.email("email", email.trim());
        }
        if let Some(password) = &self.password {
            v.length("password", password, rules.min_length, rules.max_length);
        }
        if let Some(Some(phone)) = &self.phone {
            v.length("phone", phone, 0, 20);
        }
        if let Some(Some(image)) = &self.image {
            v.url("image", image);
        }
        v.finish()
    }
}

/// Relationship counts attached to user responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
    pub projects_as_client: i64,
    pub projects_as_worker: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<i64>,
}

// User response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<UserCounts>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListUsersQuery {
    /// Role filter (`ADMIN`, `WORKER`, `CLIENT`); `ALL` or unknown values are ignored
    pub role: Option<String>,
    /// Case-insensitive substring match on name or email
    pub search: Option<String>,
}

/// The authenticated user behind a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub image: Option<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            phone: db.phone,
            role: db.role,
            image: db.image,
            created_at: db.created_at,
            updated_at: db.updated_at,
            count: None,
        }
    }
}

impl From<UserCountsDBResponse> for UserCounts {
    fn from(db: UserCountsDBResponse) -> Self {
        Self {
            projects_as_client: db.projects_as_client,
            projects_as_worker: db.projects_as_worker,
            comments: db.comments,
        }
    }
}

impl UserResponse {
    pub fn with_counts(mut self, counts: UserCounts) -> Self {
        self.count = Some(counts);
        self
    }
}

impl From<UserDBResponse> for CurrentUser {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            role: db.role,
            image: db.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn rules() -> PasswordConfig {
        PasswordConfig::default()
    }

    fn valid_create() -> UserCreate {
        UserCreate {
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Client,
            phone: Some("+34 600 000 000".to_string()),
            image: None,
        }
    }

    #[test]
    fn create_accepts_valid_payload() {
        assert!(valid_create().validate(&rules()).is_ok());
    }

    #[test]
    fn create_rejects_boundary_values() {
        let mut req = valid_create();
        req.name = "A".to_string();
        req.password = "12345".to_string();
        req.phone = Some("1".repeat(21));
        req.image = Some("not a url".to_string());

        let Err(Error::Validation { details }) = req.validate(&rules()) else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = details.into_iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["name", "password", "phone", "image"]);
    }

    #[test]
    fn update_distinguishes_absent_and_null() {
        let update: UserUpdate = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert_eq!(update.phone, Some(None));
        assert_eq!(update.image, None);

        let update: UserUpdate = serde_json::from_str(r#"{"image": "https://cdn.example.com/a.png"}"#).unwrap();
        assert_eq!(update.image, Some(Some("https://cdn.example.com/a.png".to_string())));
        assert!(update.validate(&rules()).is_ok());
    }

    #[test]
    fn role_uses_uppercase_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Worker).unwrap(), r#""WORKER""#);
        let role: Role = serde_json::from_str(r#""CLIENT""#).unwrap();
        assert_eq!(role, Role::Client);
    }
}
