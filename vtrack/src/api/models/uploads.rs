//! API models for signed direct uploads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Parameters the browser sends with its upload so the image host accepts it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignatureResponse {
    pub signature: String,
    /// Unix seconds; part of the signed payload
    pub timestamp: i64,
    pub folder: String,
    pub cloud_name: String,
    pub api_key: String,
    pub signature_algorithm: String,
}
