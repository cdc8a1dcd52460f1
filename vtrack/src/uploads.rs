//! Signed direct uploads to the image host.
//!
//! The browser uploads files straight to the host; the server only signs the upload
//! parameters with the account secret. The signature is
//! `hex(SHA-256("folder=<folder>&timestamp=<ts>" + secret))`, the host's signed-upload
//! scheme with `signature_algorithm=sha256`.

use sha2::{Digest, Sha256};

use crate::{
    api::models::uploads::UploadSignatureResponse,
    config::UploadsConfig,
    errors::{Error, Result},
};

pub const SIGNATURE_ALGORITHM: &str = "sha256";

/// Sign the given folder and timestamp with `secret`.
pub fn sign_params(folder: &str, timestamp: i64, secret: &str) -> String {
    let to_sign = format!("folder={folder}&timestamp={timestamp}");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the upload parameters for `timestamp` (unix seconds).
pub fn create_signature(config: &UploadsConfig, timestamp: i64) -> Result<UploadSignatureResponse> {
    let (Some(cloud_name), Some(api_key), Some(api_secret)) = (&config.cloud_name, &config.api_key, &config.api_secret) else {
        return Err(Error::Internal {
            operation: "sign upload: image host credentials are not configured".to_string(),
        });
    };

    Ok(UploadSignatureResponse {
        signature: sign_params(&config.folder, timestamp, api_secret),
        timestamp,
        folder: config.folder.clone(),
        cloud_name: cloud_name.clone(),
        api_key: api_key.clone(),
        signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
    })
}
