//! Avatar Service
//!
//! Uploads user avatars to the Cloudinary image API with a signed request.
//! Each user gets a single stable public id, so re-uploading replaces the
//! previous avatar instead of accumulating images.

use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::CloudinaryConfig;
use crate::utils::error::{AppError, AppResult};

/// Successful upload response, reduced to the fields we use
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Avatar upload client
#[derive(Clone)]
pub struct AvatarService {
    config: Option<CloudinaryConfig>,
    client: reqwest::Client,
}

impl AvatarService {
    /// Creates the upload client; uploads fail with 502 when `config` is
    /// absent
    pub fn new(config: Option<CloudinaryConfig>) -> Self {
        if config.is_none() {
            warn!("CLOUDINARY_NAME not configured, avatar upload is disabled");
        }

        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Uploads the image bytes as the user's avatar and returns the hosted
    /// URL
    pub async fn upload(&self, user_id: Uuid, image: Vec<u8>) -> AppResult<String> {
        let config = self.config.as_ref().ok_or_else(|| {
            AppError::ExternalService("Image hosting is not configured".to_string())
        })?;

        let public_id = format!("user_{}_avatar", user_id);
        let timestamp = Utc::now().timestamp();
        let signature = sign_upload(&public_id, timestamp, &config.api_secret);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(image).file_name("avatar"),
            )
            .text("api_key", config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("public_id", public_id.clone())
            .text("overwrite", "true")
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            config.cloud_name
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Image upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("image host returned {} for {}: {}", status, public_id, body);
            return Err(AppError::ExternalService(format!(
                "Image host returned status {}",
                status
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid upload response: {}", e)))?;

        info!("avatar uploaded for user {}", user_id);
        Ok(upload.secure_url)
    }
}

/// Signature over the upload parameters, sorted by name, with the API secret
/// appended
fn sign_upload(public_id: &str, timestamp: i64, api_secret: &str) -> String {
    let to_sign = format!(
        "overwrite=true&public_id={}&signature_algorithm=sha256&timestamp={}{}",
        public_id, timestamp, api_secret
    );

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    format!("{:x}", hasher.finalize())
}
