use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ImageStoreConfig;

/// A file received from a multipart upload, ready to hand to the image store.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("image store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image store returned an unexpected response: {0}")]
    BadResponse(String),
}

/// External image storage collaborator. The service owns the files once
/// uploaded; this process only keeps the returned storage keys and resolves
/// them to public URLs at read time.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the files under the given product and return their storage keys,
    /// one per file, in upload order.
    async fn upload_product_images(
        &self,
        product_id: i32,
        files: Vec<UploadedImage>,
    ) -> Result<Vec<String>, ImageStoreError>;

    /// Resolve storage keys to publicly reachable URLs, one per key, in order.
    async fn resolve_urls(&self, keys: &[String]) -> Result<Vec<String>, ImageStoreError>;
}

/// HTTP-backed image store client.
pub struct HttpImageStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    urls: Vec<String>,
}

impl HttpImageStore {
    /// Fails if the HTTP client cannot be built; callers decide whether that
    /// is fatal (main treats it like a failed bind).
    pub fn new(config: &ImageStoreConfig) -> Result<Self, ImageStoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ImageStoreError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload_product_images(
        &self,
        product_id: i32,
        files: Vec<UploadedImage>,
    ) -> Result<Vec<String>, ImageStoreError> {
        let expected = files.len();

        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(ImageStoreError::Transport)?;
            form = form.part("productImg", part);
        }

        let response = self
            .client
            .post(format!("{}/products/{}/images", self.base_url, product_id))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: UploadResponse = response.json().await?;
        if body.keys.len() != expected {
            return Err(ImageStoreError::BadResponse(format!(
                "uploaded {} files but received {} keys",
                expected,
                body.keys.len()
            )));
        }

        Ok(body.keys)
    }

    async fn resolve_urls(&self, keys: &[String]) -> Result<Vec<String>, ImageStoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/urls", self.base_url))
            .json(&serde_json::json!({ "keys": keys }))
            .send()
            .await?
            .error_for_status()?;

        let body: ResolveResponse = response.json().await?;
        if body.urls.len() != keys.len() {
            return Err(ImageStoreError::BadResponse(format!(
                "asked for {} urls but received {}",
                keys.len(),
                body.urls.len()
            )));
        }

        Ok(body.urls)
    }
}
