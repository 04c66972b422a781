// File: ./src/upload.rs
// Turning an attached picture into something an item can point at
use crate::client::RemoteClient;
use crate::error::UploadError;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared type first, then a guess from the extension.
    pub fn mime_type(&self) -> String {
        if let Some(ct) = &self.content_type
            && !ct.trim().is_empty()
        {
            return ct.trim().to_string();
        }
        mime_guess::from_path(&self.file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    }
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Returns the value stored in `Item::image_url`.
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError>;
}

/// Embeds the picture into the record as a `data:` URI, for same-device storage.
pub struct InlineUploader;

#[async_trait]
impl ImageUploader for InlineUploader {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        Ok(format!(
            "data:{};base64,{}",
            file.mime_type(),
            STANDARD.encode(&file.bytes)
        ))
    }
}

pub struct RemoteUploader {
    client: RemoteClient,
}

impl RemoteUploader {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageUploader for RemoteUploader {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        self.client.upload_image(file).await
    }
}

/// Empty files are refused before any strategy is involved.
pub async fn upload_image(
    uploader: &dyn ImageUploader,
    file: &ImageFile,
) -> Result<String, UploadError> {
    if file.is_empty() {
        return Err(UploadError::EmptyFile);
    }
    log::debug!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());
    uploader.upload(file).await
}
