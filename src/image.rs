//! Turning a picked image file into a `data:` URL.
//!
//! Reading the file is the one asynchronous step around post creation and
//! editing. It is single-shot: once started it either yields the URL or
//! fails, and it cannot be cancelled.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FeedError, FeedResult};

pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

pub fn check_mime(mime: &str) -> FeedResult<()> {
    if ACCEPTED_MIME_TYPES.contains(&mime) {
        Ok(())
    } else {
        Err(FeedError::unsupported_type("Please select a valid image (JPG, PNG)"))
    }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> FeedResult<String> {
    check_mime(mime)?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// MIME type guessed from the file name.
pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load_data_url(&self, path: &Path) -> FeedResult<String>;
}

/// Reads images from the local filesystem.
pub struct FsImageLoader;

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn load_data_url(&self, path: &Path) -> FeedResult<String> {
        let mime = mime_for_path(path);
        // Reject before touching the disk
        check_mime(&mime)?;
        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), size = bytes.len(), "image loaded");
        to_data_url(&mime, &bytes)
    }
}

/// Where the image for a post comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInput {
    pub url: String,
    pub file: Option<PathBuf>,
}

impl ImageInput {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            url: String::new(),
            file: Some(path.into()),
        }
    }

    /// A picked file wins over a typed URL.
    pub async fn resolve(&self, loader: &dyn ImageLoader) -> FeedResult<String> {
        match &self.file {
            Some(path) => loader.load_data_url(path).await,
            None => Ok(self.url.clone()),
        }
    }
}
