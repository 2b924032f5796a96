//! Port for stored image payloads.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::image::{ImageData, ImageRef};

/// Errors raised by image store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    /// Underlying I/O failed.
    #[error("image store i/o failed: {message}")]
    Io {
        /// Adapter-level failure description.
        message: String,
    },
}

impl ImageStoreError {
    /// Create an I/O error with the given message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Which media namespace an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Post illustrations.
    Post,
    /// Profile avatars.
    Avatar,
}

impl MediaKind {
    /// Directory prefix inside the media root.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Post => "posts",
            Self::Avatar => "avatars",
        }
    }
}

/// Port for writing and deleting stored images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an image payload and return its stored reference.
    async fn store(
        &self,
        kind: MediaKind,
        image: &ImageData,
    ) -> Result<ImageRef, ImageStoreError>;

    /// Delete a stored image; succeeds when the file is already gone.
    async fn remove(&self, image: &ImageRef) -> Result<(), ImageStoreError>;
}

/// In-memory adapter recording stores and removals for assertions.
#[derive(Debug, Default)]
pub struct FixtureImageStore {
    counter: AtomicU64,
    stored: Mutex<Vec<ImageRef>>,
    removed: Mutex<Vec<ImageRef>>,
}

impl FixtureImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// References handed out so far.
    pub fn stored(&self) -> Vec<ImageRef> {
        self.stored
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// References removed so far.
    pub fn removed(&self) -> Vec<ImageRef> {
        self.removed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn store(
        &self,
        kind: MediaKind,
        image: &ImageData,
    ) -> Result<ImageRef, ImageStoreError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let reference = ImageRef::new(format!(
            "{}/fixture-{n}.{}",
            kind.prefix(),
            image.format().extension()
        ));
        self.stored
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(reference.clone());
        Ok(reference)
    }

    async fn remove(&self, image: &ImageRef) -> Result<(), ImageStoreError> {
        self.removed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIF: &[u8] = &[b'G', b'I', b'F', b'8', b'9', b'a', 0x00];

    #[tokio::test]
    async fn references_are_namespaced_and_unique() {
        let store = FixtureImageStore::new();
        let image = ImageData::from_bytes(GIF.to_vec()).expect("valid image");

        let a = store.store(MediaKind::Post, &image).await.expect("store");
        let b = store.store(MediaKind::Avatar, &image).await.expect("store");
        assert!(a.as_ref().starts_with("posts/"));
        assert!(b.as_ref().starts_with("avatars/"));
        assert_ne!(a, b);
        assert_eq!(store.stored().len(), 2);
    }
}
