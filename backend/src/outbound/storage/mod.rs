//! Filesystem image storage adapter.
//!
//! Uploaded images are written under a media root, one subdirectory per
//! [`MediaKind`], with a random file name carrying the detected format's
//! extension. All access goes through a `cap_std::fs::Dir` handle, so the
//! adapter cannot write outside the media root.

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use std::io;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::domain::image::{ImageData, ImageRef};
use crate::domain::ports::{ImageStore, ImageStoreError, MediaKind};

/// Image store writing beneath a single media directory.
pub struct DirImageStore {
    root: Dir,
}

impl DirImageStore {
    /// Open (creating if needed) the media root at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageStoreError> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(map_io)?;
        let root = Dir::open_ambient_dir(path, ambient_authority()).map_err(map_io)?;
        Ok(Self { root })
    }
}

fn map_io(error: io::Error) -> ImageStoreError {
    ImageStoreError::Io {
        message: error.to_string(),
    }
}

#[async_trait]
impl ImageStore for DirImageStore {
    async fn store(&self, kind: MediaKind, image: &ImageData) -> Result<ImageRef, ImageStoreError> {
        let prefix = kind.prefix();
        self.root.create_dir_all(prefix).map_err(map_io)?;
        let name = format!(
            "{prefix}/{}.{}",
            Uuid::new_v4().simple(),
            image.format().extension()
        );
        self.root.write(&name, image.bytes()).map_err(map_io)?;
        debug!(reference = %name, bytes = image.bytes().len(), "image stored");
        Ok(ImageRef::new(name))
    }

    async fn remove(&self, reference: &ImageRef) -> Result<(), ImageStoreError> {
        match self.root.remove_file(reference.as_ref()) {
            Ok(()) => Ok(()),
            // Already gone is as good as removed.
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(map_io(error)),
        }
    }
}
