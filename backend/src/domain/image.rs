//! Uploaded image payloads and stored image references.
//!
//! Images arrive as base64 strings inside JSON form bodies. Validation only
//! inspects the magic bytes; anything beyond that (dimensions, re-encoding)
//! is out of scope.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Validation errors for uploaded image payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    /// The payload is not valid base64.
    InvalidEncoding,
    /// The decoded bytes do not start with a recognised image signature.
    UnrecognisedFormat,
    /// The decoded payload is empty.
    Empty,
}

impl fmt::Display for ImageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding => write!(f, "image payload is not valid base64"),
            Self::UnrecognisedFormat => {
                write!(f, "image payload must be a PNG, JPEG, or GIF")
            }
            Self::Empty => write!(f, "image payload must not be empty"),
        }
    }
}

impl std::error::Error for ImageValidationError {}

/// Recognised upload formats, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG (`\x89PNG`).
    Png,
    /// JPEG (`\xFF\xD8\xFF`).
    Jpeg,
    /// GIF (`GIF8`).
    Gif,
}

impl ImageFormat {
    fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF8") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    /// File extension used when storing the payload.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }
}

/// A validated, decoded image payload ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ImageData {
    /// Decode and validate a base64 payload.
    pub fn from_base64(payload: &str) -> Result<Self, ImageValidationError> {
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|_| ImageValidationError::InvalidEncoding)?;
        Self::from_bytes(bytes)
    }

    /// Validate raw bytes as an image payload.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        let format =
            ImageFormat::detect(&bytes).ok_or(ImageValidationError::UnrecognisedFormat)?;
        Ok(Self { bytes, format })
    }

    /// The decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The detected format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

/// Relative path of a stored image inside the media directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap a relative media path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
