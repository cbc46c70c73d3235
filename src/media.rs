//! Image attachment handling.
//!
//! Images live entirely in memory as base64 data URLs (product photos,
//! adjustment proof shots). Validation is producer-side only: anything that
//! parses here is stored verbatim.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Upper bound on the decoded image payload, 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// A validated `data:image/...;base64,` URL held in memory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    /// Parses and validates a data URL.
    ///
    /// Only `image/*` MIME types are accepted and the decoded payload must
    /// not exceed [`MAX_IMAGE_BYTES`].
    pub fn from_data_url(url: &str) -> Result<Self, ServiceError> {
        let rest = url.strip_prefix("data:").ok_or_else(|| {
            ServiceError::ValidationError("image must be supplied as a data URL".into())
        })?;
        let (meta, payload) = rest.split_once(',').ok_or_else(|| {
            ServiceError::ValidationError("malformed data URL: missing payload".into())
        })?;
        let mime = meta.strip_suffix(";base64").ok_or_else(|| {
            ServiceError::ValidationError("image data must be base64-encoded".into())
        })?;
        if !mime.starts_with("image/") {
            return Err(ServiceError::ValidationError(format!(
                "unsupported content type {}: only image/* is accepted",
                mime
            )));
        }
        let bytes = STANDARD.decode(payload).map_err(|e| {
            ServiceError::ValidationError(format!("invalid base64 image payload: {}", e))
        })?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ServiceError::ValidationError(format!(
                "image is {} bytes, exceeding the {} byte limit",
                bytes.len(),
                MAX_IMAGE_BYTES
            )));
        }
        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The MIME type recorded in the data URL.
    pub fn mime_type(&self) -> &str {
        // Validated in from_data_url, so both markers are present.
        let rest = self.0.strip_prefix("data:").unwrap_or(&self.0);
        rest.split(";base64").next().unwrap_or("")
    }
}
