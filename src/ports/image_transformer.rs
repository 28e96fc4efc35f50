//! Image transformer port for external image-generation APIs.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::error::RelayError;

/// A request to transform an uploaded photo.
///
/// Carries the scratch-file location and upload metadata; the selected
/// adapter derives the prompt and payload encoding from these fields.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Path of the uploaded image in the scratch directory.
    pub image_path: PathBuf,
    /// Filename as supplied by the client.
    pub original_filename: String,
    /// MIME type declared in the upload.
    pub declared_mime: String,
    /// Free-text physique description supplied by the client.
    pub description: String,
}

/// Boxed future type returned by [`ImageTransformer::transform`].
pub type TransformFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, RelayError>> + Send + 'a>>;

/// Transforms an uploaded photo via an external API, yielding the URL of
/// the generated image.
pub trait ImageTransformer: Send + Sync {
    /// Run one transformation for the given request. Exactly one outbound
    /// call is made; there are no retries.
    fn transform(&self, request: &TransformRequest) -> TransformFuture<'_>;
}
