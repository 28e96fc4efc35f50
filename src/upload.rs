//! Upload intake: multipart extraction, validation, scratch-file storage.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Multipart, MultipartError};
use uuid::Uuid;

use crate::config::Config;
use crate::error::RelayError;
use crate::mime;
use crate::provider::ProviderKind;

/// A client upload persisted to the scratch directory for one request.
///
/// The file is exclusively owned by the request that created it and must be
/// deleted exactly once before the response is sent; [`cleanup`] tolerates
/// an already-deleted file.
#[derive(Debug)]
pub struct SavedUpload {
    /// Scratch-file location.
    pub path: PathBuf,
    /// Filename as supplied by the client.
    pub original_filename: String,
    /// MIME type declared in the upload.
    pub declared_mime: String,
    /// Upload size in bytes.
    pub size: u64,
}

/// Intake rules resolved from configuration and provider defaults.
#[derive(Debug)]
pub struct UploadPolicy {
    /// Scratch directory for transient storage.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_bytes: u64,
    /// Declared-MIME allowlist; `None` accepts any type.
    pub allowed_types: Option<Vec<String>>,
}

impl UploadPolicy {
    /// Resolve the intake policy for the given configuration and provider.
    ///
    /// An explicit `allowed_types` config wins; otherwise the provider's
    /// default applies (JPEG/PNG for Fal, unrestricted for `OpenAI`).
    #[must_use]
    pub fn from_config(config: &Config, kind: ProviderKind) -> Self {
        let allowed_types = config.upload.allowed_types.clone().or_else(|| {
            kind.default_allowed_types()
                .map(|types| types.iter().map(ToString::to_string).collect())
        });
        Self { upload_dir: config.upload_dir(), max_bytes: config.upload.max_bytes, allowed_types }
    }
}

/// Extract and persist the `image` and `description` fields of a request.
///
/// The image is written to the scratch directory under a unique name. Any
/// temp file already written is removed again before an error is returned,
/// so the caller only owns cleanup on the success path.
///
/// # Errors
///
/// Returns a validation error for a missing image, missing or empty
/// description, oversize upload, disallowed declared type, or malformed
/// multipart body; an I/O error if the scratch file cannot be written.
pub async fn receive(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<(SavedUpload, String), RelayError> {
    let mut saved: Option<SavedUpload> = None;
    let mut description: Option<String> = None;

    let outcome = read_fields(&mut multipart, policy, &mut saved, &mut description).await;
    if let Err(err) = outcome {
        if let Some(upload) = saved {
            cleanup(&upload.path).await;
        }
        return Err(err);
    }

    let Some(upload) = saved else {
        return Err(RelayError::Validation("No image uploaded. Please upload a photo.".to_string()));
    };

    match description {
        Some(text) if !text.trim().is_empty() => Ok((upload, text)),
        _ => {
            cleanup(&upload.path).await;
            Err(RelayError::Validation("No description provided.".to_string()))
        }
    }
}

/// Walk the multipart fields, persisting the image and capturing the description.
async fn read_fields(
    multipart: &mut Multipart,
    policy: &UploadPolicy,
    saved: &mut Option<SavedUpload>,
    description: &mut Option<String>,
) -> Result<(), RelayError> {
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or("").to_string();

        if name == "image" && saved.is_none() {
            let original_filename = field.file_name().unwrap_or("upload").to_string();
            let declared_mime =
                field.content_type().unwrap_or("application/octet-stream").to_string();

            // Type check runs before anything touches the disk.
            if let Some(ref allowed) = policy.allowed_types {
                if !mime::is_allowed(&declared_mime, allowed) {
                    return Err(RelayError::Validation(format!(
                        "Unsupported file type '{declared_mime}'. Only JPEG and PNG images are accepted."
                    )));
                }
            }

            let data = field.bytes().await.map_err(bad_multipart)?;
            if data.len() as u64 > policy.max_bytes {
                return Err(RelayError::Validation(format!(
                    "Image exceeds the maximum upload size of {} bytes.",
                    policy.max_bytes
                )));
            }

            tokio::fs::create_dir_all(&policy.upload_dir).await?;
            let path = policy
                .upload_dir
                .join(format!("{}-{}", Uuid::new_v4(), file_name_component(&original_filename)));
            tokio::fs::write(&path, &data).await?;

            *saved = Some(SavedUpload {
                path,
                original_filename,
                declared_mime,
                size: data.len() as u64,
            });
        } else if name == "description" {
            *description = Some(field.text().await.map_err(bad_multipart)?);
        }
    }
    Ok(())
}

/// Remove a scratch file, best-effort.
///
/// Deleting an already-absent file is not an error; any other failure is
/// logged and never surfaces to the caller.
pub async fn cleanup(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("failed to remove temp upload {}: {e}", path.display()),
    }
}

fn bad_multipart(err: MultipartError) -> RelayError {
    RelayError::Validation(format!("Malformed multipart request: {err}"))
}

/// Strip any path components a client may have smuggled into the filename.
fn file_name_component(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
