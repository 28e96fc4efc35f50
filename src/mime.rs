//! MIME type handling for uploads and the base64 data-URL payload.

use serde::Deserialize;

/// How the data-URL MIME type is determined for the base64 payload.
///
/// The original behavior infers the type from the filename extension rather
/// than the validated upload metadata; both strategies are representable so
/// the discrepancy stays configurable instead of silently fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeDetection {
    /// Infer from the filename extension: `.png` maps to `image/png`,
    /// everything else to `image/jpeg`.
    #[default]
    Extension,
    /// Use the MIME type declared in the upload.
    Declared,
}

/// Determine the MIME type to embed in a data URL.
#[must_use]
pub fn data_url_mime(strategy: MimeDetection, filename: &str, declared: &str) -> String {
    match strategy {
        MimeDetection::Extension => {
            if filename.to_ascii_lowercase().ends_with(".png") {
                "image/png".to_string()
            } else {
                "image/jpeg".to_string()
            }
        }
        MimeDetection::Declared => declared.to_string(),
    }
}

/// Check a declared upload MIME type against an allowlist.
#[must_use]
pub fn is_allowed(declared: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|t| t.eq_ignore_ascii_case(declared))
}
