//! Provider selection and per-provider defaults.

use std::time::Duration;

/// Supported image transformation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `OpenAI` image-edit endpoint (multipart form payload).
    OpenAi,
    /// Fal.ai generative endpoint (base64 data-URL payload).
    Fal,
}

impl ProviderKind {
    /// Default outbound call timeout for this provider.
    ///
    /// The multipart variant bounds its call at 120 seconds; the base64
    /// variant historically relied on the client library default, so it
    /// carries no bound unless one is configured.
    #[must_use]
    pub fn default_timeout(self) -> Option<Duration> {
        match self {
            Self::OpenAi => Some(Duration::from_secs(120)),
            Self::Fal => None,
        }
    }

    /// Default upload MIME allowlist for this provider, if any.
    #[must_use]
    pub fn default_allowed_types(self) -> Option<&'static [&'static str]> {
        match self {
            Self::OpenAi => None,
            Self::Fal => Some(&["image/jpeg", "image/jpg", "image/png"]),
        }
    }
}

/// Parse a configured provider name.
///
/// # Errors
///
/// Returns an error if the name is not a known provider.
pub fn parse_provider(name: &str) -> Result<ProviderKind, String> {
    match name.to_ascii_lowercase().as_str() {
        "openai" => Ok(ProviderKind::OpenAi),
        "fal" => Ok(ProviderKind::Fal),
        other => Err(format!("Unknown provider '{other}'. Expected 'openai' or 'fal'.")),
    }
}
