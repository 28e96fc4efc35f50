//! Service context that bundles the port trait objects.

use std::sync::Arc;
use std::time::Duration;

use crate::adapters::live::fal::FalTransformer;
use crate::adapters::live::openai::OpenAiTransformer;
use crate::config::Config;
use crate::ports::ImageTransformer;
use crate::provider::ProviderKind;

/// Bundles the port trait objects shared across requests.
pub struct ServiceContext {
    /// Image transformer port.
    pub transformer: Arc<dyn ImageTransformer>,
}

impl ServiceContext {
    /// Create a live context for the given provider.
    ///
    /// A missing API key is not an error here: the credential is forwarded
    /// as-is and an absent one fails at the provider, not locally.
    #[must_use]
    pub fn live(kind: ProviderKind, config: &Config) -> Self {
        let timeout = config
            .provider
            .request_timeout_secs
            .map(Duration::from_secs)
            .or_else(|| kind.default_timeout());

        let transformer: Arc<dyn ImageTransformer> = match kind {
            ProviderKind::OpenAi => {
                let key = config.openai_key().unwrap_or_default();
                let mut adapter = OpenAiTransformer::new(key, timeout);
                if let Some(ref url) = config.provider.openai_api_url {
                    adapter = adapter.with_api_url(url.clone());
                }
                Arc::new(adapter)
            }
            ProviderKind::Fal => {
                let key = config.fal_key().unwrap_or_default();
                let mut adapter = FalTransformer::new(
                    key,
                    timeout,
                    config.upload.mime_detection,
                    config.provider.max_upstream_body_bytes,
                );
                if let Some(ref url) = config.provider.fal_api_url {
                    adapter = adapter.with_api_url(url.clone());
                }
                Arc::new(adapter)
            }
        };

        Self { transformer }
    }
}
