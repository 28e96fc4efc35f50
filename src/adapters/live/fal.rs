//! Live adapter for the Fal.ai generative API (base64 data-URL payload).

use std::time::Duration;

use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::mime::{data_url_mime, MimeDetection};
use crate::ports::image_transformer::{ImageTransformer, TransformFuture, TransformRequest};
use crate::prompt::transformation_prompt;

const FAL_API_URL: &str = "https://fal.run/fal-ai/flux/dev/image-to-image";

/// Live Fal.ai transformer that embeds the image as a base64 data URL in a
/// JSON body.
pub struct FalTransformer {
    client: Client,
    api_key: String,
    api_url: String,
    timeout: Option<Duration>,
    mime_detection: MimeDetection,
    max_body_bytes: Option<u64>,
}

impl FalTransformer {
    /// Create a new Fal.ai transformer.
    ///
    /// `timeout` is `None` by default for this variant (the client library
    /// default applies); `max_body_bytes` is the optional cap on the encoded
    /// payload, `None` meaning no cap.
    #[must_use]
    pub fn new(
        api_key: String,
        timeout: Option<Duration>,
        mime_detection: MimeDetection,
        max_body_bytes: Option<u64>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: FAL_API_URL.to_string(),
            timeout,
            mime_detection,
            max_body_bytes,
        }
    }

    /// Override the endpoint URL.
    #[must_use]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }
}

impl ImageTransformer for FalTransformer {
    fn transform(&self, request: &TransformRequest) -> TransformFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let bytes = tokio::fs::read(&request.image_path).await?;

            let mime =
                data_url_mime(self.mime_detection, &request.original_filename, &request.declared_mime);
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
            let image_url = format!("data:{mime};base64,{encoded}");

            if let Some(cap) = self.max_body_bytes {
                if image_url.len() as u64 > cap {
                    return Err(RelayError::Validation(format!(
                        "Encoded image exceeds the configured upstream body limit of {cap} bytes."
                    )));
                }
            }

            let prompt = transformation_prompt(&request.description);
            let payload = Payload { prompt: &prompt, image_url: &image_url, num_images: 1 };

            let mut outbound = self
                .client
                .post(&self.api_url)
                .header(AUTHORIZATION, format!("Key {}", self.api_key))
                .json(&payload);
            if let Some(timeout) = self.timeout {
                outbound = outbound.timeout(timeout);
            }

            let response = outbound.send().await?;
            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(RelayError::Provider {
                    status: Some(status.as_u16()),
                    message: truncate(&response_text),
                });
            }

            let parsed: FalResponse = serde_json::from_str(&response_text).map_err(|e| {
                RelayError::Provider {
                    status: None,
                    message: format!("Failed to parse response: {e}"),
                }
            })?;

            parsed.images.into_iter().next().map(|image| image.url).ok_or_else(|| {
                RelayError::Provider {
                    status: None,
                    message: "No image was generated.".to_string(),
                }
            })
        })
    }
}

fn truncate(text: &str) -> String {
    if text.len() > 500 {
        format!("{}...", &text[..500])
    } else {
        text.to_string()
    }
}

// --- Fal API request/response types ---

#[derive(Serialize)]
struct Payload<'a> {
    prompt: &'a str,
    image_url: &'a str,
    num_images: u32,
}

#[derive(Deserialize)]
struct FalResponse {
    #[serde(default)]
    images: Vec<FalImage>,
}

#[derive(Deserialize)]
struct FalImage {
    url: String,
}
