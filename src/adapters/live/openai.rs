//! Live adapter for the `OpenAI` image-edit API (multipart form payload).

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::error::RelayError;
use crate::ports::image_transformer::{ImageTransformer, TransformFuture, TransformRequest};
use crate::prompt::transformation_prompt;

const OPENAI_EDIT_URL: &str = "https://api.openai.com/v1/images/edits";

/// Live `OpenAI` transformer that posts the raw image bytes as a multipart
/// form to the image-edit endpoint.
pub struct OpenAiTransformer {
    client: Client,
    api_key: String,
    api_url: String,
    timeout: Option<Duration>,
}

impl OpenAiTransformer {
    /// Create a new `OpenAI` transformer with the given API key and call timeout.
    #[must_use]
    pub fn new(api_key: String, timeout: Option<Duration>) -> Self {
        Self { client: Client::new(), api_key, api_url: OPENAI_EDIT_URL.to_string(), timeout }
    }

    /// Override the endpoint URL.
    #[must_use]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }
}

impl ImageTransformer for OpenAiTransformer {
    fn transform(&self, request: &TransformRequest) -> TransformFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let bytes = tokio::fs::read(&request.image_path).await?;
            let prompt = transformation_prompt(&request.description);

            let image_part = Part::bytes(bytes)
                .file_name(request.original_filename.clone())
                .mime_str(&request.declared_mime)?;
            let form = Form::new()
                .part("image", image_part)
                .text("prompt", prompt)
                .text("n", "1")
                .text("size", "1024x1024")
                .text("response_format", "url");

            let mut outbound = self
                .client
                .post(&self.api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .multipart(form);
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

            let parsed: EditResponse = serde_json::from_str(&response_text).map_err(|e| {
                RelayError::Provider {
                    status: None,
                    message: format!("Failed to parse response: {e}"),
                }
            })?;

            parsed.data.into_iter().next().map(|item| item.url).ok_or_else(|| {
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

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct EditResponse {
    #[serde(default)]
    data: Vec<EditImage>,
}

#[derive(Deserialize)]
struct EditImage {
    url: String,
}
