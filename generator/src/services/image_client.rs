//! Image endpoint client implementation
//!
//! One attempt per call; the returned failure class tells the executor's
//! retry policy which ceiling applies.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::ImageClient;
use crate::types::{GenerationRequestBody, ImageResponseBody};
use shared::ImageFailure;

/// Real image client against the remote image-generation endpoint
pub struct HttpImageClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpImageClient {
    pub fn new(endpoint: Url, request_timeout: Duration) -> GeneratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GeneratorError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ImageClient for HttpImageClient {
    async fn request_image(&self, prompt: &str) -> Result<String, ImageFailure> {
        let body = GenerationRequestBody {
            prompt: prompt.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageFailure::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ImageFailure::Server {
                status: status.as_u16(),
            });
        }
        // Non-5xx error statuses take the transient path, like any other
        // unusable body.
        if !status.is_success() {
            return Err(ImageFailure::Malformed {
                message: format!("unexpected status {status}"),
            });
        }

        let envelope: ImageResponseBody = response.json().await.map_err(|e| ImageFailure::Malformed {
            message: e.to_string(),
        })?;

        match envelope.image_url {
            Some(image_url) if !image_url.is_empty() => Ok(image_url),
            _ => Err(ImageFailure::Malformed {
                message: "response carried no image_url".to_string(),
            }),
        }
    }
}
