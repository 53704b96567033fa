//! Story endpoint client implementation

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::prompt::build_story_prompt;
use crate::core::script;
use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::StoryClient;
use crate::types::{GenerationRequestBody, StoryResponseBody};
use shared::PageDraft;

/// Real story client against the remote text-generation endpoint
pub struct HttpStoryClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpStoryClient {
    /// Create a client with a request deadline
    ///
    /// The deadline is a hardening guard on the HTTP call itself; retry
    /// and pacing delays are handled above this layer.
    pub fn new(endpoint: Url, request_timeout: Duration) -> GeneratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GeneratorError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl StoryClient for HttpStoryClient {
    async fn request_story(&self, page_count: u32, theme: &str) -> GeneratorResult<Vec<PageDraft>> {
        let body = GenerationRequestBody {
            prompt: build_story_prompt(page_count, theme),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Server {
                status: status.as_u16(),
            });
        }

        let envelope: StoryResponseBody = response
            .json()
            .await
            .map_err(|e| GeneratorError::malformed(format!("story response has no answer field: {e}")))?;

        let drafts = script::parse_answer(&envelope.answer)?;
        debug!("📜 parsed {} page drafts from story response", drafts.len());
        Ok(drafts)
    }
}
