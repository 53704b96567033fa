//! Shared fixtures and test doubles for generator integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use generator::traits::ImageClient;
use shared::{ImageFailure, PageDraft};

/// Build drafts with the given page numbers, in that order
pub fn sample_drafts(page_numbers: &[u32]) -> Vec<PageDraft> {
    page_numbers
        .iter()
        .map(|&page_number| PageDraft {
            page_number,
            narrative_text: format!("text {page_number}"),
            illustration_prompt: format!("idea {page_number}"),
        })
        .collect()
}

/// Wrap a script body in the prose-plus-fenced-block answer shape the
/// story endpoint produces
pub fn story_answer(script_json: &str) -> String {
    format!("Here is the picture book you asked for.\n```json\n{script_json}\n```\nHave fun reading!")
}

/// One scripted reply from the fake image endpoint
pub struct ScriptedResponse {
    pub delay: Duration,
    pub result: Result<String, ImageFailure>,
}

impl ScriptedResponse {
    pub fn ok(image_url: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(image_url.to_string()),
        }
    }

    pub fn server_error(status: u16) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ImageFailure::Server { status }),
        }
    }

    pub fn network_error() -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ImageFailure::Network {
                message: "connection reset".to_string(),
            }),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Image client replaying a per-prompt queue of scripted responses
///
/// Clones share state, so a test can keep a handle for assertions after
/// handing the client to the orchestrator. Prompts with an exhausted (or
/// absent) queue succeed with a URL derived from the prompt.
#[derive(Clone)]
pub struct ScriptedImageClient {
    scripts: Arc<Mutex<HashMap<String, VecDeque<ScriptedResponse>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedImageClient {
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, prompt: &str, response: ScriptedResponse) {
        self.scripts
            .lock()
            .unwrap()
            .entry(prompt.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every prompt received, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageClient for ScriptedImageClient {
    async fn request_image(&self, prompt: &str) -> Result<String, ImageFailure> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(prompt)
            .and_then(|queue| queue.pop_front());

        match scripted {
            Some(response) => {
                if !response.delay.is_zero() {
                    tokio::time::sleep(response.delay).await;
                }
                response.result
            }
            None => Ok(format!("https://img.example/{prompt}")),
        }
    }
}
