//! Engine-internal types: wire DTOs and session bookkeeping

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON body sent to both generation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequestBody {
    pub prompt: String,
}

/// JSON envelope returned by the story endpoint
///
/// The `answer` field is prose with the script embedded as a fenced block.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryResponseBody {
    pub answer: String,
}

/// JSON body returned by the image endpoint
///
/// `image_url` stays optional so an absent field classifies as a malformed
/// response rather than a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponseBody {
    pub image_url: Option<String>,
}

/// One element of the fenced script array, as the endpoint spells it
///
/// All fields are optional: an element missing any of them is dropped
/// during parsing instead of failing the whole script.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScriptPage {
    pub page: Option<u32>,
    #[serde(rename = "PageText")]
    pub page_text: Option<String>,
    #[serde(rename = "IllustrationIdea")]
    pub illustration_idea: Option<String>,
}

/// Lifecycle of one generation session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    StoryRequested,
    StoryReceived,
    PerPageGenerating,
    Completed,
    Aborted,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::StoryRequested => write!(f, "story-requested"),
            SessionPhase::StoryReceived => write!(f, "story-received"),
            SessionPhase::PerPageGenerating => write!(f, "per-page-generating"),
            SessionPhase::Completed => write!(f, "completed"),
            SessionPhase::Aborted => write!(f, "aborted"),
        }
    }
}
