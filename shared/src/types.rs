//! Core types used throughout the picture-book generation system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Fallback title when a book has no usable first-page text
pub const DEFAULT_BOOK_TITLE: &str = "新しい絵本";

/// Maximum number of characters kept when deriving a book title
pub const TITLE_MAX_CHARS: usize = 20;

/// One page of the story script before any illustration exists
///
/// Produced once by the story client and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDraft {
    /// 1-based position of the page in the book
    pub page_number: u32,
    /// Story text read to the child
    pub narrative_text: String,
    /// Prompt sent to the image endpoint for this page
    pub illustration_prompt: String,
}

/// Illustration state of a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IllustrationStatus {
    Pending,
    Succeeded,
    Failed,
}

impl IllustrationStatus {
    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, IllustrationStatus::Succeeded | IllustrationStatus::Failed)
    }
}

impl Default for IllustrationStatus {
    fn default() -> Self {
        IllustrationStatus::Pending
    }
}

impl fmt::Display for IllustrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllustrationStatus::Pending => write!(f, "pending"),
            IllustrationStatus::Succeeded => write!(f, "succeeded"),
            IllustrationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A page draft plus its illustration outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_number: u32,
    pub narrative_text: String,
    pub illustration_prompt: String,
    pub image_url: Option<String>,
    pub illustration_status: IllustrationStatus,
}

impl PageRecord {
    /// Create a pending record from a story draft
    pub fn from_draft(draft: PageDraft) -> Self {
        Self {
            page_number: draft.page_number,
            narrative_text: draft.narrative_text,
            illustration_prompt: draft.illustration_prompt,
            image_url: None,
            illustration_status: IllustrationStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.illustration_status.is_terminal()
    }

    /// Pending → Succeeded with the generated URL
    ///
    /// Callers must not invoke this on a terminal record.
    pub fn mark_succeeded(&mut self, image_url: String) {
        self.image_url = Some(image_url);
        self.illustration_status = IllustrationStatus::Succeeded;
    }

    /// Pending → Failed
    pub fn mark_failed(&mut self) {
        self.illustration_status = IllustrationStatus::Failed;
    }
}

/// Ordered, assembled book handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pages: Vec<PageRecord>,
}

impl Book {
    /// Build a book from final page records, re-sorting by page number
    ///
    /// Dispatch order does not guarantee completion order, so the sort here
    /// is deliberate even when the input already looks ordered.
    pub fn from_records(mut records: Vec<PageRecord>) -> Self {
        records.sort_by_key(|record| record.page_number);
        Self { pages: records }
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page numbers whose illustration never arrived
    ///
    /// Callers show a placeholder for these; a failed page never blocks
    /// display of the rest of the book.
    pub fn failed_page_numbers(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|record| record.illustration_status == IllustrationStatus::Failed)
            .map(|record| record.page_number)
            .collect()
    }

    /// Derive a display title from the first page's text
    pub fn title(&self) -> String {
        let first_text = self
            .pages
            .first()
            .map(|record| record.narrative_text.trim())
            .unwrap_or("");

        if first_text.is_empty() {
            return DEFAULT_BOOK_TITLE.to_string();
        }

        if first_text.chars().count() > TITLE_MAX_CHARS {
            let truncated: String = first_text.chars().take(TITLE_MAX_CHARS).collect();
            format!("{truncated}...")
        } else {
            first_text.to_string()
        }
    }
}

/// A book persisted on the shelf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBook {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub pages: Vec<PageRecord>,
}

impl SavedBook {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Classification of a single failed image-generation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFailure {
    /// Server-side error status (HTTP 5xx)
    Server { status: u16 },
    /// Transport-level failure before a response arrived
    Network { message: String },
    /// Response arrived but carried no usable image URL
    Malformed { message: String },
}

impl fmt::Display for ImageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFailure::Server { status } => write!(f, "server error (status {status})"),
            ImageFailure::Network { message } => write!(f, "network error: {message}"),
            ImageFailure::Malformed { message } => write!(f, "malformed response: {message}"),
        }
    }
}

/// How per-page image requests are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// One page at a time, in page order, with a fixed delay between pages
    PacedSequential,
    /// All pages dispatched concurrently right after the story arrives
    FanOut,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::PacedSequential
    }
}

impl fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyMode::PacedSequential => write!(f, "paced-sequential"),
            ConcurrencyMode::FanOut => write!(f, "fan-out"),
        }
    }
}

impl std::str::FromStr for ConcurrencyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paced" | "paced-sequential" | "sequential" => Ok(ConcurrencyMode::PacedSequential),
            "fanout" | "fan-out" | "concurrent" => Ok(ConcurrencyMode::FanOut),
            _ => Err(format!("Unknown concurrency mode: {s}")),
        }
    }
}

/// What to do when saving into a full shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// Refuse the save and report the shelf as full
    RejectNew,
    /// Delete the oldest book to make room
    EvictOldest,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        EvictionPolicy::RejectNew
    }
}

impl std::str::FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" | "reject-new" => Ok(EvictionPolicy::RejectNew),
            "evict" | "evict-oldest" => Ok(EvictionPolicy::EvictOldest),
            _ => Err(format!("Unknown eviction policy: {s}")),
        }
    }
}

/// Tunables for one generation run
///
/// The retry ceilings and pacing delays varied across deployed snapshots of
/// this system; they are unified here as configuration rather than split
/// across separate code paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Maximum retries for HTTP 5xx responses from the image endpoint
    pub server_error_retry_limit: u32,
    /// Maximum retries for any other image-request failure
    pub transient_retry_limit: u32,
    /// Fixed delay before each image retry attempt
    pub retry_delay: Duration,
    /// Delay between pages in paced-sequential mode
    pub page_interval: Duration,
    /// Dispatch policy for per-page image requests
    pub concurrency: ConcurrencyMode,
    /// Constant prefix prepended to every illustration prompt
    pub style_prefix: String,
    /// Deadline on each HTTP request (hardening addition; the retry and
    /// pacing delays above are post-failure delays, not request deadlines)
    pub request_timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            server_error_retry_limit: 10,
            transient_retry_limit: 3,
            retry_delay: Duration::from_secs(30),
            page_interval: Duration::from_secs(10),
            concurrency: ConcurrencyMode::PacedSequential,
            style_prefix: "Shiki is a five-year-old human boy, and Shiro is his one-year-old little sister."
                .to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> SharedResult<()> {
        if self.request_timeout.is_zero() {
            return Err(SharedError::InvalidConfig {
                field: "request_timeout".to_string(),
                value: "0s".to_string(),
            });
        }
        Ok(())
    }
}
