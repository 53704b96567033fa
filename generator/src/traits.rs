//! Service trait definitions for dependency injection

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::GeneratorResult;
use shared::{Book, ImageFailure, PageDraft, SavedBook};

/// Story endpoint client: one request produces the whole ordered script
#[mockall::automock]
#[async_trait]
pub trait StoryClient: Send + Sync {
    /// Request a `page_count`-page story for `theme`, returning drafts
    /// sorted ascending by page number
    ///
    /// There is no retry at this layer; a failure aborts the whole
    /// generation and is surfaced to the caller immediately.
    async fn request_story(&self, page_count: u32, theme: &str) -> GeneratorResult<Vec<PageDraft>>;
}

/// Image endpoint client: a single attempt with no retry
///
/// The retry loop lives in the per-page executor, which interprets the
/// returned failure class against its retry ceilings.
#[mockall::automock]
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Request one illustration, returning its URL
    async fn request_image(&self, prompt: &str) -> Result<String, ImageFailure>;
}

/// Persisted book collection
#[mockall::automock]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a finished book, deriving its title and timestamp
    ///
    /// Refused (never partially applied) when the shelf is full under the
    /// reject-new policy or when the book has no pages.
    async fn save(&self, book: &Book) -> GeneratorResult<SavedBook>;

    /// All saved books, in insertion order
    async fn list(&self) -> GeneratorResult<Vec<SavedBook>>;

    /// Remove one book by id; removing an absent id is not an error
    async fn delete(&self, id: Uuid) -> GeneratorResult<()>;

    /// Remove the oldest book, returning whether one was removed
    async fn delete_oldest(&self) -> GeneratorResult<bool>;

    /// Whether a further save would be accepted without eviction
    async fn can_save(&self) -> bool;
}
