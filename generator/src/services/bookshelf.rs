//! JSON-file bookshelf implementation
//!
//! Persists the saved-book collection as a single JSON file, capped at ten
//! entries. A save is all-or-nothing: the new collection is written to disk
//! before the in-memory state changes, so a refused or failed save never
//! leaves a partial shelf behind.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::BookStore;
use shared::{Book, EvictionPolicy, SavedBook};

/// Maximum number of books kept on the shelf
pub const SHELF_CAPACITY: usize = 10;

/// Real book store backed by one JSON file
pub struct JsonBookShelf {
    path: PathBuf,
    eviction: EvictionPolicy,
    books: Arc<RwLock<Vec<SavedBook>>>,
}

impl JsonBookShelf {
    /// Open a shelf backed by `path`, loading any existing collection
    ///
    /// A missing or unreadable file starts an empty shelf rather than
    /// failing the caller.
    pub async fn open(path: impl Into<PathBuf>, eviction: EvictionPolicy) -> Self {
        let path = path.into();
        let books = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<SavedBook>>(&bytes) {
                Ok(books) => {
                    debug!("📚 loaded {} saved books from {}", books.len(), path.display());
                    books
                }
                Err(e) => {
                    warn!("⚠️ bookshelf file {} is unreadable, starting empty: {e}", path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            path,
            eviction,
            books: Arc::new(RwLock::new(books)),
        }
    }

    async fn persist(&self, books: &[SavedBook]) -> GeneratorResult<()> {
        let bytes = serde_json::to_vec_pretty(books)?;
        // Write-then-rename keeps the previous collection intact if the
        // write dies midway.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn oldest_index(books: &[SavedBook]) -> Option<usize> {
        books
            .iter()
            .enumerate()
            .min_by_key(|(_, book)| book.created_at)
            .map(|(index, _)| index)
    }
}

#[async_trait]
impl BookStore for JsonBookShelf {
    async fn save(&self, book: &Book) -> GeneratorResult<SavedBook> {
        if book.is_empty() {
            return Err(GeneratorError::config("refusing to save an empty book"));
        }

        let mut books = self.books.write().await;
        let mut next = books.clone();

        if next.len() >= SHELF_CAPACITY {
            match self.eviction {
                EvictionPolicy::RejectNew => {
                    return Err(GeneratorError::StorageFull {
                        limit: SHELF_CAPACITY,
                    });
                }
                EvictionPolicy::EvictOldest => {
                    if let Some(index) = Self::oldest_index(&next) {
                        let removed = next.remove(index);
                        info!("🗑️ evicted oldest book '{}' to make room", removed.title);
                    }
                }
            }
        }

        let saved = SavedBook {
            id: Uuid::new_v4(),
            title: book.title(),
            created_at: Utc::now(),
            pages: book.pages().to_vec(),
        };
        next.push(saved.clone());

        self.persist(&next).await?;
        *books = next;

        info!("💾 saved book '{}' with {} pages", saved.title, saved.page_count());
        Ok(saved)
    }

    async fn list(&self) -> GeneratorResult<Vec<SavedBook>> {
        Ok(self.books.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> GeneratorResult<()> {
        let mut books = self.books.write().await;
        let mut next = books.clone();
        let before = next.len();
        next.retain(|book| book.id != id);
        if next.len() == before {
            return Ok(());
        }

        self.persist(&next).await?;
        *books = next;
        Ok(())
    }

    async fn delete_oldest(&self) -> GeneratorResult<bool> {
        let mut books = self.books.write().await;
        let mut next = books.clone();
        let index = match Self::oldest_index(&next) {
            Some(index) => index,
            None => return Ok(false),
        };
        let removed = next.remove(index);

        self.persist(&next).await?;
        *books = next;
        info!("🗑️ deleted oldest book '{}'", removed.title);
        Ok(true)
    }

    async fn can_save(&self) -> bool {
        self.books.read().await.len() < SHELF_CAPACITY
    }
}
