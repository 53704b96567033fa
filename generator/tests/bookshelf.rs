//! Integration tests for the JSON-file bookshelf

mod common;

use common::sample_drafts;
use generator::services::{JsonBookShelf, SHELF_CAPACITY};
use generator::traits::BookStore;
use generator::GeneratorError;
use shared::{Book, EvictionPolicy, PageRecord};

fn book_titled(first_page_text: &str) -> Book {
    let mut records: Vec<PageRecord> = sample_drafts(&[1, 2]).into_iter().map(PageRecord::from_draft).collect();
    records[0].narrative_text = first_page_text.to_string();
    for (index, record) in records.iter_mut().enumerate() {
        record.mark_succeeded(format!("https://img.example/{index}"));
    }
    Book::from_records(records)
}

fn shelf_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("books.json")
}

#[tokio::test]
async fn test_save_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = shelf_path(&dir);

    {
        let shelf = JsonBookShelf::open(&path, EvictionPolicy::RejectNew).await;
        shelf.save(&book_titled("むかしむかし")).await.unwrap();
        shelf.save(&book_titled("あるところに")).await.unwrap();
    }

    let reopened = JsonBookShelf::open(&path, EvictionPolicy::RejectNew).await;
    let books = reopened.list().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "むかしむかし");
    assert_eq!(books[1].title, "あるところに");
    assert_eq!(books[0].page_count(), 2);
}

#[tokio::test]
async fn test_reject_new_when_shelf_is_full() {
    let dir = tempfile::tempdir().unwrap();
    let path = shelf_path(&dir);
    let shelf = JsonBookShelf::open(&path, EvictionPolicy::RejectNew).await;

    for index in 0..SHELF_CAPACITY {
        shelf.save(&book_titled(&format!("book {index}"))).await.unwrap();
    }
    assert!(!shelf.can_save().await);

    let result = shelf.save(&book_titled("one too many")).await;
    assert!(matches!(result, Err(GeneratorError::StorageFull { limit }) if limit == SHELF_CAPACITY));

    // The refused save left nothing behind, in memory or on disk
    assert_eq!(shelf.list().await.unwrap().len(), SHELF_CAPACITY);
    let reopened = JsonBookShelf::open(&path, EvictionPolicy::RejectNew).await;
    assert_eq!(reopened.list().await.unwrap().len(), SHELF_CAPACITY);
}

#[tokio::test]
async fn test_evict_oldest_makes_room() {
    let dir = tempfile::tempdir().unwrap();
    let shelf = JsonBookShelf::open(shelf_path(&dir), EvictionPolicy::EvictOldest).await;

    for index in 0..=SHELF_CAPACITY {
        shelf.save(&book_titled(&format!("book {index}"))).await.unwrap();
    }

    let books = shelf.list().await.unwrap();
    assert_eq!(books.len(), SHELF_CAPACITY);
    assert!(books.iter().all(|book| book.title != "book 0"));
    assert!(books.iter().any(|book| book.title == format!("book {SHELF_CAPACITY}")));
}

#[tokio::test]
async fn test_empty_book_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let shelf = JsonBookShelf::open(shelf_path(&dir), EvictionPolicy::RejectNew).await;

    let result = shelf.save(&Book::from_records(Vec::new())).await;
    assert!(matches!(result, Err(GeneratorError::Config { .. })));
    assert!(shelf.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_id_and_oldest() {
    let dir = tempfile::tempdir().unwrap();
    let shelf = JsonBookShelf::open(shelf_path(&dir), EvictionPolicy::RejectNew).await;

    let first = shelf.save(&book_titled("first")).await.unwrap();
    shelf.save(&book_titled("second")).await.unwrap();
    shelf.save(&book_titled("third")).await.unwrap();

    shelf.delete(first.id).await.unwrap();
    let books = shelf.list().await.unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|book| book.id != first.id));

    assert!(shelf.delete_oldest().await.unwrap());
    let books = shelf.list().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "third");

    // Deleting an absent id is not an error
    shelf.delete(first.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_oldest_on_empty_shelf() {
    let dir = tempfile::tempdir().unwrap();
    let shelf = JsonBookShelf::open(shelf_path(&dir), EvictionPolicy::RejectNew).await;

    assert!(!shelf.delete_oldest().await.unwrap());
}

#[tokio::test]
async fn test_unreadable_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = shelf_path(&dir);
    tokio::fs::write(&path, b"not json").await.unwrap();

    let shelf = JsonBookShelf::open(&path, EvictionPolicy::RejectNew).await;
    assert!(shelf.list().await.unwrap().is_empty());
    assert!(shelf.can_save().await);
}
