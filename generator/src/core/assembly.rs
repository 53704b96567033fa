//! Final book assembly
//!
//! Pure and synchronous: merges a session's final page records into the
//! caller-facing book. Dispatch order never guarantees completion order,
//! so the records are re-sorted here regardless of how they settled.

use shared::{Book, PageRecord};

/// Build the ordered book from final page records (pure function)
///
/// Failed pages stay in the book; the caller shows a placeholder for them
/// rather than blocking display.
pub fn assemble_book(records: Vec<PageRecord>) -> Book {
    Book::from_records(records)
}
