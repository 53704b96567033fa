//! Session events crossing from the engine to the presentation layer
//!
//! A presentation layer subscribes to these to update the screen page by
//! page while generation is still running.

use serde::{Deserialize, Serialize};

use crate::types::ImageFailure;

/// Progress notifications emitted by one generation session
///
/// Every page emits exactly one `PageUpdated` or `PageFailed`, and every
/// session emits exactly one `Completed` or `Aborted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A page's illustration arrived (0-based index into the book)
    PageUpdated { page_index: usize, image_url: String },
    /// A page exhausted its retries and was marked failed
    PageFailed { page_index: usize, failure: ImageFailure },
    /// Every page reached a terminal status
    Completed,
    /// The story request failed; no pages were generated
    Aborted { error: String },
}
