//! Picture-book generation engine
//!
//! Turns one story-generation response into an ordered set of per-page
//! image-generation requests, enforces pacing and retry limits against an
//! unreliable remote service, and reconciles partial completion into a
//! consistent in-memory book.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use crate::core::{
    assemble_book, GenerationOrchestrator, GenerationSession, ImageRequestExecutor, RetryPolicy,
    RunningSession,
};
pub use error::{GeneratorError, GeneratorResult};
pub use traits::{BookStore, ImageClient, StoryClient};
pub use types::SessionPhase;
