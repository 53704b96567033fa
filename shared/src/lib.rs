//! Shared types for the picture-book generation system
//!
//! Contains the data model and cross-cutting concerns consumed both by the
//! generation engine and by presentation layers. Engine-internal types
//! (wire DTOs, session internals) are kept in the generator crate.

pub mod errors;
pub mod events;
pub mod logging;
pub mod types;

pub use errors::*;
pub use events::SessionEvent;
pub use types::*;
