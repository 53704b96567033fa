//! Generator service implementations

pub mod bookshelf;
pub mod image_client;
pub mod story_client;

pub use bookshelf::*;
pub use image_client::*;
pub use story_client::*;
