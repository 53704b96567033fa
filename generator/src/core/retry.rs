//! Retry policy for per-page image generation

use std::time::Duration;

use shared::{GenerationSettings, ImageFailure};

/// Bounded retry with a fixed delay before every attempt
///
/// One counter is shared by both failure classes: a page that burns retries
/// on server errors has fewer left for transient failures. Limits bound the
/// number of retries, not the number of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    server_error_retry_limit: u32,
    transient_retry_limit: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(server_error_retry_limit: u32, transient_retry_limit: u32, delay: Duration) -> Self {
        Self {
            server_error_retry_limit,
            transient_retry_limit,
            delay,
        }
    }

    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self::new(
            settings.server_error_retry_limit,
            settings.transient_retry_limit,
            settings.retry_delay,
        )
    }

    /// Decide whether to retry after a failure (pure function)
    ///
    /// Returns the delay to wait before the next attempt, or `None` when
    /// the ceiling for this failure class is exhausted. `retries_so_far`
    /// counts retries already performed for this page, both classes
    /// combined.
    pub fn next_delay(&self, failure: &ImageFailure, retries_so_far: u32) -> Option<Duration> {
        let limit = match failure {
            ImageFailure::Server { .. } => self.server_error_retry_limit,
            ImageFailure::Network { .. } | ImageFailure::Malformed { .. } => self.transient_retry_limit,
        };

        if retries_so_far < limit {
            Some(self.delay)
        } else {
            None
        }
    }
}
