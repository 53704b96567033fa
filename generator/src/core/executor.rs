//! Per-page image request execution with bounded retry

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::retry::RetryPolicy;
use crate::core::session::GenerationSession;
use crate::traits::ImageClient;

/// Drives a single page's illustration to a terminal status
///
/// Wraps one image client attempt per loop iteration and sleeps the fixed
/// retry delay between attempts. Failures are page-scoped: the executor
/// marks its own page and returns, it never aborts sibling pages.
pub struct ImageRequestExecutor<I>
where
    I: ImageClient + ?Sized,
{
    client: Arc<I>,
    policy: RetryPolicy,
}

impl<I> ImageRequestExecutor<I>
where
    I: ImageClient + ?Sized,
{
    pub fn new(client: Arc<I>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Run one page to settlement
    ///
    /// Cancellation is re-checked before every attempt; the terminal write
    /// itself re-checks inside the session, so a session discarded during
    /// a sleep or an in-flight request is never mutated.
    pub async fn run(&self, session: &GenerationSession, page_index: usize, prompt: &str) {
        let mut retries: u32 = 0;

        loop {
            if session.is_cancelled() {
                return;
            }

            match self.client.request_image(prompt).await {
                Ok(image_url) => {
                    debug!("🖼️ page {} illustrated after {} retries", page_index + 1, retries);
                    session.complete_page(page_index, image_url).await;
                    return;
                }
                Err(failure) => match self.policy.next_delay(&failure, retries) {
                    Some(delay) => {
                        retries += 1;
                        debug!(
                            "🔁 page {} attempt failed ({failure}), retry {} in {:?}",
                            page_index + 1,
                            retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        warn!(
                            "❌ page {} giving up after {} retries: {failure}",
                            page_index + 1,
                            retries
                        );
                        session.fail_page(page_index, failure).await;
                        return;
                    }
                },
            }
        }
    }
}
