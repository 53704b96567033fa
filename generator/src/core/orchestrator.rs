//! End-to-end generation orchestration
//!
//! Drives one session through its lifecycle: request the story, seed the
//! page records, dispatch per-page image generation under the configured
//! concurrency policy, and let the session signal completion.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::core::assembly::assemble_book;
use crate::core::executor::ImageRequestExecutor;
use crate::core::prompt::build_image_prompt;
use crate::core::retry::RetryPolicy;
use crate::core::session::GenerationSession;
use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::{ImageClient, StoryClient};
use crate::types::SessionPhase;
use shared::{Book, ConcurrencyMode, GenerationSettings, PageRecord, SessionEvent};

/// Orchestrates one generation run over injected endpoint clients
pub struct GenerationOrchestrator<S, I>
where
    S: StoryClient + 'static,
    I: ImageClient + 'static,
{
    story_client: Arc<S>,
    image_client: Arc<I>,
    settings: GenerationSettings,
}

impl<S, I> GenerationOrchestrator<S, I>
where
    S: StoryClient + 'static,
    I: ImageClient + 'static,
{
    pub fn new(story_client: S, image_client: I, settings: GenerationSettings) -> Self {
        Self {
            story_client: Arc::new(story_client),
            image_client: Arc::new(image_client),
            settings,
        }
    }

    /// Begin a generation run and return a handle to the live session
    pub fn start(&self, page_count: u32, theme: &str) -> GeneratorResult<RunningSession> {
        if page_count == 0 {
            return Err(GeneratorError::config("page count must be at least 1"));
        }
        self.settings.validate()?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = Arc::new(GenerationSession::new(events_tx));

        let driver = tokio::spawn(Self::drive(
            self.story_client.clone(),
            self.image_client.clone(),
            self.settings.clone(),
            session.clone(),
            page_count,
            theme.to_string(),
        ));

        Ok(RunningSession {
            session,
            events: events_rx,
            driver,
        })
    }

    /// Run a whole generation to settlement and assemble the book
    pub async fn generate(&self, page_count: u32, theme: &str) -> GeneratorResult<Book> {
        self.start(page_count, theme)?.wait().await
    }

    async fn drive(
        story_client: Arc<S>,
        image_client: Arc<I>,
        settings: GenerationSettings,
        session: Arc<GenerationSession>,
        page_count: u32,
        theme: String,
    ) -> GeneratorResult<()> {
        session.set_phase(SessionPhase::StoryRequested).await;
        info!("📖 requesting a {page_count}-page story");

        let drafts = match story_client.request_story(page_count, &theme).await {
            Ok(drafts) => drafts,
            Err(error) => {
                let error = GeneratorError::story(error);
                session.abort(&error).await;
                return Err(error);
            }
        };

        if session.is_cancelled() {
            return Ok(());
        }
        session.set_phase(SessionPhase::StoryReceived).await;
        info!("✅ story received with {} pages", drafts.len());

        let prompts: Vec<String> = drafts
            .iter()
            .map(|draft| build_image_prompt(&settings.style_prefix, &draft.illustration_prompt))
            .collect();
        session.install_drafts(drafts).await;

        let executor = ImageRequestExecutor::new(image_client, RetryPolicy::from_settings(&settings));

        match settings.concurrency {
            ConcurrencyMode::PacedSequential => {
                for (page_index, prompt) in prompts.iter().enumerate() {
                    if session.is_cancelled() {
                        return Ok(());
                    }
                    executor.run(&session, page_index, prompt).await;
                    if page_index + 1 < prompts.len() {
                        tokio::time::sleep(settings.page_interval).await;
                    }
                }
            }
            ConcurrencyMode::FanOut => {
                // Settlement order is unconstrained here; the session's
                // completion latch handles interleaving.
                let dispatches = prompts
                    .iter()
                    .enumerate()
                    .map(|(page_index, prompt)| executor.run(&session, page_index, prompt));
                join_all(dispatches).await;
            }
        }

        Ok(())
    }
}

/// Handle to a live generation session
///
/// Exposes the event stream for incremental presentation updates, explicit
/// cancellation for abandonment, and an awaitable final book.
pub struct RunningSession {
    session: Arc<GenerationSession>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    driver: JoinHandle<GeneratorResult<()>>,
}

impl RunningSession {
    /// Next session event; pends while the run is in flight
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Abandon the session; pending work stops without further mutation
    pub fn cancel(&self) {
        self.session.cancel();
    }

    pub async fn is_generating(&self) -> bool {
        self.session.is_generating().await
    }

    pub async fn last_error(&self) -> Option<String> {
        self.session.last_error().await
    }

    /// Snapshot of the page records as they stand now
    pub async fn records(&self) -> Vec<PageRecord> {
        self.session.records().await
    }

    /// Assemble a book from the current records
    pub async fn book(&self) -> Book {
        assemble_book(self.session.records().await)
    }

    /// Wait for the run to settle and assemble the final book
    ///
    /// A story-level failure surfaces as `StoryGeneration`; page-level
    /// failures do not error here, they appear as Failed pages in the book.
    pub async fn wait(self) -> GeneratorResult<Book> {
        let RunningSession { session, events, driver } = self;
        drop(events);

        match driver.await {
            Ok(Ok(())) => Ok(assemble_book(session.records().await)),
            Ok(Err(error)) => Err(error),
            Err(join_error) => Err(GeneratorError::from(join_error)),
        }
    }
}
