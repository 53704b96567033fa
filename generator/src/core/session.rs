//! Live state of one generation session
//!
//! A session owns the ordered page records for one run, the lifecycle
//! phase, and the event channel to the presentation layer. All terminal
//! page transitions and the single completion signal go through here, so
//! the monotonicity and exactly-once invariants live in one place.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::error::GeneratorError;
use crate::types::SessionPhase;
use shared::{ImageFailure, PageDraft, PageRecord, SessionEvent};

pub struct GenerationSession {
    records: RwLock<Vec<PageRecord>>,
    phase: RwLock<SessionPhase>,
    last_error: RwLock<Option<String>>,
    /// Set once when the caller abandons the session; checked before every
    /// mutation so pending retries cannot write into a discarded session
    cancelled: AtomicBool,
    /// Latch guaranteeing a single Completed or Aborted signal
    settled: AtomicBool,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl GenerationSession {
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            phase: RwLock::new(SessionPhase::Idle),
            last_error: RwLock::new(None),
            cancelled: AtomicBool::new(false),
            settled: AtomicBool::new(false),
            events,
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        *self.phase.read().await
    }

    pub async fn set_phase(&self, phase: SessionPhase) {
        let mut current = self.phase.write().await;
        debug!("session phase {} -> {}", *current, phase);
        *current = phase;
    }

    /// Whether a run is still in flight
    pub async fn is_generating(&self) -> bool {
        matches!(
            self.phase().await,
            SessionPhase::StoryRequested | SessionPhase::StoryReceived | SessionPhase::PerPageGenerating
        )
    }

    /// Most recent user-visible error message, if any
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Seed the session with the story drafts and begin per-page work
    ///
    /// Drafts are re-sorted defensively; the story client already sorts,
    /// but record index and page order must agree from here on.
    pub async fn install_drafts(&self, mut drafts: Vec<PageDraft>) {
        drafts.sort_by_key(|draft| draft.page_number);
        let mut records = self.records.write().await;
        *records = drafts.into_iter().map(PageRecord::from_draft).collect();
        drop(records);
        self.set_phase(SessionPhase::PerPageGenerating).await;
    }

    /// Abandon the session; in-flight work observes this and stops mutating
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            debug!("session cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Snapshot of the page records
    pub async fn records(&self) -> Vec<PageRecord> {
        self.records.read().await.clone()
    }

    pub async fn page_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Transition one page Pending → Succeeded
    ///
    /// Returns false when the write was refused (cancelled session, unknown
    /// index, or a record already terminal — terminal states never regress).
    pub async fn complete_page(&self, page_index: usize, image_url: String) -> bool {
        if self.is_cancelled() {
            return false;
        }

        let all_terminal = {
            let mut records = self.records.write().await;
            let record = match records.get_mut(page_index) {
                Some(record) => record,
                None => return false,
            };
            if record.is_terminal() {
                warn!("ignoring duplicate settlement for page {}", record.page_number);
                return false;
            }
            record.mark_succeeded(image_url.clone());
            records.iter().all(|record| record.is_terminal())
        };

        self.send_event(SessionEvent::PageUpdated { page_index, image_url });
        if all_terminal {
            self.finish().await;
        }
        true
    }

    /// Transition one page Pending → Failed after its retries are exhausted
    pub async fn fail_page(&self, page_index: usize, failure: ImageFailure) -> bool {
        if self.is_cancelled() {
            return false;
        }

        let (all_terminal, page_number) = {
            let mut records = self.records.write().await;
            let record = match records.get_mut(page_index) {
                Some(record) => record,
                None => return false,
            };
            if record.is_terminal() {
                warn!("ignoring duplicate settlement for page {}", record.page_number);
                return false;
            }
            record.mark_failed();
            let page_number = record.page_number;
            (records.iter().all(|record| record.is_terminal()), page_number)
        };

        *self.last_error.write().await = Some(format!("image generation failed for page {page_number}"));
        self.send_event(SessionEvent::PageFailed { page_index, failure });
        if all_terminal {
            self.finish().await;
        }
        true
    }

    /// Abort the whole session on a story-level failure
    pub async fn abort(&self, error: &GeneratorError) {
        if self.settled.swap(true, Ordering::SeqCst) {
            return;
        }
        self.set_phase(SessionPhase::Aborted).await;
        *self.last_error.write().await = Some(error.to_string());
        self.send_event(SessionEvent::Aborted {
            error: error.to_string(),
        });
    }

    /// Fire the completion signal exactly once
    async fn finish(&self) {
        if self.settled.swap(true, Ordering::SeqCst) {
            return;
        }
        self.set_phase(SessionPhase::Completed).await;
        self.send_event(SessionEvent::Completed);
    }

    fn send_event(&self, event: SessionEvent) {
        // A dropped receiver means the caller went away; nothing to notify.
        let _ = self.events.send(event);
    }
}
