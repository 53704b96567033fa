//! Generator binary entry point

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use url::Url;

use generator::services::{HttpImageClient, HttpStoryClient, JsonBookShelf};
use generator::traits::BookStore;
use generator::GenerationOrchestrator;
use shared::{ConcurrencyMode, EvictionPolicy, GenerationSettings, SessionEvent};

#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Picture-book generator driving the story and image endpoints")]
struct Args {
    /// Number of pages to generate
    #[arg(long, default_value_t = 5)]
    pages: u32,

    /// Theme prompt for the story (blank omits the theme section)
    #[arg(long, default_value = "")]
    theme: String,

    /// Dispatch policy for image requests: paced-sequential or fan-out
    #[arg(long, default_value = "paced-sequential")]
    mode: String,

    /// Retry ceiling for server errors from the image endpoint
    #[arg(long)]
    server_retry_limit: Option<u32>,

    /// Seconds between pages in paced-sequential mode
    #[arg(long)]
    page_interval_secs: Option<u64>,

    /// Save the finished book to the shelf
    #[arg(long)]
    save: bool,

    /// Shelf file location
    #[arg(long, default_value = "books.json")]
    shelf: PathBuf,

    /// What to do when the shelf is full: reject-new or evict-oldest
    #[arg(long, default_value = "reject-new")]
    eviction: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    shared::logging::init_tracing("info");

    let story_endpoint: Url = env::var("STORY_ENDPOINT_URL")
        .context("STORY_ENDPOINT_URL must be set")?
        .parse()
        .context("STORY_ENDPOINT_URL is not a valid URL")?;
    let image_endpoint: Url = env::var("IMAGE_ENDPOINT_URL")
        .context("IMAGE_ENDPOINT_URL must be set")?
        .parse()
        .context("IMAGE_ENDPOINT_URL is not a valid URL")?;

    let mut settings = GenerationSettings::default();
    settings.concurrency = args.mode.parse::<ConcurrencyMode>().map_err(anyhow::Error::msg)?;
    if let Some(limit) = args.server_retry_limit {
        settings.server_error_retry_limit = limit;
    }
    if let Some(secs) = args.page_interval_secs {
        settings.page_interval = Duration::from_secs(secs);
    }
    let eviction = args.eviction.parse::<EvictionPolicy>().map_err(anyhow::Error::msg)?;

    let story_client = HttpStoryClient::new(story_endpoint, settings.request_timeout)?;
    let image_client = HttpImageClient::new(image_endpoint, settings.request_timeout)?;
    let orchestrator = GenerationOrchestrator::new(story_client, image_client, settings);

    shared::logging::log_startup(&format!("{}-page generation in {} mode", args.pages, args.mode));
    let mut running = orchestrator.start(args.pages, &args.theme)?;

    while let Some(event) = running.next_event().await {
        match event {
            SessionEvent::PageUpdated { page_index, .. } => {
                info!("🖼️ page {} illustrated", page_index + 1);
            }
            SessionEvent::PageFailed { page_index, failure } => {
                warn!("❌ page {} failed: {failure}", page_index + 1);
            }
            SessionEvent::Completed => break,
            SessionEvent::Aborted { error } => {
                anyhow::bail!("story generation failed: {error}");
            }
        }
    }

    let book = running.book().await;
    let failed = book.failed_page_numbers();
    info!(
        "📕 '{}' finished: {} pages, {} failed",
        book.title(),
        book.page_count(),
        failed.len()
    );

    for record in book.pages() {
        println!("--- page {} [{}] ---", record.page_number, record.illustration_status);
        println!("{}", record.narrative_text);
        if let Some(image_url) = &record.image_url {
            println!("{image_url}");
        }
    }
    if !failed.is_empty() {
        warn!("⚠️ pages without illustrations: {failed:?}");
    }

    if args.save {
        let shelf = JsonBookShelf::open(&args.shelf, eviction).await;
        let saved = shelf.save(&book).await?;
        info!("💾 saved as '{}' ({})", saved.title, saved.id);
    }

    Ok(())
}
