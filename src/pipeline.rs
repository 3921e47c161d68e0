//! End-to-end run: discover -> extract -> label -> commit -> notify.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::discover::{self, EventRef};
use crate::extract::{self, RawFight};
use crate::label;
use crate::notify::Notifier;

const CONCURRENCY: usize = 4;
const USER_AGENT: &str = "Mozilla/5.0";

pub struct Outcome {
    pub events_processed: usize,
    pub extracted: usize,
    pub committed: usize,
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Run the full pipeline once.
///
/// Empty discovery and per-event extraction failures degrade to fewer
/// records, not errors; a store failure degrades to a committed count of
/// zero. Only unanticipated conditions bubble up as `Err`, which the caller
/// turns into a single failure notification and a non-zero exit.
pub async fn run(cfg: &Config, conn: &Connection, notifier: &Notifier) -> Result<Outcome> {
    let client = build_client(cfg.http_timeout)?;

    let events = discover::discover_events(&client, &cfg.target_event, cfg.max_events).await;
    if events.is_empty() {
        warn!("No events discovered; nothing to do");
        notifier
            .failure("No fights were scraped from the events")
            .await;
        return Ok(Outcome {
            events_processed: 0,
            extracted: 0,
            committed: 0,
        });
    }

    let fights = extract_all(&client, &events).await;
    if fights.is_empty() {
        warn!("No fights were scraped");
        notifier
            .failure("No fights were scraped from the events")
            .await;
        return Ok(Outcome {
            events_processed: events.len(),
            extracted: 0,
            committed: 0,
        });
    }

    let rows = stage_records(fights);

    let committed = match db::insert_fights(conn, &rows) {
        Ok(n) => n,
        Err(e) => {
            // Store failures reduce the committed count; they do not abort.
            error!("Error saving fights to database: {:#}", e);
            0
        }
    };

    notifier.success(events.len(), committed, rows.len()).await;
    info!(
        "Pipeline done: {} events, {} fights extracted, {} committed",
        events.len(),
        rows.len(),
        committed
    );

    Ok(Outcome {
        events_processed: events.len(),
        extracted: rows.len(),
        committed,
    })
}

/// Extract every event concurrently, bounded by a semaphore. Each event is
/// independent; results are concatenated in completion order, which is not
/// a contract anywhere downstream.
async fn extract_all(client: &reqwest::Client, events: &[EventRef]) -> Vec<RawFight> {
    let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
    let (tx, mut rx) = tokio::sync::mpsc::channel::<Vec<RawFight>>(CONCURRENCY * 2);

    for event in events.iter().cloned() {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();
            let fights = extract::extract_fights(&client, &event).await;
            let _ = tx.send(fights).await;
        });
    }
    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let pb = ProgressBar::new(events.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    let mut all = Vec::new();
    while let Some(fights) = rx.recv().await {
        all.extend(fights);
        pb.inc(1);
    }
    pb.finish_and_clear();
    all
}

/// Label every extracted fight with an independent coin flip.
fn stage_records(fights: Vec<RawFight>) -> Vec<db::FightRow> {
    let mut rng = rand::thread_rng();
    fights
        .into_iter()
        .map(|f| label::label_fight(&mut rng, f))
        .collect()
}

// ── Tests ──
