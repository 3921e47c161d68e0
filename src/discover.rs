use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::{error, info};

pub const INDEX_URL: &str = "http://ufcstats.com/statistics/events/completed?page=all";

static EVENT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.b-link.b-link_style_black").unwrap());

/// One event card on the completed-events index. Identity is the url.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRef {
    pub url: String,
    pub name: String,
}

/// Fetch the completed-events index and return the most recent events.
///
/// Any fetch failure yields an empty list: an unreachable index means
/// "nothing to do", not a pipeline error.
pub async fn discover_events(
    client: &reqwest::Client,
    target_marker: &str,
    max_events: usize,
) -> Vec<EventRef> {
    info!("Fetching events index: {}", INDEX_URL);
    let html = match fetch_index(client).await {
        Ok(html) => html,
        Err(e) => {
            error!("Failed to fetch events index: {:#}", e);
            return Vec::new();
        }
    };

    let events = parse_event_index(&html, target_marker, max_events);
    info!("Found {} events to process", events.len());
    for (i, event) in events.iter().enumerate() {
        info!("  {}. {}", i + 1, event.name);
    }
    events
}

async fn fetch_index(client: &reqwest::Client) -> Result<String> {
    let res = client
        .get(INDEX_URL)
        .send()
        .await?
        .error_for_status()
        .context("events index returned an error status")?;
    Ok(res.text().await?)
}

/// Walk the index's event anchors in document order (most recent first),
/// dedupe by url, stop once an event name contains `target_marker`
/// (case-insensitive, that event included), then truncate to `max_events`.
pub fn parse_event_index(html: &str, target_marker: &str, max_events: usize) -> Vec<EventRef> {
    let document = Html::parse_document(html);
    let marker = target_marker.to_lowercase();
    let mut events: Vec<EventRef> = Vec::new();

    for link in document.select(&EVENT_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/event-details/") {
            continue;
        }
        let name = link.text().collect::<String>().trim().to_string();
        if name.is_empty() || events.iter().any(|e| e.url == href) {
            continue;
        }

        let is_target = !marker.is_empty() && name.to_lowercase().contains(&marker);
        if is_target {
            info!("Found target event: {}", name);
        }
        events.push(EventRef {
            url: href.to_string(),
            name,
        });
        if is_target {
            break;
        }
    }

    events.truncate(max_events);
    events
}

// ── Tests ──
