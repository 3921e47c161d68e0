use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::discover::EventRef;
use crate::normalize;

static EVENT_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.b-content__title").unwrap());
static TBODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static CELL_TEXT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.b-fight-details__table-text").unwrap());
static FIGHTER_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.b-fight-details__table-text a").unwrap());

/// One competitor's slice of a result row. Stat fields stay in the source's
/// display format ("3 of 5" etc.); `None` marks an absent or empty cell node.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterStats {
    pub name: String,
    pub knockdowns: Option<String>,
    pub strikes: Option<String>,
    pub takedowns: Option<String>,
    pub submissions: Option<String>,
}

/// A parsed result row before bias correction. Slot 1 holds the bout's
/// winner — that is the source's fixed convention and the reason
/// [`crate::label`] exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFight {
    pub fighter_1: FighterStats,
    pub fighter_2: FighterStats,
    pub weight_class: String,
    pub method: String,
    pub round: Option<u32>,
    pub time_seconds: Option<u32>,
    pub event_name: String,
}

/// Fetch one event page and parse its result rows.
///
/// A fetch failure skips this event only: it is logged and an empty list is
/// returned so the rest of the run continues.
pub async fn extract_fights(client: &reqwest::Client, event: &EventRef) -> Vec<RawFight> {
    let html = match fetch_event_page(client, &event.url).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to fetch event {}: {:#}", event.url, e);
            return Vec::new();
        }
    };
    let fights = parse_event(&html);
    info!("Scraped {} fights from {}", fights.len(), event.name);
    fights
}

async fn fetch_event_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let res = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .context("event page returned an error status")?;
    Ok(res.text().await?)
}

/// Parse an event-details page into result rows.
///
/// Rows with fewer than 10 cells are section headers, not fights, and are
/// skipped. Each field is extracted independently so one missing node never
/// discards the rest of the row. Women's division bouts are dropped after
/// parsing (content filter, see [`normalize::is_womens_division`]).
pub fn parse_event(html: &str) -> Vec<RawFight> {
    let document = Html::parse_document(html);

    let event_name = document
        .select(&EVENT_TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "UFC Event".to_string());

    let Some(tbody) = document.select(&TBODY).next() else {
        warn!("No fight table found in this event");
        return Vec::new();
    };

    let mut fights = Vec::new();
    for row in tbody.select(&ROW) {
        let cells: Vec<ElementRef> = row.select(&CELL).collect();
        if cells.len() < 10 {
            continue;
        }

        let mut names = cells[1].select(&FIGHTER_LINK).map(element_text);
        let fighter_1_name = names.next().unwrap_or_else(|| "N/A".to_string());
        let fighter_2_name = names.next().unwrap_or_else(|| "N/A".to_string());

        let (f1_kd, f2_kd) = stacked_stat(&cells[2]);
        let (f1_str, f2_str) = stacked_stat(&cells[3]);
        let (f1_td, f2_td) = stacked_stat(&cells[4]);
        let (f1_sub, f2_sub) = stacked_stat(&cells[5]);

        let weight_class = first_text(&cells[6]).unwrap_or_else(|| "N/A".to_string());
        let method = first_text(&cells[7]).unwrap_or_else(|| "N/A".to_string());
        let round = first_text(&cells[8]).and_then(|s| s.parse().ok());
        let time_seconds = first_text(&cells[9])
            .as_deref()
            .and_then(normalize::parse_duration);

        if normalize::is_womens_division(&weight_class) {
            debug!("Skipping women's fight: {}", weight_class);
            continue;
        }

        fights.push(RawFight {
            fighter_1: FighterStats {
                name: fighter_1_name,
                knockdowns: f1_kd,
                strikes: f1_str,
                takedowns: f1_td,
                submissions: f1_sub,
            },
            fighter_2: FighterStats {
                name: fighter_2_name,
                knockdowns: f2_kd,
                strikes: f2_str,
                takedowns: f2_td,
                submissions: f2_sub,
            },
            weight_class,
            method,
            round,
            time_seconds,
            event_name: event_name.clone(),
        });
    }

    fights
}

/// A stat cell stacks two text nodes: the first belongs to fighter 1, the
/// second to fighter 2. Each is checked independently.
fn stacked_stat(cell: &ElementRef) -> (Option<String>, Option<String>) {
    let mut nodes = cell.select(&CELL_TEXT);
    let first = nodes.next().map(element_text).filter(|t| !t.is_empty());
    let second = nodes.next().map(element_text).filter(|t| !t.is_empty());
    (first, second)
}

fn first_text(cell: &ElementRef) -> Option<String> {
    cell.select(&CELL_TEXT)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/event.html").unwrap()
    }

    #[test]
    fn parses_complete_rows() {
        let fights = parse_event(&fixture());
        // Fixture holds 2 men's fights, 1 women's fight (dropped), 1 header
        // row (8 cells, skipped) and 1 row with a missing second strike node.
        assert_eq!(fights.len(), 3);

        let f = &fights[0];
        assert_eq!(f.event_name, "UFC 318: Holloway vs. Poirier 3");
        assert_eq!(f.fighter_1.name, "Max Holloway");
        assert_eq!(f.fighter_2.name, "Dustin Poirier");
        assert_eq!(f.fighter_1.knockdowns.as_deref(), Some("1"));
        assert_eq!(f.fighter_2.knockdowns.as_deref(), Some("0"));
        assert_eq!(f.fighter_1.strikes.as_deref(), Some("89 of 183"));
        assert_eq!(f.fighter_1.takedowns.as_deref(), Some("0 of 1"));
        assert_eq!(f.fighter_2.submissions.as_deref(), Some("1"));
        assert_eq!(f.weight_class, "Lightweight");
        assert_eq!(f.method, "Decision - Unanimous");
        assert_eq!(f.round, Some(5));
        assert_eq!(f.time_seconds, Some(300));
    }

    #[test]
    fn drops_womens_division_rows() {
        let fights = parse_event(&fixture());
        assert!(fights
            .iter()
            .all(|f| !normalize::is_womens_division(&f.weight_class)));
        assert!(fights.iter().all(|f| f.fighter_1.name != "Rose Namajunas"));
    }

    #[test]
    fn missing_second_stat_node_is_unknown_for_that_field_only() {
        let fights = parse_event(&fixture());
        let f = fights
            .iter()
            .find(|f| f.fighter_1.name == "Kevin Holland")
            .unwrap();
        // Strike cell has one node: fighter 1 keeps a value, fighter 2 gets None.
        assert_eq!(f.fighter_1.strikes.as_deref(), Some("45 of 90"));
        assert_eq!(f.fighter_2.strikes, None);
        // Neighbouring fields are untouched.
        assert_eq!(f.fighter_2.knockdowns.as_deref(), Some("0"));
        assert_eq!(f.fighter_2.takedowns.as_deref(), Some("2 of 3"));
    }

    #[test]
    fn short_rows_are_skipped() {
        let html = "<h2 class=\"b-content__title\">Card</h2>\
                    <table><tbody><tr>\
                    <td>a</td><td>b</td><td>c</td><td>d</td>\
                    <td>e</td><td>f</td><td>g</td><td>h</td>\
                    </tr></tbody></table>";
        assert!(parse_event(html).is_empty());
    }

    #[test]
    fn missing_table_yields_no_fights() {
        let html = "<h2 class=\"b-content__title\">Empty Card</h2><p>nothing</p>";
        assert!(parse_event(html).is_empty());
    }

    #[test]
    fn missing_title_falls_back_to_generic_label() {
        let html = std::fs::read_to_string("tests/fixtures/event.html")
            .unwrap()
            .replace("b-content__title", "b-content__other");
        let fights = parse_event(&html);
        assert!(!fights.is_empty());
        assert!(fights.iter().all(|f| f.event_name == "UFC Event"));
    }

    #[test]
    fn unparseable_round_and_time_are_unknown() {
        let fights = parse_event(&fixture());
        let f = fights
            .iter()
            .find(|f| f.fighter_1.name == "Kevin Holland")
            .unwrap();
        assert_eq!(f.round, None);
        assert_eq!(f.time_seconds, None);
    }

    #[test]
    fn reparsing_is_idempotent() {
        let html = fixture();
        let first = parse_event(&html);
        let second = parse_event(&html);
        assert_eq!(first, second);
    }
}
