use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS latest_fights (
            id             INTEGER PRIMARY KEY,
            fighter_1      TEXT NOT NULL,
            fighter_1_kd   TEXT,
            fighter_1_str  TEXT,
            fighter_1_td   TEXT,
            fighter_1_sub  TEXT,
            fighter_2      TEXT NOT NULL,
            fighter_2_kd   TEXT,
            fighter_2_str  TEXT,
            fighter_2_td   TEXT,
            fighter_2_sub  TEXT,
            weight_class   TEXT NOT NULL,
            method         TEXT NOT NULL,
            round          INTEGER,
            time_seconds   INTEGER,
            winner_label   INTEGER NOT NULL CHECK(winner_label IN (0, 1)),
            event_name     TEXT NOT NULL,
            event_date     TEXT NOT NULL,
            created_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_fights_event ON latest_fights(event_name);
        ",
    )?;
    Ok(())
}

/// A labeled fight record, the unit the store commits. Created only by
/// [`crate::label::label_fight`] and never mutated afterwards.
///
/// `round` and `time_seconds` are `None` when the source text was absent or
/// non-numeric; they persist as NULL, never as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FightRow {
    pub fighter_1: String,
    pub fighter_1_kd: Option<String>,
    pub fighter_1_str: Option<String>,
    pub fighter_1_td: Option<String>,
    pub fighter_1_sub: Option<String>,
    pub fighter_2: String,
    pub fighter_2_kd: Option<String>,
    pub fighter_2_str: Option<String>,
    pub fighter_2_td: Option<String>,
    pub fighter_2_sub: Option<String>,
    pub weight_class: String,
    pub method: String,
    pub round: Option<u32>,
    pub time_seconds: Option<u32>,
    pub winner_label: u8,
    pub event_name: String,
}

/// Commit a batch of fight records in one transaction and return how many
/// were written. A failure rolls the whole batch back, so the caller sees
/// either the full count or an error (which it reports as zero committed).
///
/// Event dates are not scraped; the run date stands in for them.
pub fn insert_fights(conn: &Connection, fights: &[FightRow]) -> Result<usize> {
    if fights.is_empty() {
        return Ok(0);
    }
    let event_date = chrono::Local::now().format("%Y-%m-%d").to_string();

    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO latest_fights
             (fighter_1, fighter_1_kd, fighter_1_str, fighter_1_td, fighter_1_sub,
              fighter_2, fighter_2_kd, fighter_2_str, fighter_2_td, fighter_2_sub,
              weight_class, method, round, time_seconds, winner_label, event_name, event_date)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17)",
        )?;
        for f in fights {
            count += stmt.execute(rusqlite::params![
                f.fighter_1,
                f.fighter_1_kd,
                f.fighter_1_str,
                f.fighter_1_td,
                f.fighter_1_sub,
                f.fighter_2,
                f.fighter_2_kd,
                f.fighter_2_str,
                f.fighter_2_td,
                f.fighter_2_sub,
                f.weight_class,
                f.method,
                f.round,
                f.time_seconds,
                f.winner_label,
                f.event_name,
                event_date,
            ])?;
        }
    }
    tx.commit()?;
    info!("Committed {} fights to latest_fights", count);
    Ok(count)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub events: usize,
    pub unknown_time: usize,
    pub latest_event: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM latest_fights", [], |r| r.get(0))?;
    let events: usize = conn.query_row(
        "SELECT COUNT(DISTINCT event_name) FROM latest_fights",
        [],
        |r| r.get(0),
    )?;
    let unknown_time: usize = conn.query_row(
        "SELECT COUNT(*) FROM latest_fights WHERE time_seconds IS NULL",
        [],
        |r| r.get(0),
    )?;
    let latest_event: Option<String> = conn
        .query_row(
            "SELECT event_name FROM latest_fights ORDER BY id DESC LIMIT 1",
            [],
            |r| r.get(0),
        )
        .ok();
    Ok(Stats {
        total,
        events,
        unknown_time,
        latest_event,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(event: &str, label: u8) -> FightRow {
        FightRow {
            fighter_1: "A".into(),
            fighter_1_kd: Some("1".into()),
            fighter_1_str: Some("10 of 20".into()),
            fighter_1_td: None,
            fighter_1_sub: Some("0".into()),
            fighter_2: "B".into(),
            fighter_2_kd: Some("0".into()),
            fighter_2_str: None,
            fighter_2_td: Some("1 of 3".into()),
            fighter_2_sub: Some("0".into()),
            weight_class: "Lightweight".into(),
            method: "KO/TKO".into(),
            round: Some(2),
            time_seconds: None,
            winner_label: label,
            event_name: event.into(),
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_reports_committed_count() {
        let conn = memory_db();
        let rows = vec![sample_row("UFC 318", 1), sample_row("UFC 318", 0)];
        assert_eq!(insert_fights(&conn, &rows).unwrap(), 2);
        assert_eq!(get_stats(&conn).unwrap().total, 2);
    }

    #[test]
    fn empty_batch_commits_zero() {
        let conn = memory_db();
        assert_eq!(insert_fights(&conn, &[]).unwrap(), 0);
    }

    #[test]
    fn unknowns_persist_as_null_not_zero() {
        let conn = memory_db();
        insert_fights(&conn, &[sample_row("UFC 318", 1)]).unwrap();
        let (td, time): (Option<String>, Option<i64>) = conn
            .query_row(
                "SELECT fighter_1_td, time_seconds FROM latest_fights",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(td, None);
        assert_eq!(time, None);
    }

    #[test]
    fn bad_label_rolls_back_whole_batch() {
        let conn = memory_db();
        let rows = vec![sample_row("UFC 318", 1), sample_row("UFC 318", 7)];
        assert!(insert_fights(&conn, &rows).is_err());
        // All-or-nothing: the valid first row must not survive.
        assert_eq!(get_stats(&conn).unwrap().total, 0);
    }

    #[test]
    fn stats_counts_distinct_events() {
        let conn = memory_db();
        let rows = vec![
            sample_row("UFC 318", 1),
            sample_row("UFC 318", 0),
            sample_row("UFC 317", 1),
        ];
        insert_fights(&conn, &rows).unwrap();
        let s = get_stats(&conn).unwrap();
        assert_eq!(s.total, 3);
        assert_eq!(s.events, 2);
        assert_eq!(s.unknown_time, 3);
        assert_eq!(s.latest_event.as_deref(), Some("UFC 317"));
    }
}
