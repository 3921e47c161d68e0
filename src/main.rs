mod config;
mod db;
mod discover;
mod extract;
mod label;
mod normalize;
mod notify;
mod pipeline;

use clap::{Parser, Subcommand};
use tracing::error;

use crate::config::Config;
use crate::notify::Notifier;

#[derive(Parser)]
#[command(name = "ufc_scraper", about = "Scrape recent UFC fight results into sqlite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: discover events, extract fights, label, store, notify
    Run {
        /// Stop discovery at the first event whose name contains this marker
        #[arg(short, long)]
        target: Option<String>,
        /// Max events to process
        #[arg(short = 'n', long)]
        max_events: Option<usize>,
    },
    /// List the events the pipeline would process, without scraping them
    Discover {
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short = 'n', long)]
        max_events: Option<usize>,
    },
    /// Extract and print the fights of a single event page
    Extract {
        /// Event-details URL
        url: String,
    },
    /// Show stored fight counts
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::from_env();

    match cli.command {
        Commands::Run { target, max_events } => {
            if let Some(t) = target {
                cfg.target_event = t;
            }
            if let Some(n) = max_events {
                cfg.max_events = n;
            }

            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let notifier = Notifier::new(cfg.webhook_url.clone());

            match pipeline::run(&cfg, &conn, &notifier).await {
                Ok(outcome) => {
                    println!(
                        "Done: {} events, {} fights extracted, {} committed.",
                        outcome.events_processed, outcome.extracted, outcome.committed
                    );
                    Ok(())
                }
                Err(e) => {
                    // One failure notification attempt; its own failure is
                    // logged inside the notifier and must not replace `e`.
                    error!("Pipeline failed: {:#}", e);
                    notifier.failure(&format!("{:#}", e)).await;
                    Err(e)
                }
            }
        }
        Commands::Discover { target, max_events } => {
            if let Some(t) = target {
                cfg.target_event = t;
            }
            if let Some(n) = max_events {
                cfg.max_events = n;
            }
            let client = pipeline::build_client(cfg.http_timeout)?;
            let events =
                discover::discover_events(&client, &cfg.target_event, cfg.max_events).await;
            if events.is_empty() {
                println!("No events found.");
                return Ok(());
            }
            for (i, event) in events.iter().enumerate() {
                println!("{:>3}. {}  {}", i + 1, event.name, event.url);
            }
            Ok(())
        }
        Commands::Extract { url } => {
            let client = pipeline::build_client(cfg.http_timeout)?;
            let event = discover::EventRef {
                url,
                name: String::new(),
            };
            let fights = extract::extract_fights(&client, &event).await;
            if fights.is_empty() {
                println!("No fights extracted.");
                return Ok(());
            }
            for f in &fights {
                println!(
                    "{} vs {} | {} | {} | R{} {}",
                    f.fighter_1.name,
                    f.fighter_2.name,
                    f.weight_class,
                    f.method,
                    f.round.map(|r| r.to_string()).unwrap_or_else(|| "?".into()),
                    f.time_seconds
                        .map(|t| format!("{}s", t))
                        .unwrap_or_else(|| "?".into()),
                );
            }
            println!("{} fights.", fights.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Fights:        {}", s.total);
            println!("Events:        {}", s.events);
            println!("Unknown time:  {}", s.unknown_time);
            if let Some(latest) = s.latest_event {
                println!("Latest event:  {}", latest);
            }
            Ok(())
        }
    }
}
