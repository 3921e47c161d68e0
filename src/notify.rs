//! Pipeline outcome notifications.
//!
//! Fire-and-forget: a notification that cannot be delivered is logged and
//! never turned into a pipeline error. With no webhook configured the
//! payloads go to the log instead.

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct SuccessReport {
    status: &'static str,
    run_time: String,
    events_processed: usize,
    fights_added: usize,
    total_fights: usize,
}

#[derive(Debug, Serialize)]
struct FailureReport {
    status: &'static str,
    run_time: String,
    reason: String,
}

pub enum Notifier {
    Webhook {
        url: String,
        client: reqwest::Client,
    },
    LogOnly,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        match webhook_url {
            Some(url) => Notifier::Webhook {
                url,
                client: reqwest::Client::new(),
            },
            None => Notifier::LogOnly,
        }
    }

    pub async fn success(
        &self,
        events_processed: usize,
        fights_added: usize,
        total_fights: usize,
    ) {
        let report = SuccessReport {
            status: "success",
            run_time: now(),
            events_processed,
            fights_added,
            total_fights,
        };
        self.deliver(&report, "success").await;
    }

    pub async fn failure(&self, reason: &str) {
        let report = FailureReport {
            status: "failed",
            run_time: now(),
            reason: reason.to_string(),
        };
        self.deliver(&report, "failure").await;
    }

    async fn deliver<T: Serialize>(&self, report: &T, kind: &str) {
        match self {
            Notifier::Webhook { url, client } => {
                let result = client.post(url).json(report).send().await;
                match result.and_then(|r| r.error_for_status()) {
                    Ok(_) => info!("Sent {} notification", kind),
                    Err(e) => warn!("Failed to send {} notification: {:#}", kind, e),
                }
            }
            Notifier::LogOnly => info!(
                "Pipeline {} report: {}",
                kind,
                serde_json::to_string(report).unwrap_or_default()
            ),
        }
    }
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
