//! Outcome recorder
//!
//! Append-only CSV report, one row per processed job. Callers enqueue without
//! waiting; a writer task owns the file and `close()` drains everything still
//! in flight before the process exits.

use crate::controller::{ApplicationOutcome, OutcomeStatus};
use crate::error::{BotError, Result};
use chrono::Utc;
use log::{error, warn};
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const HEADER: [&str; 4] = ["Job Title", "Link", "Status", "Recorded At"];

pub struct ReportWriter {
    tx: mpsc::UnboundedSender<ApplicationOutcome>,
    task: JoinHandle<Result<usize>>,
}

impl ReportWriter {
    /// Open (or create) the report file and start the writer task. The header
    /// is written only when the file is new or empty.
    pub fn create(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| BotError::Report(format!("cannot open {}: {e}", path.display())))?;
        let needs_header = file
            .metadata()
            .map(|m| m.len() == 0)
            .map_err(|e| BotError::Report(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer
                .write_record(HEADER)
                .map_err(|e| BotError::Report(e.to_string()))?;
            writer.flush().map_err(|e| BotError::Report(e.to_string()))?;
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<ApplicationOutcome>();
        let task = tokio::spawn(async move {
            let mut written = 0usize;
            while let Some(outcome) = rx.recv().await {
                let status = match outcome.status {
                    OutcomeStatus::Applied => "Applied",
                    OutcomeStatus::Skipped => "Skipped",
                    OutcomeStatus::AlreadyApplied => "Already Applied",
                };
                let row = [
                    outcome.title.as_str(),
                    outcome.link.as_str(),
                    status,
                    &Utc::now().to_rfc3339(),
                ];
                if let Err(e) = writer.write_record(row) {
                    error!("report write failed: {e}");
                    continue;
                }
                if let Err(e) = writer.flush() {
                    error!("report flush failed: {e}");
                    continue;
                }
                written += 1;
            }
            writer.flush().map_err(|e| BotError::Report(e.to_string()))?;
            Ok(written)
        });

        Ok(Self { tx, task })
    }

    /// Non-blocking enqueue. A record that cannot be enqueued is logged and
    /// dropped; the run makes no correctness assumptions about write timing.
    pub fn append(&self, outcome: ApplicationOutcome) {
        if self.tx.send(outcome).is_err() {
            warn!("report writer already closed, dropping record");
        }
    }

    /// Drain pending records and flush the file. Must be awaited before
    /// process exit for the all-records-flushed guarantee.
    pub async fn close(self) -> Result<usize> {
        drop(self.tx);
        self.task
            .await
            .map_err(|e| BotError::Report(format!("writer task panicked: {e}")))?
    }
}
