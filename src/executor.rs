//! Statement submission
//!
//! The dispatcher hands text plus an [`Intent`] to an [`Executor`] and moves
//! on. [`BackendExecutor`] queues it for a worker task that talks to a
//! [`SqlBackend`] and reports results on a channel, so failures reach the
//! user without blocking the key handler.

use crate::api::{SqlBackend, SqlResult};
use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Action tag sent along with the statement text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Exec,
    Commit,
    Rollback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Exec => "EXEC",
            Intent::Commit => "COMMIT",
            Intent::Rollback => "ROLLBACK",
        }
    }

    /// SQL the backend expects for this intent. Transaction control is sent
    /// as the bare keyword; the backend recognizes it and acts on the session.
    pub fn wire_sql<'a>(&self, text: &'a str) -> &'a str {
        match self {
            Intent::Exec => text,
            Intent::Commit => "COMMIT",
            Intent::Rollback => "ROLLBACK",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives statements from the dispatcher. Must not block.
pub trait Executor: Send + Sync {
    fn submit(&self, text: &str, intent: Intent);
}

/// Notification emitted once a submission finishes
#[derive(Debug, Clone)]
pub enum ExecEvent {
    Completed { intent: Intent, result: SqlResult },
    Failed { intent: Intent, message: String },
    /// Nothing was sent (empty statement or no database chosen)
    Skipped { intent: Intent, reason: String },
}

/// A statement waiting for the worker
struct Job {
    intent: Intent,
    db_id: i64,
    sql: String,
}

/// Executor that forwards to a [`SqlBackend`] in the background.
///
/// Submissions are queued for one worker task, so they reach the backend one
/// at a time and in the order they were submitted.
pub struct BackendExecutor {
    db_id: ArcSwapOption<i64>,
    jobs: mpsc::UnboundedSender<Job>,
    events: mpsc::UnboundedSender<ExecEvent>,
}

impl BackendExecutor {
    /// Create the executor and the receiving end of its event channel.
    ///
    /// The worker is spawned on `runtime`; pass `Handle::current()` from
    /// inside a tokio context. It stops once the executor is dropped.
    pub fn new<B: SqlBackend + 'static>(
        backend: Arc<B>,
        runtime: Handle,
        db_id: Option<i64>,
    ) -> (Self, mpsc::UnboundedReceiver<ExecEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let (jobs, queue) = mpsc::unbounded_channel();
        runtime.spawn(run_worker(backend, queue, events.clone()));

        let executor = Self {
            db_id: ArcSwapOption::new(db_id.map(Arc::new)),
            jobs,
            events,
        };
        (executor, rx)
    }

    /// Target database for subsequent submissions
    pub fn select_database(&self, db_id: Option<i64>) {
        self.db_id.store(db_id.map(Arc::new));
    }

    pub fn database(&self) -> Option<i64> {
        self.db_id.load().as_deref().copied()
    }
}

impl Executor for BackendExecutor {
    fn submit(&self, text: &str, intent: Intent) {
        let Some(db_id) = self.database() else {
            warn!("⚠️ {} ignored: no database selected", intent);
            emit(
                &self.events,
                ExecEvent::Skipped {
                    intent,
                    reason: "no database selected".to_string(),
                },
            );
            return;
        };

        // Sent as-is: an explicit selection reaches the backend unmodified
        let sql = intent.wire_sql(text).to_string();
        if sql.trim().is_empty() {
            debug!("Nothing to execute at cursor");
            emit(
                &self.events,
                ExecEvent::Skipped {
                    intent,
                    reason: "empty statement".to_string(),
                },
            );
            return;
        }

        info!("▶️ Submitting {} to database {}", intent, db_id);
        if self.jobs.send(Job { intent, db_id, sql }).is_err() {
            warn!("❌ {} dropped: execution worker has stopped", intent);
            emit(
                &self.events,
                ExecEvent::Failed {
                    intent,
                    message: "execution worker has stopped".to_string(),
                },
            );
        }
    }
}

/// Drain the queue, one request in flight at a time
async fn run_worker<B: SqlBackend>(
    backend: Arc<B>,
    mut queue: mpsc::UnboundedReceiver<Job>,
    events: mpsc::UnboundedSender<ExecEvent>,
) {
    while let Some(Job { intent, db_id, sql }) = queue.recv().await {
        let event = match backend.execute(db_id, &sql).await {
            Ok(result) => ExecEvent::Completed { intent, result },
            Err(e) => {
                warn!("❌ {} failed: {}", intent, e);
                ExecEvent::Failed {
                    intent,
                    message: e.to_string(),
                }
            }
        };
        emit(&events, event);
    }
    debug!("Execution worker stopped");
}

fn emit(events: &mpsc::UnboundedSender<ExecEvent>, event: ExecEvent) {
    if events.send(event).is_err() {
        debug!("Execution event dropped: receiver closed");
    }
}
