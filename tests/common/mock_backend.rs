//! Mock SQL Backend for Testing
//!
//! Records executed SQL and answers with a canned result, or fails on demand.

use async_trait::async_trait;
use sqlconsole::api::{SqlBackend, SqlResult, SqlStatus, TxStatus};
use sqlconsole::{ConsoleError, ConsoleResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockBackend {
    /// (db_id, sql) pairs in the order received
    pub executed: Arc<Mutex<Vec<(i64, String)>>>,
    /// Fail every request with this status
    pub fail_with: Option<u16>,
    pub tables: Vec<String>,
    /// Hold every statement except COMMIT/ROLLBACK this long before answering
    pub delay: Option<Duration>,
    /// SQL in the order it finished
    pub finished: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn get_finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn get_max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn get_executed(&self) -> Vec<(i64, String)> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlBackend for MockBackend {
    async fn execute(&self, db_id: i64, sql: &str) -> ConsoleResult<SqlResult> {
        self.executed
            .lock()
            .unwrap()
            .push((db_id, sql.to_string()));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let is_tcl = matches!(sql, "COMMIT" | "ROLLBACK");
        if let (Some(delay), false) = (self.delay, is_tcl) {
            tokio::time::sleep(delay).await;
        }
        self.finished.lock().unwrap().push(sql.to_string());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(status) = self.fail_with {
            return Err(ConsoleError::Api {
                status,
                message: "Access Denied".to_string(),
            });
        }

        let tx_status = if is_tcl {
            TxStatus::Committed
        } else {
            TxStatus::Uncommit
        };
        Ok(SqlResult {
            status: SqlStatus::Success,
            tx_status: Some(tx_status),
            message: Some(format!("ran: {}", sql)),
            columns: None,
            rows: None,
        })
    }

    async fn tables(&self, _db_id: i64) -> ConsoleResult<Vec<String>> {
        Ok(self.tables.clone())
    }
}
