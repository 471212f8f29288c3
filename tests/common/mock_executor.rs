//! Mock Executor for Testing
//!
//! Records every submission for verification.

use sqlconsole::{Executor, Intent};
use std::sync::{Arc, Mutex};

/// Executor that records what the dispatcher sent
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    pub submitted: Arc<Mutex<Vec<(String, Intent)>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// All submissions in order
    pub fn get_submitted(&self) -> Vec<(String, Intent)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(String, Intent)> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

impl Executor for MockExecutor {
    fn submit(&self, text: &str, intent: Intent) {
        self.submitted
            .lock()
            .unwrap()
            .push((text.to_string(), intent));
    }
}
