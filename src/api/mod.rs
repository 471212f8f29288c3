//! Console backend client
//!
//! Thin HTTP glue over the backend's REST endpoints. Statements are executed
//! server-side; this side only forwards text and decodes results.

pub mod models;
pub mod users;

pub use models::{DatabaseRef, Role, SqlResult, SqlStatus, TxStatus, User};
pub use users::UserClient;

use crate::config::Config;
use crate::error::{ConsoleError, ConsoleResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can run a statement against a database on our behalf
#[async_trait]
pub trait SqlBackend: Send + Sync {
    /// Submit `sql` for `db_id`
    async fn execute(&self, db_id: i64, sql: &str) -> ConsoleResult<SqlResult>;

    /// Table names visible in `db_id`
    async fn tables(&self, db_id: i64) -> ConsoleResult<Vec<String>>;
}

/// HTTP client for the console backend
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    base_url: String,
    http: reqwest::Client,
}

impl ConsoleClient {
    /// The backend keeps each transaction on the HTTP session, so the client
    /// holds on to its session cookie across requests.
    pub fn new(base_url: &str, timeout: Duration) -> ConsoleResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create client from config
    pub fn from_config(config: &Config) -> ConsoleResult<Self> {
        Self::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// User administration endpoints
    pub fn users(&self) -> UserClient<'_> {
        UserClient::new(self)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

#[async_trait]
impl SqlBackend for ConsoleClient {
    async fn execute(&self, db_id: i64, sql: &str) -> ConsoleResult<SqlResult> {
        debug!("POST /api/execute dbId={} ({} chars)", db_id, sql.len());
        let db = db_id.to_string();
        let response = self
            .http
            .post(self.url("/api/execute"))
            .form(&[("dbId", db.as_str()), ("sql", sql)])
            .send()
            .await?;

        let result: SqlResult = check(response).await?.json().await?;
        debug!("Execute finished with {:?}", result.status);
        Ok(result)
    }

    async fn tables(&self, db_id: i64) -> ConsoleResult<Vec<String>> {
        let response = self
            .http
            .get(self.url("/api/tables"))
            .query(&[("dbId", db_id)])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }
}

/// Turn a non-2xx response into [`ConsoleError::Api`], keeping the body text
pub(crate) async fn check(response: reqwest::Response) -> ConsoleResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("❌ Backend error ({}): {}", status, body);
    Err(ConsoleError::Api {
        status: status.as_u16(),
        message: api_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        }),
    })
}

/// Pull a human message out of an error body (`{"message": ...}` or plain text)
fn api_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => v
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .or_else(|| Some(body.to_string())),
        Err(_) => Some(body.to_string()),
    }
}
