//! Backend wire types
//!
//! JSON shapes exchanged with the console backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Outcome of a submitted statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqlStatus {
    Success,
    Error,
    /// Held for auditor approval
    Pending,
}

/// Transaction state of the session after the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    Committed,
    Uncommit,
}

/// Result returned by `POST /api/execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlResult {
    pub status: SqlStatus,
    #[serde(default)]
    pub tx_status: Option<TxStatus>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub rows: Option<Vec<Map<String, Value>>>,
}

impl SqlResult {
    pub fn is_success(&self) -> bool {
        self.status == SqlStatus::Success
    }

    pub fn row_count(&self) -> usize {
        self.rows.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_AUDITOR")]
    Auditor,
    #[serde(rename = "ROLE_USER")]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Auditor => "ROLE_AUDITOR",
            Role::User => "ROLE_USER",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().trim_start_matches("ROLE_") {
            "ADMIN" => Ok(Role::Admin),
            "AUDITOR" => Ok(Role::Auditor),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A database a user has been granted access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_type: Option<String>,
}

/// User account as served by `/api/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    /// Write-only: sent on create/update, never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub accessible_databases: Vec<DatabaseRef>,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: Some(password.into()),
            role,
            accessible_databases: Vec::new(),
        }
    }
}
