//! User administration client
//!
//! CRUD over `/api/users` plus database grants. Admin-only on the server.

use super::{check, ConsoleClient, User};
use crate::error::{ConsoleError, ConsoleResult};
use reqwest::StatusCode;
use tracing::info;

/// Borrowed view of a [`ConsoleClient`] scoped to user endpoints
#[derive(Debug, Clone, Copy)]
pub struct UserClient<'a> {
    client: &'a ConsoleClient,
}

impl<'a> UserClient<'a> {
    pub fn new(client: &'a ConsoleClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ConsoleResult<Vec<User>> {
        let response = self
            .client
            .http()
            .get(self.client.url("/api/users"))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get(&self, id: i64) -> ConsoleResult<User> {
        let response = self
            .client
            .http()
            .get(self.client.url(&format!("/api/users/{}", id)))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Create an account. The backend answers 400 when the username is taken.
    pub async fn create(&self, user: &User) -> ConsoleResult<User> {
        let response = self
            .client
            .http()
            .post(self.client.url("/api/users"))
            .json(user)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(ConsoleError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        let created: User = check(response).await?.json().await?;
        info!("👤 Created user '{}' ({})", created.username, created.role);
        Ok(created)
    }

    /// Update an account; an empty or missing password keeps the current one
    pub async fn update(&self, id: i64, user: &User) -> ConsoleResult<User> {
        let mut body = user.clone();
        if body.password.as_deref().is_some_and(str::is_empty) {
            body.password = None;
        }

        let response = self
            .client
            .http()
            .put(self.client.url(&format!("/api/users/{}", id)))
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete(&self, id: i64) -> ConsoleResult<()> {
        let response = self
            .client
            .http()
            .delete(self.client.url(&format!("/api/users/{}", id)))
            .send()
            .await?;
        check(response).await?;
        info!("🗑️ Deleted user {}", id);
        Ok(())
    }

    /// Replace the set of databases `id` may access
    pub async fn assign_databases(&self, id: i64, db_ids: &[i64]) -> ConsoleResult<()> {
        let mut ids = db_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let response = self
            .client
            .http()
            .post(self.client.url(&format!("/api/users/{}/databases", id)))
            .json(&ids)
            .send()
            .await?;
        check(response).await?;
        info!("🔑 User {} granted databases {:?}", id, ids);
        Ok(())
    }
}
