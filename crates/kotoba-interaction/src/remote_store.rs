//! RemoteStoreClient - best-effort mirroring to the persistence service.
//!
//! Every write here is issued after the local optimistic mutation has
//! already taken effect; callers log failures and never roll back. The
//! remote copy is last-write-wins with no version check.

use crate::classify::{classify_failure, classify_status};
use async_trait::async_trait;
use kotoba_core::error::{KotobaError, Result};
use kotoba_core::session::Session;
use kotoba_core::settings::Settings;
use kotoba_core::sync::{CredentialProvider, RemoteStore};
use kotoba_core::vocab::VocabularyItem;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const PERSIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Persistence client for the remote store.
#[derive(Clone)]
pub struct RemoteStoreClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl RemoteStoreClient {
    /// Creates a client for the given base URL (e.g.
    /// `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = self.credentials.token() {
            request.header("Authorization", format!("Bearer {}", token))
        } else {
            request
        }
    }

    /// Sends a write and discards the (status-only) response body.
    async fn send_write(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = self
            .auth_request(request.timeout(PERSIST_TIMEOUT))
            .send()
            .await
            .map_err(classify_failure)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }
        Ok(())
    }

    /// Sends a read and parses the body. A 2xx body that fails to parse is
    /// a shape failure the caller recovers from with a default.
    async fn send_read<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .auth_request(self.client.get(self.url(path)).timeout(PERSIST_TIMEOUT))
            .send()
            .await
            .map_err(classify_failure)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        response
            .json()
            .await
            .map_err(|e| KotobaError::shape(format!("Unexpected {} body: {}", path, e)))
    }
}

#[async_trait]
impl RemoteStore for RemoteStoreClient {
    async fn save_session(&self, session: &Session) -> Result<()> {
        self.send_write(self.client.post(self.url("sessions")).json(session))
            .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.send_write(
            self.client
                .delete(self.url(&format!("sessions/{}", session_id))),
        )
        .await
    }

    async fn save_vocab_item(&self, item: &VocabularyItem) -> Result<()> {
        self.send_write(self.client.post(self.url("vocab")).json(item))
            .await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.send_write(self.client.put(self.url("settings")).json(settings))
            .await
    }

    async fn fetch_sessions(&self) -> Result<Vec<Session>> {
        self.send_read("sessions").await
    }

    async fn fetch_vocab(&self) -> Result<Vec<VocabularyItem>> {
        self.send_read("vocab").await
    }

    async fn fetch_settings(&self) -> Result<Settings> {
        self.send_read("settings").await
    }
}
