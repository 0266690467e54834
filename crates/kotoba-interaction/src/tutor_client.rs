//! TutorApiClient - reply fetch over the tutor service's REST API.
//!
//! POSTs the user message plus the level and vocabulary context to the
//! configured endpoint and expects a structured-reply JSON body back.

use crate::classify::{classify_failure, classify_status};
use async_trait::async_trait;
use kotoba_core::error::{KotobaError, Result};
use kotoba_core::reply::StructuredReply;
use kotoba_core::sync::{CredentialProvider, ReplyService};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const REPLY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    level_context: &'a str,
    vocab_context: &'a str,
}

/// Reply-fetch client for the tutor service.
#[derive(Clone)]
pub struct TutorApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl TutorApiClient {
    /// Creates a client for the given base URL (e.g.
    /// `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Attaches the bearer credential when one is present.
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = self.credentials.token() {
            request.header("Authorization", format!("Bearer {}", token))
        } else {
            request
        }
    }
}

#[async_trait]
impl ReplyService for TutorApiClient {
    async fn fetch_reply(
        &self,
        message: &str,
        level_context: &str,
        vocab_context: &str,
    ) -> Result<StructuredReply> {
        let url = format!("{}/chat", self.base_url);
        let body = ChatRequest {
            message,
            level_context,
            vocab_context,
        };

        let request = self
            .auth_request(self.client.post(&url).json(&body))
            .timeout(REPLY_TIMEOUT);

        let response = request.send().await.map_err(classify_failure)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        // The service is asked for a fixed schema but not trusted to honor
        // it: parse as untyped JSON and coerce at the boundary.
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| KotobaError::shape(format!("Reply body is not JSON: {}", e)))?;

        StructuredReply::from_value(&value)
            .ok_or_else(|| KotobaError::shape("Reply body has no segments array"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_uses_camel_case_wire_names() {
        let body = ChatRequest {
            message: "こんにちは",
            level_context: "level",
            vocab_context: "猫, 犬",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "こんにちは");
        assert_eq!(json["levelContext"], "level");
        assert_eq!(json["vocabContext"], "猫, 犬");
    }
}
