//! REST backend for the ledger.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST actions/` `{text, publicationWorthy}` / `GET actions/?since=&publicationWorthy=`
//! - `GET memory/` → `{memory}` / `POST memory/` `{memory}`
//! - `POST publications/` `{content, timestamp}` / `GET publications/`
//! - `POST whitelisted-tokens/` `{tokenMint}` / `GET whitelisted-tokens/`
//!
//! Requests carry `Authorization: Token <key>`.

use crate::traits::{
    Journal, JournalEntry, JournalQuery, MemoryStore, PublicationLog, PublicationLogEntry,
    TokenWhitelist,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vigil_common::http::{build_client, join_url, read_json};
use vigil_common::Error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendActionRequest<'a> {
    text: &'a str,
    publication_worthy: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct MemoryBody {
    #[serde(default)]
    memory: Option<String>,
}

#[derive(Debug, Serialize)]
struct AppendPublicationRequest<'a> {
    content: &'a str,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WhitelistedToken {
    token_mint: String,
}

/// HTTP client for the hosted journal / memory / publication-log API.
pub struct LedgerClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl LedgerClient {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Option<Duration>,
    ) -> vigil_common::Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.map(String::from),
            client: build_client(timeout)?,
        })
    }

    fn add_auth_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref key) = self.api_key {
            request.header("Authorization", format!("Token {}", key))
        } else {
            request
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> anyhow::Result<reqwest::Response> {
        let response = self.add_auth_headers(request).send().await.map_err(Error::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status("ledger", status, &body).into());
        }
        Ok(response)
    }
}

#[async_trait]
impl Journal for LedgerClient {
    async fn append(&self, text: &str, publication_worthy: bool) -> anyhow::Result<JournalEntry> {
        let url = join_url(&self.base_url, "actions/");
        tracing::debug!(publication_worthy, "Appending journal entry");

        let response = self
            .send(self.client.post(&url).json(&AppendActionRequest {
                text,
                publication_worthy,
            }))
            .await?;

        // The API echoes the stored entry; fall back to a local timestamp if it does not.
        let stored = read_json::<JournalEntry>(response).await.ok();
        Ok(stored.unwrap_or_else(|| JournalEntry::new(text, publication_worthy)))
    }

    async fn query(&self, query: &JournalQuery) -> anyhow::Result<Vec<JournalEntry>> {
        let url = join_url(&self.base_url, "actions/");
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(since) = query.since {
            params.push(("since", since.to_rfc3339_opts(SecondsFormat::Micros, true)));
        }
        if let Some(flag) = query.publication_worthy {
            params.push(("publicationWorthy", flag.to_string()));
        }

        let response = self.send(self.client.get(&url).query(&params)).await?;
        let mut entries: Vec<JournalEntry> = read_json(response).await?;

        // the server filter is advisory; enforce it here as well
        entries.retain(|e| query.matches(e));
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }
}

#[async_trait]
impl MemoryStore for LedgerClient {
    async fn get(&self) -> anyhow::Result<String> {
        let url = join_url(&self.base_url, "memory/");
        let response = self.send(self.client.get(&url)).await?;
        let body: MemoryBody = read_json(response).await?;
        Ok(body.memory.unwrap_or_default())
    }

    async fn replace(&self, blob: &str) -> anyhow::Result<()> {
        let url = join_url(&self.base_url, "memory/");
        self.send(self.client.post(&url).json(&MemoryBody {
            memory: Some(blob.to_string()),
        }))
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PublicationLog for LedgerClient {
    async fn append(&self, content: &str, timestamp: DateTime<Utc>) -> anyhow::Result<()> {
        let url = join_url(&self.base_url, "publications/");
        self.send(
            self.client
                .post(&url)
                .json(&AppendPublicationRequest { content, timestamp }),
        )
        .await?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<PublicationLogEntry>> {
        let url = join_url(&self.base_url, "publications/");
        let response = self.send(self.client.get(&url)).await?;
        Ok(read_json(response).await?)
    }
}

#[async_trait]
impl TokenWhitelist for LedgerClient {
    async fn add(&self, mint: &str) -> anyhow::Result<()> {
        let url = join_url(&self.base_url, "whitelisted-tokens/");
        self.send(self.client.post(&url).json(&WhitelistedToken {
            token_mint: mint.to_string(),
        }))
        .await?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        let url = join_url(&self.base_url, "whitelisted-tokens/");
        let response = self.send(self.client.get(&url)).await?;
        let tokens: Vec<WhitelistedToken> = read_json(response).await?;
        Ok(tokens.into_iter().map(|t| t.token_mint).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> LedgerClient {
        LedgerClient::new(&server.uri(), Some("secret"), None).unwrap()
    }

    #[tokio::test]
    async fn append_posts_action_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/actions/"))
            .and(header("Authorization", "Token secret"))
            .and(body_json(json!({"text": "Waking up", "publicationWorthy": false})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "text": "Waking up",
                "timestamp": "2025-06-01T12:00:00Z",
                "publicationWorthy": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let entry = Journal::append(&client, "Waking up", false).await.unwrap();
        assert_eq!(entry.text, "Waking up");
        assert_eq!(entry.timestamp.to_rfc3339(), "2025-06-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn append_tolerates_empty_ack() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/actions/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let entry = Journal::append(&client, "[TOOL] Buying", true).await.unwrap();
        assert!(entry.publication_worthy);
    }

    #[tokio::test]
    async fn query_sends_filters_and_sorts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/actions/"))
            .and(query_param("publicationWorthy", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"text": "b", "timestamp": "2025-06-01T12:05:00Z", "publicationWorthy": true},
                {"text": "a", "timestamp": "2025-06-01T12:00:00Z", "publicationWorthy": true},
                {"text": "noise", "timestamp": "2025-06-01T12:01:00Z", "publicationWorthy": false}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let entries = client.query(&JournalQuery::backlog(None)).await.unwrap();
        let texts: Vec<_> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn memory_get_and_replace() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/memory/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"memory": null})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/memory/"))
            .and(body_json(json!({"memory": "new blob"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.get().await.unwrap(), "");
        client.replace("new blob").await.unwrap();
    }

    #[tokio::test]
    async fn whitelist_add_and_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/whitelisted-tokens/"))
            .and(header("Authorization", "Token secret"))
            .and(body_json(json!({"tokenMint": "WIF"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"tokenMint": "WIF"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/whitelisted-tokens/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "tokenMint": "WIF"},
                {"id": 2, "tokenMint": "BONK"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        TokenWhitelist::add(&client, "WIF").await.unwrap();
        assert_eq!(TokenWhitelist::list(&client).await.unwrap(), vec!["WIF", "BONK"]);
    }

    #[tokio::test]
    async fn non_success_status_is_external_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/publications/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = PublicationLog::list(&client).await.unwrap_err();
        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::External(_)));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/memory/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = MemoryStore::get(&client).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Json(_))), "{err}");
    }
}
