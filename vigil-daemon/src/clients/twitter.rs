//! X (Twitter) API v2 posting.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use vigil_common::http::{build_client, join_url, read_json};
use vigil_common::Error;
use vigil_tools::{PostReceipt, SocialService};

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: Option<TweetData>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

pub struct TwitterClient {
    base_url: String,
    bearer_token: Option<String>,
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(
        base_url: &str,
        bearer_token: Option<&str>,
        timeout: Option<Duration>,
    ) -> vigil_common::Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            bearer_token: bearer_token.map(String::from),
            client: build_client(timeout)?,
        })
    }

    fn status_url(id: &str) -> String {
        format!("https://x.com/i/status/{id}")
    }
}

#[async_trait]
impl SocialService for TwitterClient {
    /// A refused post (4xx/5xx) comes back as a failed receipt; only
    /// transport errors are `Err`.
    async fn post(&self, text: &str) -> anyhow::Result<PostReceipt> {
        let Some(ref token) = self.bearer_token else {
            return Ok(PostReceipt {
                success: false,
                error: Some("no X bearer token configured".into()),
                ..PostReceipt::default()
            });
        };

        let url = join_url(&self.base_url, "2/tweets");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({"text": text}))
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(PostReceipt {
                success: false,
                error: Some(Error::from_status("x", status, &body).to_string()),
                ..PostReceipt::default()
            });
        }

        let parsed: TweetResponse = read_json(response).await?;
        match parsed.data {
            Some(data) => Ok(PostReceipt {
                success: true,
                url: Some(Self::status_url(&data.id)),
                id: Some(data.id),
                error: None,
            }),
            None => Ok(PostReceipt {
                success: false,
                error: Some("invalid response from X API".into()),
                ..PostReceipt::default()
            }),
        }
    }
}
