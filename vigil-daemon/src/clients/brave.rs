//! Brave web search.

use super::send_checked;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use vigil_common::http::{build_client, join_url, read_json};
use vigil_tools::{WebResult, WebSearch};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebSection>,
}

#[derive(Debug, Deserialize)]
struct WebSection {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "page_age")]
    age: Option<String>,
}

pub struct BraveClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl BraveClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> vigil_common::Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl WebSearch for BraveClient {
    async fn search(&self, query: &str, count: usize) -> anyhow::Result<Vec<WebResult>> {
        let url = join_url(&self.base_url, "res/v1/web/search");
        let count_param = count.to_string();
        let request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", self.api_key.as_str())
            .query(&[("q", query), ("count", count_param.as_str())]);

        let response = send_checked("brave", request).await?;
        let parsed: SearchResponse = read_json(response).await?;

        Ok(parsed
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .take(count)
            .map(|r| WebResult {
                title: r.title,
                url: r.url,
                description: r.description,
                published: r.age,
            })
            .collect())
    }
}
