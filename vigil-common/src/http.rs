//! Shared HTTP client construction.

use crate::error::Result;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build a `reqwest::Client` for an external collaborator.
///
/// With `timeout` unset the transport defaults apply, matching how the agent
/// always behaved; set it through `network.call_timeout_secs`.
pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Read a response body as JSON.
///
/// A body that cannot be read is `Error::Http`; one that does not decode is `Error::Json`.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Join a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
