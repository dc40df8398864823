//! Clients for the external services behind the tool ports.

mod bounty;
mod brave;
mod executor;
mod jupiter;
mod twitter;

pub use bounty::TracingBountyBoard;
pub use brave::BraveClient;
pub use executor::ExecutorClient;
pub use jupiter::JupiterClient;
pub use twitter::TwitterClient;

use vigil_common::Error;

/// Send a request and turn a non-success status into `Error::External`.
pub(crate) async fn send_checked(
    service: &str,
    request: reqwest::RequestBuilder,
) -> anyhow::Result<reqwest::Response> {
    let response = request.send().await.map_err(Error::from)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::from_status(service, status, &body).into());
    }
    Ok(response)
}
