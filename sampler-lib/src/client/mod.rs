//! centralized (web) client creation and request sampling
//!
//! The [`Sampler`] is generic over the client service,
//! which allows the driver tests to swap the real
//! web client for an in-process mock service.

use std::time::Duration;

use rama::{
    Service,
    error::{BoxError, ErrorContext as _},
    http::{
        Request, Response, StatusCode,
        body::util::BodyExt as _,
        client::EasyHttpWebClient,
        service::client::HttpClientExt as _,
    },
    rt::Executor,
    telemetry::tracing,
};
use tokio::time::Instant;

use crate::sample::Sample;

#[cfg(test)]
pub(crate) mod mock_client;

/// Create a new web client.
///
/// No connection pool is used: every request establishes
/// its own connection which is torn down once the response is consumed.
/// No timeout is applied either, a hanging target blocks the sampler.
pub fn new_web_client() -> impl Service<Request, Output = Response, Error: Into<BoxError>> {
    EasyHttpWebClient::connector_builder()
        .with_default_transport_connector()
        .without_tls_proxy_support()
        .without_proxy_support()
        .with_tls_support_using_boringssl(None)
        .with_default_http_connector(Executor::default())
        .build_client()
}

/// Issues GET requests to a single target URL, one at a time.
#[derive(Debug, Clone)]
pub struct Sampler<S> {
    client: S,
    url: String,
}

impl<S> Sampler<S>
where
    S: Service<Request, Output = Response, Error: Into<BoxError>>,
{
    pub fn new(client: S, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and measure it until the full body is received.
    ///
    /// Failures are returned as a failed [`Sample`], never as an error.
    pub async fn issue_request(&self, index: u64) -> Sample {
        let start = Instant::now();
        match self.send().await {
            Ok(status) => {
                let latency = start.elapsed();
                tracing::trace!(%index, ?latency, %status, "request completed");
                Sample::succeeded(index, latency, status)
            }
            Err(err) => {
                tracing::debug!(%index, url = %self.url, "request failed: {err}");
                Sample::failed(index, err)
            }
        }
    }

    /// Send one request without measuring it.
    pub async fn fire_request(&self, index: u64) -> Sample {
        match self.send().await {
            Ok(status) => {
                tracing::trace!(%index, %status, "request sent");
                Sample::succeeded(index, Duration::ZERO, status)
            }
            Err(err) => {
                tracing::debug!(%index, url = %self.url, "request failed: {err}");
                Sample::failed(index, err)
            }
        }
    }

    async fn send(&self) -> Result<StatusCode, BoxError> {
        let resp = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .context("send http request")
            .with_context_field("url", || self.url.clone())?;

        let status = resp.status();

        // the body only needs to arrive, its content is of no interest
        let body = resp
            .into_body()
            .collect()
            .await
            .context("receive http response body")?
            .to_bytes();
        tracing::trace!(%status, body.size = body.len(), "response body received");

        Ok(status)
    }
}

#[cfg(test)]
mod tests;
