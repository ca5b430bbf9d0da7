use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use rama::{
    Service,
    error::BoxError,
    http::{Body, Request, Response, StatusCode},
};

/// In-process stand-in for the web client.
///
/// Every call takes `latency` (tokio time, so it can be paused)
/// and every `fail_every`-th call fails like a refused connection would.
#[derive(Debug, Clone)]
pub(crate) struct MockClient {
    latency: Duration,
    status: StatusCode,
    fail_every: Option<u64>,
    calls: Arc<AtomicU64>,
}

impl MockClient {
    pub(crate) fn new(latency: Duration) -> Self {
        Self {
            latency,
            status: StatusCode::OK,
            fail_every: None,
            calls: Default::default(),
        }
    }

    pub(crate) fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn failing_every(mut self, n: u64) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::Acquire)
    }
}

impl Service<Request> for MockClient {
    type Output = Response;
    type Error = BoxError;

    async fn serve(&self, req: Request) -> Result<Self::Output, Self::Error> {
        let call = self.calls.fetch_add(1, Ordering::AcqRel) + 1;
        if self.fail_every.is_some_and(|n| call % n == 0) {
            return Err(BoxError::from(format!(
                "mock connection refused for {}",
                req.uri()
            )));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut resp = Response::new(Body::from("mock payload"));
        *resp.status_mut() = self.status;
        Ok(resp)
    }
}
