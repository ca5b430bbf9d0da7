//! Local mock of the compute server targeted by the samplers.
//!
//! Serves both workload endpoints with an opaque payload
//! and can be configured to be slow, jittery or to drop connections.
//! Only meant for manual experiments and automated tests.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use rama::{
    Layer as _, Service,
    error::{BoxError, ErrorContext as _},
    http::{
        Body, HeaderValue, Request, Response, StatusCode,
        headers::ContentType,
        layer::{required_header::AddRequiredResponseHeadersLayer, trace::TraceLayer},
        server::HttpServer,
        service::web::{
            Router,
            response::{Headers, IntoResponse},
        },
    },
    layer::TimeoutLayer,
    net::{address::SocketAddress, socket::Interface},
    rt::Executor,
    tcp::server::TcpListener,
    telemetry::tracing,
};
use serde::Deserialize;

use crate::{config::Workload, utils::env::server_identifier};

/// Payload bytes served per unit of the requested size.
const BYTES_PER_SIZE_UNIT: usize = 64;
/// Upper bound of a single payload.
const MAX_BODY_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Time spent "computing" every response.
    pub base_latency: Duration,
    /// Random deviation (both directions) around the base latency.
    pub jitter: Duration,
    /// Drop every n-th tcp connection without answering.
    pub fail_every: Option<u64>,
}

/// Counters of a running mock server.
#[derive(Debug, Default)]
pub struct MockStats {
    connections: AtomicU64,
    dropped: AtomicU64,
    requests: AtomicU64,
}

impl MockStats {
    /// Accepted tcp connections, dropped ones included.
    pub fn connections(&self) -> u64 {
        self.connections.load(Ordering::Acquire)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Acquire)
    }

    /// Requests answered on a workload endpoint.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct MockServerHandle {
    pub addr: SocketAddress,
    pub stats: Arc<MockStats>,
}

/// Bind the mock server.
///
/// The returned future serves connections until the (graceful) executor shuts down,
/// it is up to the caller to await or spawn it.
pub async fn bind_mock_server(
    interface: Interface,
    cfg: MockConfig,
    exec: Executor,
) -> Result<(MockServerHandle, impl Future<Output = ()> + Send + 'static), BoxError> {
    let stats = Arc::new(MockStats::default());
    let responder = MockResponder {
        cfg: cfg.clone(),
        stats: stats.clone(),
    };

    let router = Router::new()
        .with_get("/ping", "pong")
        .with_get(Workload::MatrixMultiplication.path(), {
            let responder = responder.clone();
            move |req: Request| {
                let responder = responder.clone();
                async move { responder.respond(req).await }
            }
        })
        .with_get(Workload::TableGenerator.path(), move |req: Request| {
            let responder = responder.clone();
            async move { responder.respond(req).await }
        });

    let http_svc = (
        TraceLayer::new_for_http(),
        AddRequiredResponseHeadersLayer::new()
            .with_server_header_value(HeaderValue::from_static(server_identifier())),
    )
        .into_layer(router);

    let http_server = HttpServer::auto(exec.clone()).service(Arc::new(http_svc));

    let tcp_svc = TimeoutLayer::new(Duration::from_secs(60)).into_layer(ConnectionDropper {
        inner: http_server,
        fail_every: cfg.fail_every.map(|n| n.max(1)),
        stats: stats.clone(),
    });

    let tcp_listener = TcpListener::bind(interface, exec)
        .await
        .context("bind mock http server")?;

    let addr: SocketAddress = tcp_listener
        .local_addr()
        .context("get bound address for mock http server")?
        .into();

    tracing::info!(
        %addr,
        base_latency = ?cfg.base_latency,
        jitter = ?cfg.jitter,
        fail_every = ?cfg.fail_every,
        "mock http server bound",
    );

    Ok((
        MockServerHandle { addr, stats },
        tcp_listener.serve(tcp_svc),
    ))
}

#[derive(Debug, Deserialize)]
struct SizeQuery {
    dimension: Option<u32>,
    rows: Option<u32>,
}

#[derive(Debug, Clone)]
struct MockResponder {
    cfg: MockConfig,
    stats: Arc<MockStats>,
}

impl MockResponder {
    async fn respond(&self, req: Request) -> Response {
        let Some(size) = req
            .uri()
            .query()
            .and_then(|q| serde_html_form::from_str::<SizeQuery>(q).ok())
            .and_then(|q| q.dimension.or(q.rows))
        else {
            tracing::debug!(uri = %req.uri(), "reject mock request without size parameter");
            return (StatusCode::BAD_REQUEST, "missing size query parameter").into_response();
        };

        self.stats.requests.fetch_add(1, Ordering::AcqRel);

        let delay = self.compute_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let len = (size as usize)
            .saturating_mul(BYTES_PER_SIZE_UNIT)
            .min(MAX_BODY_SIZE);
        (
            StatusCode::OK,
            Headers::single(ContentType::octet_stream()),
            Body::from(vec![0u8; len]),
        )
            .into_response()
    }

    fn compute_delay(&self) -> Duration {
        let base = self.cfg.base_latency.as_secs_f64();
        let jitter = self.cfg.jitter.as_secs_f64();

        if jitter == 0.0 {
            return self.cfg.base_latency;
        }

        let span = jitter * 2.0;
        let u: f64 = rand::random();
        let delta = (u * span) - jitter;

        Duration::from_secs_f64((base + delta).max(0.0))
    }
}

/// Drops every n-th connection before any byte is read,
/// which the client observes as a transport failure.
#[derive(Debug)]
struct ConnectionDropper<S> {
    inner: S,
    fail_every: Option<u64>,
    stats: Arc<MockStats>,
}

impl<S, IO> Service<IO> for ConnectionDropper<S>
where
    S: Service<IO, Output: Default>,
    IO: Send + 'static,
{
    type Output = S::Output;
    type Error = S::Error;

    async fn serve(&self, io: IO) -> Result<Self::Output, Self::Error> {
        let connection = self.stats.connections.fetch_add(1, Ordering::AcqRel) + 1;
        if self.fail_every.is_some_and(|n| connection % n == 0) {
            tracing::debug!(%connection, "drop tcp connection");
            self.stats.dropped.fetch_add(1, Ordering::AcqRel);
            drop(io);
            return Ok(Default::default());
        }
        self.inner.serve(io).await
    }
}
