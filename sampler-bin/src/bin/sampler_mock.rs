#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use load_sampler_lib::{
    mock::{MockConfig, bind_mock_server},
    utils::telemetry::{TelemetryConfig, init_tracing},
};
use rama::{
    error::BoxError,
    graceful::{self, ShutdownGuard},
    net::socket::Interface,
    rt::Executor,
    telemetry::tracing,
};

#[cfg(target_family = "unix")]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Local stand-in for the matrix-multiplication and table-generator server.
#[derive(Debug, Clone, Parser)]
#[command(name = "sampler-mock")]
#[command(bin_name = "sampler-mock")]
#[command(version, about, long_about = None)]
struct Args {
    /// network interface to bind to
    #[arg(
        long,
        short = 'b',
        value_name = "INTERFACE",
        default_value = "127.0.0.1:8080"
    )]
    bind: Interface,

    /// time spent on every response (e.g. `15ms`)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration, default_value = "0s")]
    latency: Duration,

    /// random deviation around the latency (e.g. `2ms`)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration, default_value = "0s")]
    jitter: Duration,

    /// drop every N-th tcp connection without answering
    #[arg(long, value_name = "N")]
    fail_every: Option<u64>,

    /// debug logging as default instead of Info; use RUST_LOG env for more options
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,

    /// enable pretty logging (format for humans)
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// write the tracing output to the provided (log) file instead of stderr
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[arg(long, value_name = "SECONDS", default_value_t = 1.)]
    /// the graceful shutdown timeout (<= 0.0 = no timeout)
    graceful: f64,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    init_tracing(TelemetryConfig {
        verbose: args.verbose,
        pretty: args.pretty,
        output: args.output.as_deref(),
    })?;

    let graceful_timeout = (args.graceful > 0.).then(|| Duration::from_secs_f64(args.graceful));

    let (error_tx, error_rx) = tokio::sync::oneshot::channel::<BoxError>();
    let graceful = graceful::Shutdown::new(new_shutdown_signal(error_rx));

    graceful.spawn_task_fn(async move |guard| {
        if let Err(err) = serve(args, guard).await {
            let _ = error_tx.send(err);
        }
    });

    let delay = match graceful_timeout {
        Some(duration) => graceful.shutdown_with_limit(duration).await?,
        None => graceful.shutdown().await,
    };

    tracing::debug!("gracefully shutdown with a delay of: {delay:?}");
    Ok(())
}

async fn serve(args: Args, guard: ShutdownGuard) -> Result<(), BoxError> {
    let cfg = MockConfig {
        base_latency: args.latency,
        jitter: args.jitter,
        fail_every: args.fail_every,
    };

    let (handle, server) = bind_mock_server(args.bind, cfg, Executor::graceful(guard)).await?;
    eprintln!("mock server listening on {}", handle.addr);

    server.await;

    tracing::info!(
        connections = handle.stats.connections(),
        dropped = handle.stats.dropped(),
        requests = handle.stats.requests(),
        "mock server stopped",
    );
    Ok(())
}

fn new_shutdown_signal(
    error_rx: tokio::sync::oneshot::Receiver<BoxError>,
) -> impl Future + Send + 'static {
    async move {
        tokio::select! {
            _ = graceful::default_signal() => {
                tracing::debug!("default signal triggered: init graceful shutdown");
            }
            result = error_rx => {
                match result {
                    Ok(err) => {
                        tracing::error!("fatal err received: {err}; abort");
                    },
                    Err(_) => {
                        tracing::debug!("mock server is finished without error, return control");
                    },
                }
            }
        }
    }
}
