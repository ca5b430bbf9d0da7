//! The driver loops of a sampling run.
//!
//! Exactly one request is in flight at any time,
//! the only other suspension point being the fixed
//! inter-request delay, which is applied after every
//! request regardless of its outcome.

use std::convert::Infallible;

use rama::{
    Service,
    error::BoxError,
    http::{Request, Response},
    telemetry::tracing,
};

use crate::{
    client::Sampler,
    config::{RunConfig, RunMode},
    reporter::Reporter,
    sample::{Summary, Tally},
};

/// Drive a run in the mode of the given config.
///
/// Returns the summary of a bounded run. An unbounded run never returns,
/// it only stops when the process is terminated (or this future is dropped).
pub async fn run_loop<S>(
    cfg: &RunConfig,
    sampler: &Sampler<S>,
    reporter: &mut dyn Reporter,
) -> Option<Summary>
where
    S: Service<Request, Output = Response, Error: Into<BoxError>>,
{
    reporter.on_start(cfg, sampler.url());
    match cfg.mode {
        RunMode::Bounded { iterations } => {
            Some(run_bounded(cfg, iterations, sampler, reporter).await)
        }
        RunMode::Unbounded => match run_unbounded(cfg, sampler, reporter).await {},
    }
}

/// Sample exactly `iterations` requests and report their average latency.
///
/// The average is taken over all iterations, failed ones included.
pub async fn run_bounded<S>(
    cfg: &RunConfig,
    iterations: u32,
    sampler: &Sampler<S>,
    reporter: &mut dyn Reporter,
) -> Summary
where
    S: Service<Request, Output = Response, Error: Into<BoxError>>,
{
    tracing::info!(
        url = %sampler.url(),
        %iterations,
        interval = %humantime::format_duration(cfg.interval),
        "start bounded sampling run",
    );

    let mut tally = Tally::default();
    for index in 1..=u64::from(iterations) {
        let sample = sampler.issue_request(index).await;
        tally.record(&sample);
        reporter.on_measured(&sample);

        tokio::time::sleep(cfg.interval).await;
    }

    let summary = tally.summarize(iterations);
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        average_micros = summary.average_micros,
        "bounded sampling run finished",
    );
    reporter.finish(&summary);
    summary
}

/// Fire requests forever, pausing the configured interval after each.
pub async fn run_unbounded<S>(
    cfg: &RunConfig,
    sampler: &Sampler<S>,
    reporter: &mut dyn Reporter,
) -> Infallible
where
    S: Service<Request, Output = Response, Error: Into<BoxError>>,
{
    tracing::info!(
        url = %sampler.url(),
        interval = %humantime::format_duration(cfg.interval),
        "start unbounded request loop",
    );

    let mut index: u64 = 0;
    loop {
        index = index.wrapping_add(1);
        let sample = sampler.fire_request(index).await;
        reporter.on_fired(&sample);

        tokio::time::sleep(cfg.interval).await;
    }
}
