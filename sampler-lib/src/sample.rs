use std::time::Duration;

use rama::{error::BoxError, http::StatusCode};
use serde::Serialize;

/// Outcome of a single (attempted) request.
#[derive(Debug)]
pub struct Sample {
    /// 1-based position of the request within the run.
    pub index: u64,
    /// Measured latency, zero when failed or not measured.
    pub latency: Duration,
    /// Response status, only present when a response was received.
    pub status: Option<StatusCode>,
    /// Transport failure, if any.
    pub failure: Option<BoxError>,
}

impl Sample {
    pub fn succeeded(index: u64, latency: Duration, status: StatusCode) -> Self {
        Self {
            index,
            latency,
            status: Some(status),
            failure: None,
        }
    }

    pub fn failed(index: u64, failure: BoxError) -> Self {
        Self {
            index,
            latency: Duration::ZERO,
            status: None,
            failure: Some(failure),
        }
    }

    #[inline(always)]
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Latency in whole microseconds; always `0` for a failed sample.
    pub fn latency_micros(&self) -> u64 {
        if self.is_ok() {
            u64::try_from(self.latency.as_micros()).unwrap_or(u64::MAX)
        } else {
            0
        }
    }
}

/// Running fold over samples. No sample is retained.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    total_micros: u64,
    succeeded: u64,
    failed: u64,
}

impl Tally {
    pub fn record(&mut self, sample: &Sample) {
        if sample.is_ok() {
            self.succeeded += 1;
            self.total_micros = self.total_micros.saturating_add(sample.latency_micros());
        } else {
            self.failed += 1;
        }
    }

    pub fn total_micros(&self) -> u64 {
        self.total_micros
    }

    /// Summarize over the configured iteration count.
    ///
    /// Failed samples add nothing to the total
    /// but still count in the denominator.
    pub fn summarize(&self, iterations: u32) -> Summary {
        let average_micros = if iterations == 0 {
            0.
        } else {
            self.total_micros as f64 / iterations as f64
        };
        Summary {
            iterations,
            succeeded: self.succeeded,
            failed: self.failed,
            total_micros: self.total_micros,
            average_micros,
        }
    }
}

/// Result of a bounded run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub iterations: u32,
    pub succeeded: u64,
    pub failed: u64,
    pub total_micros: u64,
    pub average_micros: f64,
}
