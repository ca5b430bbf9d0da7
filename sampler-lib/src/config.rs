//! Run configuration for a sampling session.
//!
//! A [`RunConfig`] is built once from the process arguments
//! and stays immutable for the entire run.

use std::{fmt, time::Duration};

/// Sizes up to (and including) this threshold are sampled
/// [`SMALL_SIZE_ITERATIONS`] times, larger ones [`LARGE_SIZE_ITERATIONS`] times.
pub const SMALL_SIZE_THRESHOLD: u32 = 512;

/// Iterations used in bounded mode for sizes `<=` [`SMALL_SIZE_THRESHOLD`].
pub const SMALL_SIZE_ITERATIONS: u32 = 500;

/// Iterations used in bounded mode for sizes `>` [`SMALL_SIZE_THRESHOLD`].
pub const LARGE_SIZE_ITERATIONS: u32 = 5;

/// Host every target URL points to.
pub const TARGET_HOST: &str = "localhost";

/// Number of bounded iterations for the given size parameter.
///
/// Larger problem sizes are expected to take (much) longer per request,
/// hence the far smaller sample count.
pub fn iteration_count(size: u32) -> u32 {
    if size <= SMALL_SIZE_THRESHOLD {
        SMALL_SIZE_ITERATIONS
    } else {
        LARGE_SIZE_ITERATIONS
    }
}

/// The remote computation that is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    MatrixMultiplication,
    TableGenerator,
}

impl Workload {
    /// Request path (without query) of the workload endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Self::MatrixMultiplication => "/matrix-multiplication/compute",
            Self::TableGenerator => "/table-generator/generate",
        }
    }

    /// Name of the query parameter carrying the size.
    pub fn size_param(self) -> &'static str {
        match self {
            Self::MatrixMultiplication => "dimension",
            Self::TableGenerator => "rows",
        }
    }

    /// Name of the size argument as shown in usage text.
    pub fn size_arg_name(self) -> &'static str {
        match self {
            Self::MatrixMultiplication => "matrix_size",
            Self::TableGenerator => "table_size",
        }
    }

    /// The mode a workload is driven in by default:
    /// matrix multiplication is timed, the table generator is only loaded.
    pub fn default_mode(self, size: u32) -> RunMode {
        match self {
            Self::MatrixMultiplication => RunMode::Bounded {
                iterations: iteration_count(size),
            },
            Self::TableGenerator => RunMode::Unbounded,
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatrixMultiplication => f.write_str("matrix-multiplication"),
            Self::TableGenerator => f.write_str("table-generator"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Sample exactly `iterations` requests, then report the average.
    Bounded { iterations: u32 },
    /// Keep firing requests until the process is terminated externally.
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Port of the target, used verbatim in the target URL.
    pub port: String,
    /// Pause after every request.
    pub interval: Duration,
    /// Problem size embedded in the request query.
    pub size: u32,
    pub workload: Workload,
    pub mode: RunMode,
}

impl RunConfig {
    /// Create the config for a workload in its default mode.
    pub fn new(workload: Workload, port: impl Into<String>, interval_ns: u64, size: u32) -> Self {
        Self {
            port: port.into(),
            interval: Duration::from_nanos(interval_ns),
            size,
            workload,
            mode: workload.default_mode(size),
        }
    }

    /// Overwrite the run mode, e.g. to time the table generator.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// The URL every request of this run is sent to.
    pub fn target_url(&self) -> String {
        format!(
            "http://{TARGET_HOST}:{}{}?{}={}",
            self.port,
            self.workload.path(),
            self.workload.size_param(),
            self.size,
        )
    }
}

#[cfg(test)]
mod tests;
