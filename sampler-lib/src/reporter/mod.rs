use std::{fmt, io::Write};

use rama::telemetry::tracing;

use crate::{
    config::RunConfig,
    sample::{Sample, Summary},
};

mod human;
mod json;

pub use self::{human::HumanReporter, json::JsonlReporter};

/// Receives the events of a run, one at a time, in order.
pub trait Reporter: Send + 'static {
    fn on_start(&mut self, cfg: &RunConfig, url: &str);
    /// A timed request of a bounded run completed (or failed).
    fn on_measured(&mut self, sample: &Sample);
    /// An untimed request of an unbounded run completed (or failed).
    fn on_fired(&mut self, sample: &Sample);
    fn finish(&mut self, summary: &Summary);
}

/// Output format of the report written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Human,
    Jsonl,
}

impl ReportFormat {
    /// Reporter writing to the process' stdout and stderr.
    pub fn stdio_reporter(self) -> Box<dyn Reporter> {
        match self {
            Self::Human => Box::new(HumanReporter::new(std::io::stdout(), std::io::stderr())),
            Self::Jsonl => Box::new(JsonlReporter::new(std::io::stdout(), std::io::stderr())),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "human" | "text" => Ok(Self::Human),
            "json" | "jsonl" => Ok(Self::Jsonl),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Write a single line, a closed stream is not worth aborting a run for.
fn write_line(w: &mut impl Write, args: fmt::Arguments<'_>) {
    if let Err(err) = w.write_fmt(args).and_then(|_| w.write_all(b"\n")) {
        tracing::debug!("failed to write report line: {err}");
        return;
    }
    if let Err(err) = w.flush() {
        tracing::debug!("failed to flush report line: {err}");
    }
}

#[cfg(test)]
mod tests;
