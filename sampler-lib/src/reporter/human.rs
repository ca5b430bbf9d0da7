use std::io::Write;

use super::{Reporter, write_line};
use crate::{
    config::{RunConfig, RunMode},
    sample::{Sample, Summary},
};

/// Line oriented text report, stdout for results and stderr for failures.
pub struct HumanReporter<O, E> {
    out: O,
    err: E,
}

impl<O, E> HumanReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O, E> HumanReporter<O, E>
where
    O: Write,
    E: Write,
{
    fn report_failure(&mut self, sample: &Sample) {
        if let Some(failure) = sample.failure.as_ref() {
            write_line(&mut self.err, format_args!("request failed: {failure}"));
        }
    }
}

impl<O, E> Reporter for HumanReporter<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    fn on_start(&mut self, cfg: &RunConfig, url: &str) {
        if cfg.mode == RunMode::Unbounded {
            write_line(
                &mut self.out,
                format_args!(
                    "Starting request loop to {url} with {} {}.",
                    cfg.workload.size_arg_name().replace('_', " "),
                    cfg.size,
                ),
            );
        }
    }

    fn on_measured(&mut self, sample: &Sample) {
        if sample.is_ok() {
            write_line(
                &mut self.out,
                format_args!(
                    "Iter {}: Execution time: {} microseconds",
                    sample.index,
                    sample.latency_micros(),
                ),
            );
        } else {
            self.report_failure(sample);
        }
    }

    fn on_fired(&mut self, sample: &Sample) {
        if sample.is_ok() {
            write_line(&mut self.out, format_args!("Request sent successfully."));
        } else {
            self.report_failure(sample);
        }
    }

    fn finish(&mut self, summary: &Summary) {
        write_line(
            &mut self.out,
            format_args!(
                "\nAverage Execution Time: {} microseconds",
                summary.average_micros
            ),
        );
    }
}
