use std::io::Write;

use super::{Reporter, write_line};
use crate::{
    config::{RunConfig, RunMode},
    sample::{Sample, Summary},
};

/// One JSON object per line on stdout.
///
/// Failures are additionally written as text to stderr.
pub struct JsonlReporter<O, E> {
    out: O,
    err: E,
}

impl<O, E> JsonlReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O, E> JsonlReporter<O, E>
where
    O: Write,
    E: Write,
{
    fn emit_sample(&mut self, sample: &Sample, measured: bool) {
        let failure = sample.failure.as_ref().map(|err| err.to_string());
        if let Some(failure) = failure.as_deref() {
            write_line(&mut self.err, format_args!("request failed: {failure}"));
        }

        let line = serde_json::json!({
            "type": "sample",
            "index": sample.index,
            "ok": sample.is_ok(),
            "status": sample.status.map(|s| s.as_u16()),
            "latency_us": measured.then(|| sample.latency_micros()),
            "failure": failure,
        });
        write_line(&mut self.out, format_args!("{line}"));
    }
}

impl<O, E> Reporter for JsonlReporter<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    fn on_start(&mut self, cfg: &RunConfig, url: &str) {
        let iterations = match cfg.mode {
            RunMode::Bounded { iterations } => Some(iterations),
            RunMode::Unbounded => None,
        };
        let line = serde_json::json!({
            "type": "start",
            "url": url,
            "workload": cfg.workload.to_string(),
            "size": cfg.size,
            "interval_ns": u64::try_from(cfg.interval.as_nanos()).unwrap_or(u64::MAX),
            "iterations": iterations,
        });
        write_line(&mut self.out, format_args!("{line}"));
    }

    fn on_measured(&mut self, sample: &Sample) {
        self.emit_sample(sample, true);
    }

    fn on_fired(&mut self, sample: &Sample) {
        self.emit_sample(sample, false);
    }

    fn finish(&mut self, summary: &Summary) {
        let mut line = serde_json::json!({ "type": "summary" });
        if let (Some(obj), Ok(serde_json::Value::Object(fields))) =
            (line.as_object_mut(), serde_json::to_value(summary))
        {
            obj.extend(fields);
        }
        write_line(&mut self.out, format_args!("{line}"));
    }
}
