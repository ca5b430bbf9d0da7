use std::time::Duration;

use rama::{error::BoxError, http::StatusCode};

use super::*;
use crate::{
    config::{RunConfig, Workload},
    sample::Tally,
};

fn ok(index: u64, micros: u64) -> Sample {
    Sample::succeeded(index, Duration::from_micros(micros), StatusCode::OK)
}

fn failed(index: u64) -> Sample {
    Sample::failed(index, BoxError::from("connection refused"))
}

fn lines(buf: Vec<u8>) -> Vec<String> {
    String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(ToOwned::to_owned)
        .collect()
}

#[test]
fn test_human_bounded_report() {
    let cfg = RunConfig::new(Workload::MatrixMultiplication, "8080", 0, 1024);
    let mut reporter = HumanReporter::new(Vec::new(), Vec::new());
    let mut tally = Tally::default();

    reporter.on_start(&cfg, &cfg.target_url());
    for sample in [ok(1, 10), failed(2), ok(3, 20)] {
        tally.record(&sample);
        reporter.on_measured(&sample);
    }
    reporter.finish(&tally.summarize(3));

    let (out, err) = reporter.into_inner();
    assert_eq!(
        vec![
            "Iter 1: Execution time: 10 microseconds",
            "Iter 3: Execution time: 20 microseconds",
            "",
            "Average Execution Time: 10 microseconds",
        ],
        lines(out)
    );
    assert_eq!(vec!["request failed: connection refused"], lines(err));
}

#[test]
fn test_human_unbounded_report() {
    let cfg = RunConfig::new(Workload::TableGenerator, "8080", 0, 100);
    let mut reporter = HumanReporter::new(Vec::new(), Vec::new());

    reporter.on_start(&cfg, &cfg.target_url());
    reporter.on_fired(&ok(1, 0));
    reporter.on_fired(&failed(2));

    let (out, err) = reporter.into_inner();
    assert_eq!(
        vec![
            "Starting request loop to http://localhost:8080/table-generator/generate?rows=100 with table size 100.",
            "Request sent successfully.",
        ],
        lines(out)
    );
    assert_eq!(vec!["request failed: connection refused"], lines(err));
}

#[test]
fn test_jsonl_report() {
    let cfg = RunConfig::new(Workload::MatrixMultiplication, "8080", 25, 4);
    let mut reporter = JsonlReporter::new(Vec::new(), Vec::new());
    let mut tally = Tally::default();

    reporter.on_start(&cfg, &cfg.target_url());
    for sample in [ok(1, 30), failed(2)] {
        tally.record(&sample);
        reporter.on_measured(&sample);
    }
    reporter.finish(&tally.summarize(2));

    let (out, err) = reporter.into_inner();
    let values: Vec<serde_json::Value> = lines(out)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(4, values.len());
    assert_eq!("start", values[0]["type"]);
    assert_eq!(500, values[0]["iterations"]);
    assert_eq!(25, values[0]["interval_ns"]);

    assert_eq!("sample", values[1]["type"]);
    assert_eq!(true, values[1]["ok"]);
    assert_eq!(30, values[1]["latency_us"]);
    assert_eq!(200, values[1]["status"]);

    assert_eq!(false, values[2]["ok"]);
    assert_eq!("connection refused", values[2]["failure"]);

    assert_eq!("summary", values[3]["type"]);
    assert_eq!(15.0, values[3]["average_micros"]);
    assert_eq!(1, values[3]["failed"]);

    assert_eq!(vec!["request failed: connection refused"], lines(err));
}

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::Human, "".parse().unwrap());
    assert_eq!(ReportFormat::Human, "human".parse().unwrap());
    assert_eq!(ReportFormat::Jsonl, "JSON".parse().unwrap());
    assert_eq!(ReportFormat::Jsonl, "jsonl".parse().unwrap());
    assert!("xml".parse::<ReportFormat>().is_err());
}
