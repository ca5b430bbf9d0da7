use std::time::Duration;

use rama::{http::StatusCode, telemetry::tracing};

use super::{Sampler, mock_client::MockClient};

const URL: &str = "http://localhost:8080/matrix-multiplication/compute?dimension=4";

#[tokio::test(start_paused = true)]
#[tracing_test::traced_test]
async fn test_issue_request_measures_latency() {
    let sampler = Sampler::new(MockClient::new(Duration::from_millis(3)), URL);

    let sample = sampler.issue_request(1).await;
    assert!(sample.is_ok());
    assert_eq!(1, sample.index);
    assert_eq!(3_000, sample.latency_micros());
    assert_eq!(Some(StatusCode::OK), sample.status);
}

#[tokio::test(start_paused = true)]
#[tracing_test::traced_test]
async fn test_issue_request_failure_is_zero_and_not_ok() {
    let client = MockClient::new(Duration::from_millis(3)).failing_every(1);
    let sampler = Sampler::new(client.clone(), URL);

    let sample = sampler.issue_request(7).await;
    assert!(!sample.is_ok());
    assert_eq!(7, sample.index);
    assert_eq!(0, sample.latency_micros());
    assert!(sample.failure.is_some());
    assert_eq!(1, client.calls());
}

#[tokio::test(start_paused = true)]
#[tracing_test::traced_test]
async fn test_http_error_status_is_still_a_sample() {
    let client = MockClient::new(Duration::from_millis(1))
        .with_status(StatusCode::INTERNAL_SERVER_ERROR);
    let sampler = Sampler::new(client, URL);

    let sample = sampler.issue_request(1).await;
    assert!(sample.is_ok());
    assert_eq!(Some(StatusCode::INTERNAL_SERVER_ERROR), sample.status);
    assert_eq!(1_000, sample.latency_micros());
}

#[tokio::test(start_paused = true)]
#[tracing_test::traced_test]
async fn test_fire_request_does_not_measure() {
    let sampler = Sampler::new(MockClient::new(Duration::from_millis(5)), URL);

    let sample = sampler.fire_request(1).await;
    assert!(sample.is_ok());
    assert_eq!(Duration::ZERO, sample.latency);
}

#[test]
fn test_sampler_keeps_url_verbatim() {
    let sampler = Sampler::new(MockClient::new(Duration::ZERO), URL);
    assert_eq!(URL, sampler.url());
}
