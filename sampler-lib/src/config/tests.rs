use std::time::Duration;

use super::*;

#[test]
fn test_iteration_count_threshold() {
    for size in [0, 1, 64, 256, 511, 512] {
        assert_eq!(500, iteration_count(size), "size = {size}");
    }
    for size in [513, 1024, 2048, u32::MAX] {
        assert_eq!(5, iteration_count(size), "size = {size}");
    }
}

#[test]
fn test_target_url_matrix_multiplication() {
    let cfg = RunConfig::new(Workload::MatrixMultiplication, "8080", 0, 256);
    assert_eq!(
        "http://localhost:8080/matrix-multiplication/compute?dimension=256",
        cfg.target_url()
    );
}

#[test]
fn test_target_url_table_generator() {
    let cfg = RunConfig::new(Workload::TableGenerator, "9000", 0, 1000);
    assert_eq!(
        "http://localhost:9000/table-generator/generate?rows=1000",
        cfg.target_url()
    );
}

#[test]
fn test_target_url_port_is_not_validated() {
    let cfg = RunConfig::new(Workload::MatrixMultiplication, "not-a-port", 0, 2);
    assert_eq!(
        "http://localhost:not-a-port/matrix-multiplication/compute?dimension=2",
        cfg.target_url()
    );
}

#[test]
fn test_default_modes() {
    let cfg = RunConfig::new(Workload::MatrixMultiplication, "1", 1_500, 512);
    assert_eq!(RunMode::Bounded { iterations: 500 }, cfg.mode);
    assert_eq!(Duration::from_nanos(1_500), cfg.interval);

    let cfg = RunConfig::new(Workload::MatrixMultiplication, "1", 0, 513);
    assert_eq!(RunMode::Bounded { iterations: 5 }, cfg.mode);

    let cfg = RunConfig::new(Workload::TableGenerator, "1", 0, 10);
    assert_eq!(RunMode::Unbounded, cfg.mode);
}

#[test]
fn test_with_mode_overwrite() {
    let cfg = RunConfig::new(Workload::TableGenerator, "1", 0, 10)
        .with_mode(RunMode::Bounded { iterations: 3 });
    assert_eq!(RunMode::Bounded { iterations: 3 }, cfg.mode);
}
