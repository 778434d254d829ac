//! Tests for logging functionality
//!
//! Only one global subscriber can be installed per process, so these
//! tests check that initialisation never panics rather than what it prints.

use modelgraph::core::logging::{init_logging, LogFormat};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_init_logging_with_levels_and_formats() {
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("modelgraph::loader=trace"), Some("json"));
    let _ = init_logging(Some("off"), Some("pretty"));
    let _ = init_logging(Some("not a [filter"), None);
}

#[test]
fn test_init_logging_rejects_unknown_format() {
    assert!(init_logging(Some("info"), Some("xml")).is_err());
}

#[test]
fn test_pipeline_logs_without_subscriber() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.model"), "model A\nend\n").unwrap();

    let report = modelgraph::loader::Project::new(&modelgraph::loader::ProjectConfig {
        include: vec![dir.path().to_path_buf()],
        require: vec!["a".to_string(), "missing".to_string()],
        ..Default::default()
    })
    .load();
    assert_eq!(report.failures.len(), 1);
}
