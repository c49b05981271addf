// Model serialization tests (JSON camelCase, optional sub-structures)

mod common;

use common::stats_at;
use usage_summary::models::*;

#[test]
fn test_container_stats_serialization_camel_case() {
    let stats = stats_at(0, 2_000, 512);
    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"perCpu\""));
    assert!(json.contains("\"workingSet\""));
    let back: ContainerStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);
}

#[test]
fn test_container_stats_missing_sections_deserialize_as_none() {
    let json = r#"{"timestamp":"2023-11-14T22:13:20Z","cpu":{"usage":{"total":42}}}"#;
    let stats: ContainerStats = serde_json::from_str(json).unwrap();
    assert_eq!(stats.cpu_total(), Some(42));
    assert!(stats.memory.is_none());
    assert!(stats.network.is_none());
    assert_eq!(stats.memory_usage(), None);
}

#[test]
fn test_empty_snapshot_has_no_sections() {
    let stats = ContainerStats::empty(common::base_time());
    assert_eq!(stats.cpu_total(), None);
    assert_eq!(stats.memory_usage(), None);
}

#[test]
fn test_summary_default_serialization() {
    let json = serde_json::to_string(&ContainerStatsSummary::default()).unwrap();
    assert!(json.contains("\"timestamp\":null"));
    assert!(json.contains("\"samples\":[]"));
    assert!(json.contains("\"memoryUsagePercentiles\":[]"));
}
