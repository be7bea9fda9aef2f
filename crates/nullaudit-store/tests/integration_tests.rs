//! Integration tests for nullaudit-store
//!
//! These tests drive the stores through the review lifecycle and the log
//! query path with deterministic fixture data.

use chrono::{Duration, Utc};
use nullaudit_domain::{LogEntry, LogQuery, LogType, TaskStatus};
use nullaudit_mock::{seed_logs, FixtureSource};
use nullaudit_store::{LogStore, StoreError, TaskStore};
use proptest::prelude::*;

#[test]
fn test_review_lifecycle_scenario() {
    let source = FixtureSource::new();
    let now = Utc::now();
    let mut store = TaskStore::seeded(&source, 5, now);

    let pending = store.list_pending();
    assert_eq!(pending.len(), 5);
    let id = pending[0].id.to_string();

    store.assign(&id, "alice", now).unwrap();
    assert_eq!(store.get(&id).unwrap().status, TaskStatus::Assigned);
    assert_eq!(store.get(&id).unwrap().assigned_to.as_deref(), Some("alice"));

    let outcome = store
        .submit_feedback(&id, "approved", None, None, now + Duration::minutes(2))
        .unwrap();
    assert_eq!(outcome.task.status, TaskStatus::Completed);
    assert_eq!(outcome.feedback.reviewer_id, "anonymous");
    assert_eq!(store.get(&id).unwrap().status, TaskStatus::Completed);

    let stats = store.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 4);
    assert_eq!(stats.assigned, 0);
    assert_eq!(stats.average_response_time, 120_000);
    assert_eq!(store.list_pending().len(), 4);
}

#[test]
fn test_pending_order_is_insertion_order() {
    let now = Utc::now();
    let mut store = TaskStore::seeded(&FixtureSource::new(), 4, now);
    let all = store.list(None);

    store.assign(all[1].id.as_str(), "bob", now).unwrap();

    let pending: Vec<_> = store.list_pending().into_iter().map(|t| t.id).collect();
    assert_eq!(pending, vec![all[0].id.clone(), all[2].id.clone(), all[3].id.clone()]);
}

#[test]
fn test_direct_completion_from_pending() {
    let now = Utc::now();
    let mut store = TaskStore::seeded(&FixtureSource::new(), 1, now);
    let id = store.list_pending()[0].id.to_string();

    let outcome = store
        .submit_feedback(&id, "deferred", Some("needs context".into()), Some("dave".into()), now)
        .unwrap();
    assert_eq!(outcome.task.status, TaskStatus::Completed);
    assert_eq!(outcome.feedback.comments.as_deref(), Some("needs context"));
    assert_eq!(store.list(Some(TaskStatus::Completed)).len(), 1);
}

#[test]
fn test_get_unknown_task() {
    let store = TaskStore::new();
    assert!(matches!(store.get("task-nope"), Err(StoreError::NotFound(_))));
}

#[test]
fn test_critical_pending_count() {
    let now = Utc::now();
    let mut store = TaskStore::seeded(&FixtureSource::new(), 10, now);
    let critical: Vec<_> = store
        .list_pending()
        .into_iter()
        .filter(|t| t.priority == nullaudit_domain::Priority::Critical)
        .collect();
    assert!(!critical.is_empty());

    let before = store.stats().critical_pending;
    assert_eq!(before, critical.len());

    store.assign(critical[0].id.as_str(), "erin", now).unwrap();
    assert_eq!(store.stats().critical_pending, before - 1);
}

#[test]
fn test_query_limit_scenario() {
    let now = Utc::now();
    let mut logs = LogStore::new(1000);
    logs.extend(seed_logs(&FixtureSource::new(), 100, Duration::seconds(15), now));

    let result = logs.query(&LogQuery {
        limit: Some(10),
        ..Default::default()
    });

    assert_eq!(result.total, 100);
    assert_eq!(result.filtered, 10);
    assert_eq!(result.logs[0].timestamp, now);
    for (i, entry) in result.logs.iter().enumerate() {
        assert_eq!(entry.timestamp, now - Duration::seconds(15 * i as i64));
    }
}

#[test]
fn test_query_default_limit_is_500() {
    let now = Utc::now();
    let mut logs = LogStore::new(1000);
    logs.extend(seed_logs(&FixtureSource::new(), 800, Duration::seconds(1), now));

    let result = logs.query(&LogQuery::default());
    assert_eq!(result.total, 800);
    assert_eq!(result.filtered, 500);
}

#[test]
fn test_query_combined_filters() {
    let now = Utc::now();
    let mut logs = LogStore::default();
    logs.append(LogEntry::new(now - Duration::minutes(30), LogType::Error, "attestation", "RPC 502"));
    logs.append(LogEntry::new(now - Duration::minutes(5), LogType::Error, "attestation", "RPC timeout"));
    logs.append(LogEntry::new(now - Duration::minutes(4), LogType::Info, "attestation", "RPC ok"));
    logs.append(LogEntry::new(now - Duration::minutes(3), LogType::Error, "scanner", "RPC unrelated"));

    let query = LogQuery {
        log_type: Some("Error".to_string()),
        component: Some("ATTEST".to_string()),
        search: Some("rpc".to_string()),
        since: Some((now - Duration::minutes(10)).to_rfc3339()),
        limit: None,
    };
    let result = logs.query(&query);
    assert_eq!(result.filtered, 1);
    assert_eq!(result.logs[0].message, "RPC timeout");
}

#[test]
fn test_repeated_query_is_identical() {
    let now = Utc::now();
    let mut logs = LogStore::default();
    logs.extend(seed_logs(&FixtureSource::new(), 50, Duration::seconds(7), now));

    let query = LogQuery {
        search: Some("scan".to_string()),
        ..Default::default()
    };
    assert_eq!(logs.query(&query), logs.query(&query));
}

proptest! {
    /// Property: the buffer never exceeds capacity and keeps the newest appends
    #[test]
    fn test_buffer_bound_property(capacity in 1usize..64, appends in 0usize..200) {
        let now = Utc::now();
        let mut logs = LogStore::new(capacity);
        for i in 0..appends {
            logs.append(LogEntry::new(now, LogType::Info, "prop", i.to_string()));
            prop_assert!(logs.len() <= capacity);
        }

        let kept: Vec<usize> = logs.iter().map(|e| e.message.parse().unwrap()).collect();
        let expected: Vec<usize> = (appends.saturating_sub(capacity)..appends).collect();
        prop_assert_eq!(kept, expected);
    }

    /// Property: query output is ordered newest first
    #[test]
    fn test_query_sorted_property(offsets in proptest::collection::vec(0i64..10_000, 0..100)) {
        let now = Utc::now();
        let mut logs = LogStore::default();
        for offset in &offsets {
            logs.append(LogEntry::new(now - Duration::seconds(*offset), LogType::Info, "prop", "x"));
        }

        let result = logs.query(&LogQuery::default());
        prop_assert_eq!(result.filtered, offsets.len());
        prop_assert!(result.logs.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    /// Property: generate(n) grows the store by exactly n
    #[test]
    fn test_generate_count_property(seed in 0usize..10, n in 0usize..50) {
        let now = Utc::now();
        let source = FixtureSource::new();
        let mut store = TaskStore::seeded(&source, seed, now);
        let generated = store.generate(&source, n, now);
        prop_assert_eq!(generated.len(), n);
        prop_assert_eq!(store.len(), seed + n);
    }
}
