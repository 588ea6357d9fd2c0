//! Integration Tests for the Cache Facades
//!
//! Drives both contracts through the public API against the in-memory store
//! and a recording store with scripted failures.

use std::sync::{Arc, Mutex, Once};

use chrono::{Duration, Utc};
use docstore_cache::{
    CacheError, CacheItem, CacheItemPool, CalendarInterval, Config, MemoryStore, SimpleCache,
    Store, StoreError, Ttl,
};
use serde_json::{json, Value};

// == Helper Functions ==

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "docstore_cache=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Wraps a MemoryStore, logging calls and failing selected keys.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    failing_writes: Vec<String>,
    failing_reads: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn with_failing_writes(keys: &[&str]) -> Self {
        Self {
            failing_writes: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    fn with_failing_reads(keys: &[&str]) -> Self {
        Self {
            failing_reads: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Store for RecordingStore {
    fn fetch(&self, key: &str) -> Result<Value, StoreError> {
        self.record(format!("fetch {key}"));
        if self.failing_reads.iter().any(|k| k == key) {
            return Err(StoreError::Fault("timeout".to_string()));
        }
        self.inner.fetch(key)
    }

    fn store(&self, key: &str, value: Value, ttl_seconds: i64) -> Result<(), StoreError> {
        self.record(format!("store {key} {ttl_seconds}"));
        if self.failing_writes.iter().any(|k| k == key) {
            return Err(StoreError::Fault("temporary failure".to_string()));
        }
        self.inner.store(key, value, ttl_seconds)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.record(format!("remove {key}"));
        self.inner.remove(key)
    }

    fn exists(&self, key: &str) -> bool {
        self.record(format!("exists {key}"));
        self.inner.exists(key)
    }

    fn flush_all(&self) -> bool {
        self.record("flush".to_string());
        self.inner.flush_all()
    }
}

const INVALID_KEYS: [&str; 11] = [
    ":",
    "test{",
    "test}",
    "test(",
    "test)",
    "test:",
    "test/",
    "test\\",
    "test@",
    "",
    "testlargesize-testlargesize-testlargesize-testlargesize-testlarge-testlarge",
];

// == Key Validation ==

#[test]
fn test_invalid_keys_rejected_by_both_facades() {
    init_tracing();
    let cache = SimpleCache::new(RecordingStore::default(), "");
    let pool = CacheItemPool::new(RecordingStore::default(), "");

    for key in INVALID_KEYS {
        assert!(matches!(cache.get(key, Value::Null), Err(CacheError::InvalidKey(_))));
        assert!(matches!(pool.get_item(key), Err(CacheError::InvalidKey(_))));
    }

    assert!(cache.store().calls().is_empty());
    assert!(pool.store().calls().is_empty());
}

#[test]
fn test_zero_key_is_valid() {
    let cache = SimpleCache::new(MemoryStore::new(), "");
    assert_eq!(cache.set("0", json!("zero"), Ttl::Never), Ok(true));
    assert_eq!(cache.get("0", Value::Null), Ok(json!("zero")));

    let pool = CacheItemPool::new(MemoryStore::new(), "");
    assert!(pool.get_item("0").is_ok());
}

#[test]
fn test_namespace_counts_toward_length() {
    let key = "k".repeat(60);
    assert!(SimpleCache::new(MemoryStore::new(), "")
        .get(&key, Value::Null)
        .is_ok());
    assert_eq!(
        SimpleCache::new(MemoryStore::new(), "sessions.").get(&key, Value::Null),
        Err(CacheError::InvalidKey(format!("sessions.{key}")))
    );
}

// == Simple Cache ==

#[test]
fn test_get_returns_default_on_miss_and_propagates_fault() {
    init_tracing();
    let cache = SimpleCache::new(RecordingStore::with_failing_reads(&["broken"]), "");

    assert_eq!(cache.get("k", json!("default")), Ok(json!("default")));
    assert_eq!(
        cache.get("broken", json!("default")),
        Err(CacheError::Store(StoreError::Fault("timeout".to_string())))
    );
}

#[test]
fn test_ttl_forms_reach_store_normalized() {
    let cache = SimpleCache::new(RecordingStore::default(), "");

    cache.set("a", json!(1), CalendarInterval::of_seconds(20)).unwrap();
    cache.set("b", json!(1), 2_592_300_i64).unwrap();
    cache.set("c", json!(1), None::<i64>).unwrap();
    cache
        .set("d", json!(1), "PT1H30M".parse::<CalendarInterval>().unwrap())
        .unwrap();

    assert_eq!(
        cache.store().calls(),
        vec!["store a 20", "store b 2592300", "store c 0", "store d 5400"]
    );
}

#[test]
fn test_absolute_expiry_reaches_store_relative() {
    let cache = SimpleCache::new(RecordingStore::default(), "");

    cache
        .set("soon", json!(1), Utc::now() + Duration::seconds(300))
        .unwrap();
    let calls = cache.store().calls();
    assert!(
        calls == ["store soon 300"] || calls == ["store soon 299"],
        "unexpected calls {calls:?}"
    );

    cache
        .set("past", json!(1), Utc::now() - Duration::seconds(300))
        .unwrap();
    assert_eq!(cache.has("past"), Ok(false));
}

#[test]
fn test_clear_rules() {
    let namespaced = SimpleCache::new(RecordingStore::default(), "ns.");
    assert!(!namespaced.clear());
    assert!(namespaced.store().calls().is_empty());

    let global = SimpleCache::new(RecordingStore::default(), "");
    global.set("a", json!(1), Ttl::Never).unwrap();
    assert!(global.clear());
    assert_eq!(global.get("a", json!("gone")), Ok(json!("gone")));
}

#[test]
fn test_set_multiple_short_circuit_on_failure() {
    init_tracing();
    let cache = SimpleCache::new(RecordingStore::with_failing_writes(&["b"]), "");

    let result = cache.set_multiple([("a", json!(1)), ("b", json!(2)), ("c", json!(3))], 60_i64);

    assert_eq!(result, Ok(false));
    assert_eq!(cache.store().calls(), vec!["store a 60", "store b 60"]);
}

#[test]
fn test_delete_multiple_stops_at_absent_key() {
    let cache = SimpleCache::new(RecordingStore::default(), "");
    cache.set("b", json!(2), Ttl::Never).unwrap();

    assert_eq!(cache.delete_multiple(["a", "b"]), Ok(false));
    assert_eq!(cache.has("b"), Ok(true));
}

#[test]
fn test_bulk_rejects_wrong_shape() {
    let cache = SimpleCache::new(MemoryStore::new(), "");

    assert!(matches!(
        cache.get_multiple_json(&json!({"a": 1}), Value::Null),
        Err(CacheError::InvalidArgument(_))
    ));
    assert!(matches!(
        cache.set_multiple_json(&json!("a"), Ttl::Never),
        Err(CacheError::InvalidArgument(_))
    ));
}

// == Item Pool ==

#[test]
fn test_delete_items_attempts_every_key() {
    let pool = CacheItemPool::new(RecordingStore::default(), "");
    pool.store().inner.store("b", json!(2), 0).unwrap();

    assert_eq!(pool.delete_items(["a", "b"]), Ok(false));
    assert_eq!(pool.store().calls(), vec!["remove a", "remove b"]);
}

#[test]
fn test_commit_with_invalid_deferred_key() {
    init_tracing();
    let mut pool = CacheItemPool::new(RecordingStore::default(), "");

    let mut valid = CacheItem::new("valid");
    valid.set(json!("kept"));
    let mut invalid = CacheItem::new("in{valid}");
    invalid.set(json!("dropped"));

    pool.save_deferred(valid);
    pool.save_deferred(invalid);

    assert!(!pool.commit());
    assert_eq!(pool.store().calls(), vec!["store valid 0"]);
    assert_eq!(pool.get_item("valid").unwrap().get(), Some(&json!("kept")));
}

#[test]
fn test_deferred_round_trip() {
    let mut pool = CacheItemPool::new(MemoryStore::new(), "pool.");

    let mut item = CacheItem::new("user");
    item.set(json!({"name": "My Name"}))
        .expires_after(CalendarInterval::of_minutes(5));
    pool.save_deferred(item);

    assert!(!pool.get_item("user").unwrap().is_hit());
    let (all_saved, mut committed) = pool.commit_items();
    assert!(all_saved);

    let committed = committed.remove("user").unwrap();
    assert!(committed.is_hit());
    assert_eq!(committed.get(), Some(&json!({"name": "My Name"})));
    assert_eq!(committed.ttl(), 300);

    let fetched = pool.get_item("user").unwrap();
    assert!(fetched.is_hit());
    assert_eq!(fetched.get(), Some(&json!({"name": "My Name"})));
}

#[test]
fn test_commit_leaves_later_writes_alone() {
    let store = Arc::new(MemoryStore::new());
    let cache = SimpleCache::new(store.clone(), "");
    let mut pool = CacheItemPool::new(store, "");

    let mut first = CacheItem::new("a");
    first.set(json!("v1"));
    pool.save_deferred(first);
    assert!(pool.commit());

    cache.set("a", json!("v2"), Ttl::Never).unwrap();

    let mut other = CacheItem::new("b");
    other.set(json!("b1"));
    pool.save_deferred(other);
    assert!(pool.commit());

    assert_eq!(cache.get("a", Value::Null), Ok(json!("v2")));
    assert_eq!(cache.get("b", Value::Null), Ok(json!("b1")));
}

#[test]
fn test_pool_read_failure_is_a_miss() {
    let pool = CacheItemPool::new(RecordingStore::with_failing_reads(&["k"]), "");

    let item = pool.get_item("k").unwrap();
    assert!(!item.is_hit());
    assert!(item.get().is_none());
}

#[test]
fn test_facades_from_config_share_store() {
    let config = Config::default().with_namespace("app.");
    let store = Arc::new(MemoryStore::new());
    let cache = SimpleCache::from_config(store.clone(), &config);
    let mut pool = CacheItemPool::from_config(store.clone(), &config);

    cache.set("greeting", json!("hello"), Ttl::Never).unwrap();
    let mut item = pool.get_item("greeting").unwrap();
    assert_eq!(item.get(), Some(&json!("hello")));

    item.set(json!("bye"));
    assert_eq!(pool.save(&mut item), Ok(true));
    assert_eq!(cache.get("greeting", Value::Null), Ok(json!("bye")));
    assert!(store.exists("app.greeting"));

    assert!(!pool.clear());
    assert_eq!(store.len(), 1);
}
