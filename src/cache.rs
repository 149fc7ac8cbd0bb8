use crate::tavily::{SearchDepth, SearchResult, Topic};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: SearchResult,
    stored_at: DateTime<Utc>,
    ttl_seconds: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let secs = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        let ttl = Duration::seconds(secs);
        now - self.stored_at > ttl
    }
}

/// Session-scoped result cache with lazy per-entry expiry.
///
/// Unbounded: entries leave only when read after their TTL has passed.
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<SearchResult> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                debug!("Cache entry expired, evicting");
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Stores `value`, replacing any previous entry for `key`.
    pub fn put(&self, key: String, value: SearchResult, ttl_seconds: u64) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
            ttl_seconds,
        };
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[derive(Serialize)]
struct KeyFields<'a> {
    query: &'a str,
    search_depth: SearchDepth,
    topic: Topic,
    include_answer: bool,
    include_images: bool,
    include_raw_content: bool,
}

/// Fingerprint of the fields that change what the provider returns.
///
/// `max_results`, domain filters and output format are not part of the key.
pub fn cache_key(
    query: &str,
    search_depth: SearchDepth,
    topic: Topic,
    include_answer: bool,
    include_images: bool,
    include_raw_content: bool,
) -> String {
    let fields = KeyFields {
        query,
        search_depth,
        topic,
        include_answer,
        include_images,
        include_raw_content,
    };
    // Plain struct of strings, enums and bools; serialization cannot fail.
    serde_json::to_string(&fields).unwrap_or_default()
}
