//! Fixtures shared by the module tests.

use std::cell::Cell;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value};
use tansu::memory::MemoryStore;
use tansu::{DocumentStore, StoreError};
use vocab_utils::VocabularyItem;

pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A lesson-sized scope with ids `1..=count` and distinct meanings.
pub fn items(count: u32) -> Vec<VocabularyItem> {
    (1..=count)
        .map(|id| VocabularyItem {
            lesson: "Bài 1".to_string(),
            vocabulary_id: id,
            kanji: format!("漢{id}"),
            furigana: format!("かん{id}"),
            meaning: format!("nghĩa {id}"),
            example: String::new(),
            example_meaning: String::new(),
            sound_url: String::new(),
            han: String::new(),
        })
        .collect()
}

/// A store that is never reachable, for exercising failure propagation.
pub struct FailingStore;

impl DocumentStore for FailingStore {
    async fn get(&self, _path: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn set(&self, _path: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn update(&self, _path: &str, _fields: Map<String, Value>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn remove(&self, _path: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

/// Wraps a [`MemoryStore`] and times out the first `timeouts` reads, for
/// exercising the retry-once policy.
pub struct TimeoutThenServe {
    pub inner: MemoryStore,
    timeouts: Cell<u32>,
    pub get_count: Cell<u32>,
}

impl TimeoutThenServe {
    pub fn new(inner: MemoryStore, timeouts: u32) -> Self {
        Self {
            inner,
            timeouts: Cell::new(timeouts),
            get_count: Cell::new(0),
        }
    }
}

impl DocumentStore for TimeoutThenServe {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.get_count.set(self.get_count.get() + 1);
        let left = self.timeouts.get();
        if left > 0 {
            self.timeouts.set(left - 1);
            return Err(StoreError::Timeout);
        }
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(path, value).await
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.inner.update(path, fields).await
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.inner.remove(path).await
    }
}
