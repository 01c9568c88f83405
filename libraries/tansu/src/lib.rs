//! A path-addressed JSON document store, in the style of a hosted realtime
//! database.
//!
//! The whole store is one JSON tree. A slash-separated path names a subtree:
//! `vocabulary_status/u1/12/7` is the value `7` maps to inside the object at
//! `vocabulary_status/u1/12`. The operations are deliberately few:
//!
//! 1. `get` returns the subtree at a path, or `None` where nothing is stored.
//! 2. `set` replaces the subtree at a path, creating missing parents.
//! 3. `update` shallow-merges fields into the object at a path.
//! 4. `remove` deletes the subtree at a path.
//!
//! `null` never survives in the tree; writing it is the same as deleting, and
//! reading an absent path yields `None` rather than an error. Backends:
//! [`memory::MemoryStore`] (always available, used heavily in tests) and
//! [`rest::RestStore`] behind the `rest` feature.

#[cfg(feature = "rest")]
pub mod rest;

pub mod memory;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store request timed out")]
    Timeout,
}

/// The store contract the access layers are written against.
///
/// Implementations are used from single-threaded cooperative embedders, so
/// the returned futures are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Subtree at `path`, or `None` when nothing is stored there.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the subtree at `path`. Writing `Value::Null` deletes it.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Shallow-merge `fields` into the object at `path`. A `Value::Null`
    /// field deletes that key; other subtrees at the path are untouched.
    async fn update(
        &self,
        path: &str,
        fields: serde_json::Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Delete the subtree at `path`. Deleting an absent path succeeds.
    async fn remove(&self, path: &str) -> Result<(), StoreError>;
}

/// A shared reference to a store is a store. The methods only need `&self`,
/// so callers can keep their own handle while handing one to an access layer.
impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(path, value).await
    }

    async fn update(
        &self,
        path: &str,
        fields: serde_json::Map<String, Value>,
    ) -> Result<(), StoreError> {
        (**self).update(path, fields).await
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        (**self).remove(path).await
    }
}
