//! Remembered markers: per-user keys whose presence is the whole record,
//! and the counts the statistics views derive from them.
//!
//! Every operation needs a signed-in user. Without one the layer answers
//! [`ProgressError::SignInRequired`], which the views treat as a
//! redirect-to-login signal; nothing is silently dropped.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use rustc_hash::FxHashSet;
use serde_json::{Value, json};
use tansu::{DocumentStore, StoreError};
use vocab_utils::Level;
use vocab_utils::progress::{ProgressScope, Statistics, statistics};

use crate::Tuvung;
use crate::content::ContentError;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// No user is signed in; the caller should route to the login page.
    #[error("progress tracking requires a signed-in user")]
    SignInRequired,
    #[error("progress store failed")]
    Store(#[from] StoreError),
    #[error("loading content for the progress overview failed")]
    Content(#[from] ContentError),
}

/// A lesson's row in the chapter overview.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LessonProgress {
    pub lesson_id: u32,
    pub lesson_number: u32,
    pub lesson_name: String,
    pub scope_size: usize,
    pub remembered_count: usize,
}

/// Marker counts across everything a user has ever studied.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RememberedTotals {
    /// Scope path (`"1021"` or `"N5/c_3"`) to marker count.
    pub per_scope: BTreeMap<String, usize>,
    pub total: usize,
}

fn scope_path(user_id: &str, scope: ProgressScope) -> String {
    format!("vocabulary_status/{user_id}/{scope}")
}

/// Ids present in a stored marker subtree. Object keys are ids; the hosted
/// store renders dense numeric key sets as arrays, where the id is the slot
/// index of each non-null entry. Payloads are ignored either way.
fn marker_ids(subtree: &Value) -> FxHashSet<u32> {
    match subtree {
        Value::Object(map) => map
            .keys()
            .filter_map(|key| {
                key.parse::<u32>()
                    .inspect_err(|_| log::warn!("Skipping non-numeric marker key {key:?}"))
                    .ok()
            })
            .collect(),
        Value::Array(slots) => slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_null())
            .map(|(index, _)| index as u32)
            .collect(),
        _ => FxHashSet::default(),
    }
}

fn marker_count(subtree: &Value) -> usize {
    match subtree {
        Value::Object(map) => map.len(),
        Value::Array(slots) => slots.iter().filter(|slot| !slot.is_null()).count(),
        _ => 0,
    }
}

impl<S: DocumentStore> Tuvung<S> {
    fn require_user(&self) -> Result<&str, ProgressError> {
        self.user_id.as_deref().ok_or(ProgressError::SignInRequired)
    }

    /// Mark a vocabulary item remembered. Re-marking is a no-op.
    pub async fn set_remembered(
        &self,
        scope: ProgressScope,
        vocabulary_id: u32,
    ) -> Result<(), ProgressError> {
        let user_id = self.require_user()?;
        let path = format!("{}/{vocabulary_id}", scope_path(user_id, scope));
        self.store
            .set(&path, json!(""))
            .await
            .inspect_err(|e| log::error!("Error marking {path} remembered: {e:?}"))?;
        Ok(())
    }

    /// Clear a remembered marker. Clearing an absent marker succeeds.
    pub async fn clear_remembered(
        &self,
        scope: ProgressScope,
        vocabulary_id: u32,
    ) -> Result<(), ProgressError> {
        let user_id = self.require_user()?;
        let path = format!("{}/{vocabulary_id}", scope_path(user_id, scope));
        self.store
            .remove(&path)
            .await
            .inspect_err(|e| log::error!("Error clearing marker {path}: {e:?}"))?;
        Ok(())
    }

    /// Every remembered id under the scope. No markers is an empty set; an
    /// unreachable store is an error, never an empty set, so counts derived
    /// from the result cannot silently read as "nothing remembered".
    pub async fn remembered_ids(
        &self,
        scope: ProgressScope,
    ) -> Result<FxHashSet<u32>, ProgressError> {
        let user_id = self.require_user()?;
        let path = scope_path(user_id, scope);
        let subtree = self
            .store
            .get(&path)
            .await
            .inspect_err(|e| log::error!("Error reading markers at {path}: {e:?}"))?;
        Ok(subtree.as_ref().map(marker_ids).unwrap_or_default())
    }

    /// Remembered / not-remembered split for a scope of `scope_size` items.
    pub async fn scope_statistics(
        &self,
        scope: ProgressScope,
        scope_size: usize,
    ) -> Result<Statistics, ProgressError> {
        let remembered = self.remembered_ids(scope).await?;
        Ok(statistics(scope_size, remembered.len()))
    }

    /// One overview row per lesson of the chapter, marker reads issued
    /// concurrently. An absent chapter is an empty overview.
    pub async fn lesson_remembered_counts(
        &self,
        level: Level,
        chapter_number: u32,
    ) -> Result<Vec<LessonProgress>, ProgressError> {
        self.require_user()?;
        let tree = self.level_tree(level).await?;
        let Some(chapter) = vocab_utils::find_chapter(&tree, chapter_number) else {
            return Ok(Vec::new());
        };
        try_join_all(chapter.lesson_list.iter().map(|lesson| async move {
            let remembered = self
                .remembered_ids(ProgressScope::Lesson {
                    lesson_id: lesson.lesson_id,
                })
                .await?;
            Ok::<_, ProgressError>(LessonProgress {
                lesson_id: lesson.lesson_id,
                lesson_number: lesson.lesson_number,
                lesson_name: lesson.lesson_name.clone(),
                scope_size: lesson.vocabulary_list.len(),
                remembered_count: remembered.len(),
            })
        }))
        .await
    }

    /// Marker counts over the user's whole progress subtree, one entry per
    /// scope the user ever studied under, in either key shape.
    pub async fn remembered_totals(&self) -> Result<RememberedTotals, ProgressError> {
        let user_id = self.require_user()?;
        let path = format!("vocabulary_status/{user_id}");
        let subtree = self
            .store
            .get(&path)
            .await
            .inspect_err(|e| log::error!("Error reading progress for {user_id}: {e:?}"))?;

        let mut totals = RememberedTotals::default();
        let Some(Value::Object(scopes)) = subtree else {
            return Ok(totals);
        };
        for (key, node) in &scopes {
            // a level code at the top means chapter-shaped keys one deeper;
            // anything else is a lesson-id scope
            if key.parse::<Level>().is_ok() {
                if let Value::Object(chapters) = node {
                    for (chapter_key, markers) in chapters {
                        let count = marker_count(markers);
                        totals.total += count;
                        totals.per_scope.insert(format!("{key}/{chapter_key}"), count);
                    }
                }
            } else {
                let count = marker_count(node);
                totals.total += count;
                totals.per_scope.insert(key.clone(), count);
            }
        }
        Ok(totals)
    }
}
