//! Level-tree loading: one fetch per level per handle, cached until
//! invalidated, with point lookups for the flashcard and quiz scopes.

use std::sync::Arc;

use tansu::{DocumentStore, StoreError};
use vocab_utils::{Chapter, Lesson, Level};

use crate::Tuvung;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content store failed")]
    Store(#[from] StoreError),
    #[error("stored vocabulary tree does not decode")]
    Decode(#[source] serde_json::Error),
}

impl ContentError {
    /// What the vocabulary pages show when a level tree fails to load.
    pub fn user_message(&self) -> &'static str {
        "Không thể tải dữ liệu từ vựng. Vui lòng thử lại."
    }

    /// What the flashcard page shows when its lesson fails to load.
    pub fn lesson_user_message(&self) -> &'static str {
        "Không thể tải dữ liệu bài học"
    }
}

fn level_path(level: Level) -> String {
    format!("vocabulary_data/{level}")
}

impl<S: DocumentStore> Tuvung<S> {
    /// The level's chapter tree, fetched at most once per handle lifetime.
    ///
    /// A level with no stored document is an empty tree, not an error; the
    /// empty result is cached like any other. Store failures propagate so
    /// callers never mistake an unreachable store for "no content".
    pub async fn level_tree(&self, level: Level) -> Result<Arc<Vec<Chapter>>, ContentError> {
        if let Some(tree) = self.level_trees.borrow().get(&level) {
            return Ok(Arc::clone(tree));
        }
        let tree = Arc::new(self.fetch_level_tree(level).await?);
        self.level_trees
            .borrow_mut()
            .insert(level, Arc::clone(&tree));
        Ok(tree)
    }

    /// Drop the cached tree so the next [`Tuvung::level_tree`] refetches.
    pub fn invalidate_level(&self, level: Level) {
        self.level_trees.borrow_mut().remove(&level);
    }

    /// Chapter with the given 1-based number, through the cache.
    pub async fn chapter(
        &self,
        level: Level,
        chapter_number: u32,
    ) -> Result<Option<Chapter>, ContentError> {
        let tree = self.level_tree(level).await?;
        Ok(vocab_utils::find_chapter(&tree, chapter_number).cloned())
    }

    /// Lesson at the given 1-based chapter and lesson numbers, through the
    /// cache. `Ok(None)` when either number is absent.
    pub async fn lesson(
        &self,
        level: Level,
        chapter_number: u32,
        lesson_number: u32,
    ) -> Result<Option<Lesson>, ContentError> {
        let tree = self.level_tree(level).await?;
        Ok(vocab_utils::find_lesson(&tree, chapter_number, lesson_number).cloned())
    }

    async fn fetch_level_tree(&self, level: Level) -> Result<Vec<Chapter>, ContentError> {
        let path = level_path(level);
        let first = self.store.get(&path).await;
        let value = match first {
            Err(StoreError::Timeout) => {
                // one automatic retry, then the timeout is the caller's problem
                log::warn!("Vocabulary fetch for {level} timed out, retrying");
                self.store.get(&path).await
            }
            other => other,
        }
        .inspect_err(|e| log::error!("Error loading vocabulary tree for {level}: {e:?}"))?;
        match value {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .inspect_err(|e| log::error!("Error decoding vocabulary tree for {level}: {e:?}"))
                .map_err(ContentError::Decode),
        }
    }
}
