#![deny(clippy::string_slice)]

pub mod admin;
pub mod audio;
pub mod content;
pub mod progress;
pub mod quiz;
pub mod session;

#[cfg(test)]
mod test_support;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::LazyLock;

use tansu::DocumentStore;
use tansu::StoreError;
use tansu::rest::RestStore;
use vocab_utils::{Chapter, Level};

pub use vocab_utils::progress::{ProgressScope, Statistics};
pub use vocab_utils::{LEVELS, Lesson, VocabularyItem};

/// Levels the level picker offers, easiest first.
pub fn get_available_levels() -> Vec<Level> {
    LEVELS.to_vec()
}

/// The app-facing handle: one store connection, the signed-in user (if any),
/// and the per-level content cache.
///
/// We never hold a `RefCell` borrow across an `.await`, which guarantees the
/// absence of "already borrowed" panics under cooperative scheduling.
pub struct Tuvung<S> {
    store: S,
    user_id: Option<String>,
    level_trees: RefCell<BTreeMap<Level, Arc<Vec<Chapter>>>>,
}

static LOGGER: LazyLock<()> = LazyLock::new(|| {
    // try_init so an embedder that already installed a logger wins
    let _ = env_logger::Builder::from_default_env().try_init();
    log::info!("Logging initialized");
});

impl<S: DocumentStore> Tuvung<S> {
    pub fn new(store: S, user_id: Option<String>) -> Self {
        LazyLock::force(&LOGGER);
        Self {
            store,
            user_id,
            level_trees: RefCell::new(BTreeMap::new()),
        }
    }
}

impl Tuvung<RestStore> {
    /// Handle backed by the hosted database at `base_url`.
    pub fn connect(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        user_id: Option<String>,
    ) -> Result<Self, StoreError> {
        Ok(Self::new(RestStore::new(base_url, auth_token)?, user_id))
    }
}

impl<S> Tuvung<S> {
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Swap the signed-in user, e.g. after login/logout. Progress operations
    /// key by user, so nothing cached here needs flushing.
    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }
}
