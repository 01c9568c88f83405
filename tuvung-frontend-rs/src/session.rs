//! Flashcard session state: the shuffled working list a learner cycles
//! through, the cursor into it, and the reveal/end flags the card view
//! renders from.

use rand::Rng;
use rand::thread_rng;
use rustc_hash::FxHashSet;
use vocab_utils::VocabularyItem;

/// Which slice of the scope the working list is built from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Remembered,
    NotRemembered,
}

#[derive(Clone, Debug)]
pub struct FlashcardSession {
    working_list: Vec<VocabularyItem>,
    cursor: usize,
    revealed: bool,
    end_of_list: bool,
    filter_mode: FilterMode,
}

impl FlashcardSession {
    /// Open a session over a lesson's (or flattened chapter's) vocabulary.
    /// The scope itself is left untouched; the session owns a shuffled copy.
    pub fn start(scope_items: &[VocabularyItem]) -> Self {
        Self::start_with_rng(scope_items, &mut thread_rng())
    }

    pub fn start_with_rng<R: Rng>(scope_items: &[VocabularyItem], rng: &mut R) -> Self {
        Self {
            working_list: card_sampler::shuffled_with(scope_items, rng),
            cursor: 0,
            revealed: false,
            end_of_list: false,
            filter_mode: FilterMode::All,
        }
    }

    /// Rebuild the working list from the full scope: everything, only the
    /// remembered items, or only the rest. Reshuffles and rewinds to the
    /// first card.
    pub fn apply_filter(
        &mut self,
        mode: FilterMode,
        full_scope: &[VocabularyItem],
        remembered: &FxHashSet<u32>,
    ) {
        self.apply_filter_with_rng(mode, full_scope, remembered, &mut thread_rng());
    }

    pub fn apply_filter_with_rng<R: Rng>(
        &mut self,
        mode: FilterMode,
        full_scope: &[VocabularyItem],
        remembered: &FxHashSet<u32>,
        rng: &mut R,
    ) {
        let selected: Vec<VocabularyItem> = match mode {
            FilterMode::All => full_scope.to_vec(),
            FilterMode::Remembered => full_scope
                .iter()
                .filter(|item| remembered.contains(&item.vocabulary_id))
                .cloned()
                .collect(),
            FilterMode::NotRemembered => full_scope
                .iter()
                .filter(|item| !remembered.contains(&item.vocabulary_id))
                .cloned()
                .collect(),
        };
        self.working_list = card_sampler::shuffled_with(&selected, rng);
        self.filter_mode = mode;
        self.cursor = 0;
        self.revealed = false;
        self.end_of_list = false;
    }

    /// Flip the current card between its prompt and its answer side.
    pub fn reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Move to the next card. Past the last card the session latches into
    /// its ended state instead of wrapping; the cursor stays put so the last
    /// card remains inspectable.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.working_list.len() {
            self.cursor += 1;
            self.revealed = false;
        } else {
            self.end_of_list = true;
        }
    }

    /// Move to the previous card. Stepping back always leaves the ended
    /// state, even from the first card.
    pub fn retreat(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.revealed = false;
        }
        self.end_of_list = false;
    }

    /// Card under the cursor, `None` only for an empty working list.
    pub fn current(&self) -> Option<&VocabularyItem> {
        self.working_list.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_ended(&self) -> bool {
        self.end_of_list
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn working_list(&self) -> &[VocabularyItem] {
        &self.working_list
    }

    pub fn len(&self) -> usize {
        self.working_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_list.is_empty()
    }
}
