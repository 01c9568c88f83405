//! Uniform shuffling and drawing for study decks.
//!
//! Flashcard and quiz sessions work on a shuffled copy of their material and
//! never reorder the canonical list, because other features look items up by
//! their original position. Everything here therefore borrows its input and
//! returns a fresh `Vec`.
//!
//! # Example
//!
//! ```
//! use card_sampler::shuffled;
//!
//! let deck = vec!["学生", "先生", "本"];
//! let working = shuffled(&deck);
//!
//! assert_eq!(working.len(), deck.len());
//! assert_eq!(deck, vec!["学生", "先生", "本"]); // untouched
//! ```

use rand::prelude::*;

/// Uniformly shuffled copy of `items`, leaving `items` as they were.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    shuffled_with(items, &mut thread_rng())
}

/// Like [`shuffled`], with the rng supplied by the caller.
///
/// Pass a seeded rng to make the permutation reproducible.
pub fn shuffled_with<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

/// Draw up to `count` items from `pool` uniformly and without replacement.
///
/// Each element of `pool` is drawn at most once, so the result has no
/// positional duplicates even when the pool holds equal values. A pool
/// shorter than `count` is exhausted instead of an error: the result is then
/// a permutation of the whole pool.
pub fn draw_distinct<T: Clone, R: Rng>(pool: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut remaining: Vec<&T> = pool.iter().collect();
    let mut drawn = Vec::with_capacity(count.min(pool.len()));
    while drawn.len() < count && !remaining.is_empty() {
        let picked = rng.gen_range(0..remaining.len());
        drawn.push(remaining.swap_remove(picked).clone());
    }
    drawn
}
