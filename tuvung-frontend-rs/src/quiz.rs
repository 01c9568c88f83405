//! Multiple-choice drills: one question per vocabulary item, the right
//! meaning hidden among meanings borrowed from the rest of the lesson.

use std::collections::BTreeMap;

use rand::Rng;
use rand::thread_rng;
use vocab_utils::VocabularyItem;

/// Options per question when the lesson is big enough to supply them.
pub const MAX_OPTIONS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug)]
pub struct QuizQuestion {
    pub item: VocabularyItem,
    pub options: Vec<AnswerOption>,
}

impl QuizQuestion {
    pub fn correct_index(&self) -> usize {
        self.options
            .iter()
            .position(|option| option.is_correct)
            .expect("every question is built with its correct option")
    }
}

/// Options for one item: its own meaning plus up to three distractor
/// meanings drawn without replacement from the other items of `scope`, in
/// shuffled order. Lessons shorter than four items just yield fewer options.
pub fn build_options(item: &VocabularyItem, scope: &[VocabularyItem]) -> Vec<AnswerOption> {
    build_options_with_rng(item, scope, &mut thread_rng())
}

pub fn build_options_with_rng<R: Rng>(
    item: &VocabularyItem,
    scope: &[VocabularyItem],
    rng: &mut R,
) -> Vec<AnswerOption> {
    // distractors are drawn per item, so a meaning shared by two siblings
    // can legitimately appear twice
    let pool: Vec<&str> = scope
        .iter()
        .filter(|sibling| sibling.vocabulary_id != item.vocabulary_id)
        .map(|sibling| sibling.meaning.as_str())
        .collect();

    let mut options = vec![AnswerOption {
        text: item.meaning.clone(),
        is_correct: true,
    }];
    options.extend(
        card_sampler::draw_distinct(&pool, MAX_OPTIONS - 1, rng)
            .into_iter()
            .map(|meaning| AnswerOption {
                text: meaning.to_string(),
                is_correct: false,
            }),
    );
    card_sampler::shuffled_with(&options, rng)
}

/// One question per scope item, in shuffled question order.
pub fn build_quiz(scope: &[VocabularyItem]) -> Vec<QuizQuestion> {
    build_quiz_with_rng(scope, &mut thread_rng())
}

pub fn build_quiz_with_rng<R: Rng>(scope: &[VocabularyItem], rng: &mut R) -> Vec<QuizQuestion> {
    card_sampler::shuffled_with(scope, rng)
        .into_iter()
        .map(|item| {
            let options = build_options_with_rng(&item, scope, rng);
            QuizQuestion { item, options }
        })
        .collect()
}

/// A learner's picks over one run of a quiz, keyed by question index.
#[derive(Clone, Debug, Default)]
pub struct QuizAttempt {
    answers: BTreeMap<usize, usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizScore {
    pub correct_count: usize,
    /// Indices of missed questions, in question order. Unanswered counts as
    /// missed.
    pub wrong_indices: Vec<usize>,
}

impl QuizAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick; picking again overwrites the earlier choice.
    pub fn answer(&mut self, question_index: usize, option_index: usize) {
        self.answers.insert(question_index, option_index);
    }

    pub fn chosen(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn score(&self, questions: &[QuizQuestion]) -> QuizScore {
        let mut correct_count = 0;
        let mut wrong_indices = Vec::new();
        for (question_index, question) in questions.iter().enumerate() {
            match self.chosen(question_index) {
                Some(choice) if choice == question.correct_index() => correct_count += 1,
                _ => wrong_indices.push(question_index),
            }
        }
        QuizScore {
            correct_count,
            wrong_indices,
        }
    }
}
