pub mod progress;

use parse_display::{Display, FromStr};

/// JLPT proficiency tier. `N5` is the entry level, `N1` the hardest.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    FromStr,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
pub enum Level {
    N1,
    N2,
    N3,
    N4,
    N5,
}

/// Every level the app serves, easiest first — the order the level picker
/// shows them.
pub const LEVELS: [Level; 5] = [Level::N5, Level::N4, Level::N3, Level::N2, Level::N1];

/// Static description of a level, used by the level picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LevelInfo {
    pub description: &'static str, // Vietnamese, shown verbatim in the UI
    pub kanji_count: u32,
    pub vocabulary_count: u32,
}

impl Level {
    pub fn info(self) -> LevelInfo {
        match self {
            Level::N5 => LevelInfo {
                description: "Cơ bản nhất",
                kanji_count: 100,
                vocabulary_count: 800,
            },
            Level::N4 => LevelInfo {
                description: "Sơ cấp",
                kanji_count: 300,
                vocabulary_count: 1500,
            },
            Level::N3 => LevelInfo {
                description: "Trung cấp",
                kanji_count: 650,
                vocabulary_count: 3750,
            },
            Level::N2 => LevelInfo {
                description: "Trung thượng cấp",
                kanji_count: 1000,
                vocabulary_count: 6000,
            },
            Level::N1 => LevelInfo {
                description: "Cao cấp",
                kanji_count: 2000,
                vocabulary_count: 10000,
            },
        }
    }
}

/// One vocabulary entry as stored in the content database.
///
/// `vocabulary_id` is only unique within the lesson (or flattened chapter)
/// it is studied in; ids repeat across levels.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct VocabularyItem {
    pub lesson: String,
    pub vocabulary_id: u32,
    pub kanji: String,
    pub furigana: String,
    pub meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub example_meaning: String,
    #[serde(default)]
    pub sound_url: String,
    /// Sino-Vietnamese reading of the kanji, empty when not applicable.
    #[serde(default)]
    pub han: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Lesson {
    pub lesson_id: u32,
    pub lesson_number: u32,
    pub lesson_name: String,
    // the store drops empty lists entirely, so default them back in
    #[serde(rename = "vocabularyList", default)]
    pub vocabulary_list: Vec<VocabularyItem>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Chapter {
    pub chapter_number: u32,
    pub chapter_name: String,
    pub level_id: String,
    #[serde(rename = "lessonList", default)]
    pub lesson_list: Vec<Lesson>,
}

impl Chapter {
    /// Lesson with the given 1-based `lesson_number`, if the chapter has one.
    pub fn lesson_by_number(&self, lesson_number: u32) -> Option<&Lesson> {
        self.lesson_list
            .iter()
            .find(|lesson| lesson.lesson_number == lesson_number)
    }

    /// All of the chapter's vocabulary in lesson order, for chapter-wide study.
    pub fn all_vocabulary(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.lesson_list
            .iter()
            .flat_map(|lesson| lesson.vocabulary_list.iter())
    }
}

/// Chapter with the given 1-based `chapter_number` inside a level tree.
pub fn find_chapter(chapters: &[Chapter], chapter_number: u32) -> Option<&Chapter> {
    chapters
        .iter()
        .find(|chapter| chapter.chapter_number == chapter_number)
}

pub fn find_lesson(
    chapters: &[Chapter],
    chapter_number: u32,
    lesson_number: u32,
) -> Option<&Lesson> {
    find_chapter(chapters, chapter_number)?.lesson_by_number(lesson_number)
}
