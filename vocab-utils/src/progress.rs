//! Progress scope keys and the counters derived from remembered markers.
//!
//! A marker's presence under a scope is the whole story: there is no stored
//! "not remembered" state, only the absence of a key.

use crate::Level;

/// Addressing scheme for a user's remembered markers.
///
/// The two shapes are independent granularities, not views of each other.
/// Lesson-scoped study keys by the globally unique lesson id; chapter-scoped
/// study keys by level code plus chapter number. A feature picks one shape
/// and sticks with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgressScope {
    Lesson { lesson_id: u32 },
    Chapter { level: Level, chapter_number: u32 },
}

impl std::fmt::Display for ProgressScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressScope::Lesson { lesson_id } => write!(f, "{lesson_id}"),
            ProgressScope::Chapter {
                level,
                chapter_number,
            } => write!(f, "{level}/c_{chapter_number}"),
        }
    }
}

/// Remembered / not-remembered counts for one scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Statistics {
    pub remembered: usize,
    pub not_remembered: usize,
    /// Rounded percentage of the scope that is remembered, `0` for an empty scope.
    pub percent: u32,
}

pub fn statistics(scope_size: usize, remembered_count: usize) -> Statistics {
    let percent = if scope_size == 0 {
        0
    } else {
        (remembered_count as f64 / scope_size as f64 * 100.0).round() as u32
    };
    Statistics {
        remembered: remembered_count,
        // markers can outlive their vocabulary after a content edit, so don't underflow
        not_remembered: scope_size.saturating_sub(remembered_count),
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_paths() {
        let lesson = ProgressScope::Lesson { lesson_id: 42 };
        assert_eq!(lesson.to_string(), "42");

        let chapter = ProgressScope::Chapter {
            level: Level::N5,
            chapter_number: 3,
        };
        assert_eq!(chapter.to_string(), "N5/c_3");
    }

    #[test]
    fn test_statistics_rounding() {
        let stats = statistics(5, 2);
        assert_eq!(stats.remembered, 2);
        assert_eq!(stats.not_remembered, 3);
        assert_eq!(stats.percent, 40);

        // 1/3 rounds down, 2/3 rounds up
        assert_eq!(statistics(3, 1).percent, 33);
        assert_eq!(statistics(3, 2).percent, 67);
    }

    #[test]
    fn test_statistics_empty_scope() {
        let stats = statistics(0, 0);
        assert_eq!(stats.percent, 0);
        assert_eq!(stats.remembered, 0);
        assert_eq!(stats.not_remembered, 0);
    }

    #[test]
    fn test_statistics_with_stale_markers() {
        // more markers than items left in the scope
        let stats = statistics(2, 4);
        assert_eq!(stats.not_remembered, 0);
        assert_eq!(stats.percent, 200);
    }
}
