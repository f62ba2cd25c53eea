mod course;
mod ids;
mod language;
mod progress;
mod quiz;

pub use course::{LEVEL_NODES, LevelNode, topic_for};
pub use ids::{LessonId, ParseLessonIdError};
pub use language::{Language, ParseLanguageError};
pub use progress::{HEARTS_MAX, ProgressPatch, UserProgress};
pub use quiz::{QuizItem, QuizItemError, QuizKind};
