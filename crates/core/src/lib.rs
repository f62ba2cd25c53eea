#![forbid(unsafe_code)]

//! Domain model for the LingoLeap learning core: lesson ids, languages,
//! user progress, quiz items, the course map, and answer grading.
//!
//! This crate is pure: no I/O, no async, no clocks. Persistence and
//! content fetching live in the `storage` and `services` crates.

pub mod grading;
pub mod model;

pub use model::{
    HEARTS_MAX, LEVEL_NODES, Language, LessonId, LevelNode, ParseLanguageError,
    ParseLessonIdError, ProgressPatch, QuizItem, QuizItemError, QuizKind, UserProgress, topic_for,
};
