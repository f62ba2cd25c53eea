#![forbid(unsafe_code)]

//! Application services for the LingoLeap core: the durable progress store,
//! lesson-content provision with its deterministic fallback, the per-attempt
//! lesson session state machine, and the small collaborator seams (speech
//! playback, pronunciation scoring).

pub mod content;
pub mod error;
pub mod lesson_session;
pub mod progress_store;
pub mod pronunciation;
pub mod speech;

pub use error::{ContentError, ProgressStoreError};

pub use content::{ContentProvider, GenAiConfig, GenAiProvider, LessonContentService, fallback_lesson};
pub use lesson_session::{Advance, ItemOutcome, LessonSession, SessionState};
pub use progress_store::{
    COMPLETED_KEY, CompletionOutcome, ProgressSnapshot, ProgressStore, USER_KEY,
};
pub use pronunciation::{PronunciationCheck, check_pronunciation};
pub use speech::{NullSpeech, SpeechPlayback};
