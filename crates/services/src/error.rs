//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::QuizItemError;
use storage::repository::StorageError;

/// Errors emitted by content providers.
///
/// These never cross the session boundary: `LessonContentService` catches
/// every variant and substitutes the deterministic fallback lesson.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content generation is not configured")]
    Disabled,
    #[error("content provider returned an empty response")]
    EmptyResponse,
    #[error("content request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed lesson payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidItem(#[from] QuizItemError),
}

/// Errors emitted by `ProgressStore` mutations.
///
/// Reads never fail on corrupt content (it degrades to defaults); these are
/// the write-side failures, on which the in-memory state is left unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("progress serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
