//! Lesson-content provision: an async provider contract, the generative-AI
//! HTTP implementation, the deterministic fallback lesson, and the
//! never-fails boundary the session fetches through.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use lingo_core::{Language, QuizItem};

use crate::error::ContentError;

mod fallback;
mod gen_ai;

pub use fallback::fallback_lesson;
pub use gen_ai::{GenAiConfig, GenAiProvider};

/// Contract for anything that can produce a lesson's quiz-item sequence.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch an ordered quiz-item sequence for the given topic and language
    /// pair. A live provider returns a variable number of items; five is the
    /// requested shape.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the provider is unavailable or its output
    /// cannot be turned into valid quiz items. Callers above the
    /// [`LessonContentService`] boundary never see these.
    async fn fetch_lesson(
        &self,
        topic: &str,
        target: Language,
        native: Language,
    ) -> Result<Vec<QuizItem>, ContentError>;
}

/// The recover-locally boundary in front of any [`ContentProvider`]:
/// provider failures and empty sequences are substituted with the
/// deterministic fallback lesson, so lesson start never fails on content.
#[derive(Clone)]
pub struct LessonContentService {
    provider: Arc<dyn ContentProvider>,
}

impl LessonContentService {
    #[must_use]
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self { provider }
    }

    /// Convenience constructor over the env-configured generative provider.
    #[must_use]
    pub fn gen_ai_from_env() -> Self {
        Self::new(Arc::new(GenAiProvider::from_env()))
    }

    /// Fetch lesson items, substituting the fallback on any provider error
    /// or empty result. Infallible by contract.
    pub async fn fetch_or_fallback(
        &self,
        topic: &str,
        target: Language,
        native: Language,
    ) -> Vec<QuizItem> {
        match self.provider.fetch_lesson(topic, target, native).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => {
                warn!(topic, "provider returned an empty lesson, using fallback");
                fallback_lesson(target)
            }
            Err(err) => {
                warn!(topic, error = %err, "lesson generation failed, using fallback");
                fallback_lesson(target)
            }
        }
    }
}
