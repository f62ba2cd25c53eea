use std::fmt;

use tracing::debug;

use lingo_core::{Language, LessonId, QuizItem, grading, topic_for};

use crate::content::LessonContentService;
use crate::error::ProgressStoreError;
use crate::progress_store::ProgressStore;

//
// ─── STATES ───────────────────────────────────────────────────────────────────
//

/// Lifecycle of one lesson attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Content fetch pending; no mutable surface is exposed.
    Loading,
    /// Stepping through items.
    Active,
    /// Final item advanced past; completion reported to the progress store.
    Completed,
    /// Explicitly exited; no progress side effects.
    Aborted,
}

/// Grading state of the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Pending,
    Correct,
    Incorrect,
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next item; per-item state was reset.
    Next,
    /// That was the last item; the reward was reported to the progress store.
    Completed { reward: u32 },
}

//
// ─── LESSON SESSION ───────────────────────────────────────────────────────────
//

/// Short-lived state machine for a single lesson attempt.
///
/// Owns an immutable copy of the fetched item sequence and a cursor into it;
/// reports to the [`ProgressStore`] only at defined transition points (heart
/// loss on an incorrect grade, completion reward on the final advance).
/// Invalid transitions are no-ops, never errors: the surrounding UI is
/// expected to disable the triggering action.
pub struct LessonSession {
    lesson_id: LessonId,
    target_language: Language,
    native_language: Language,
    items: Vec<QuizItem>,
    cursor: usize,
    response: Option<String>,
    outcome: ItemOutcome,
    state: SessionState,
    hearts_lost: u32,
}

impl LessonSession {
    /// Create an attempt in `Loading`; call [`LessonSession::start`] to fetch
    /// content and activate it.
    #[must_use]
    pub fn new(lesson_id: LessonId, target: Language, native: Language) -> Self {
        Self {
            lesson_id,
            target_language: target,
            native_language: native,
            items: Vec::new(),
            cursor: 0,
            response: None,
            outcome: ItemOutcome::Pending,
            state: SessionState::Loading,
            hearts_lost: 0,
        }
    }

    /// Fetch the item sequence and transition to `Active`.
    ///
    /// The only suspension point in the session. Never fails: provider
    /// errors are recovered inside the content service. A fetch that
    /// resolves after [`LessonSession::abort`] is discarded.
    pub async fn start(&mut self, content: &LessonContentService) {
        if self.state != SessionState::Loading {
            return;
        }

        let topic = topic_for(self.lesson_id);
        let items = content
            .fetch_or_fallback(topic, self.target_language, self.native_language)
            .await;

        // Abort may have happened while the fetch was in flight.
        if self.state != SessionState::Loading {
            debug!(lesson = %self.lesson_id, "discarding fetched items for aborted session");
            return;
        }

        debug!(lesson = %self.lesson_id, topic, count = items.len(), "lesson session active");
        self.items = items;
        self.cursor = 0;
        self.state = SessionState::Active;
    }

    /// Stage a candidate answer for the current item without grading it.
    ///
    /// For multiple-choice items the response is the chosen option string.
    /// Ignored unless the session is active and the item is ungraded.
    pub fn submit_response(&mut self, response: impl Into<String>) {
        if self.state != SessionState::Active || self.outcome != ItemOutcome::Pending {
            return;
        }
        self.response = Some(response.into());
    }

    /// True when a staged response is gradable: non-empty after trimming.
    #[must_use]
    pub fn can_grade(&self) -> bool {
        self.state == SessionState::Active
            && self.outcome == ItemOutcome::Pending
            && self
                .response
                .as_deref()
                .is_some_and(|r| !r.trim().is_empty())
    }

    /// Grade the staged response against the current item.
    ///
    /// All kinds reduce to one case-insensitive, trimmed string comparison.
    /// An incorrect outcome costs one heart, persisted through the progress
    /// store before this returns. Without a gradable response this is a
    /// no-op returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting the heart loss fails.
    pub async fn grade(
        &mut self,
        store: &mut ProgressStore,
    ) -> Result<Option<ItemOutcome>, ProgressStoreError> {
        if !self.can_grade() {
            return Ok(None);
        }
        let correct = match (self.items.get(self.cursor), self.response.as_deref()) {
            (Some(item), Some(response)) => grading::answers_match(response, item.correct_answer()),
            _ => return Ok(None),
        };

        let outcome = if correct {
            ItemOutcome::Correct
        } else {
            store.lose_heart().await?;
            self.hearts_lost += 1;
            ItemOutcome::Incorrect
        };

        debug!(lesson = %self.lesson_id, cursor = self.cursor, ?outcome, "item graded");
        self.outcome = outcome;
        Ok(Some(outcome))
    }

    /// Move past a graded item.
    ///
    /// With items remaining, resets per-item state and returns to awaiting a
    /// response. After the final item, reports `10 + 2 × item_count` XP to
    /// the progress store and transitions to `Completed`. A no-op returning
    /// `Ok(None)` unless the current item has been graded.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting the completion fails.
    pub async fn advance(
        &mut self,
        store: &mut ProgressStore,
    ) -> Result<Option<Advance>, ProgressStoreError> {
        if self.state != SessionState::Active || self.outcome == ItemOutcome::Pending {
            return Ok(None);
        }

        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            self.response = None;
            self.outcome = ItemOutcome::Pending;
            return Ok(Some(Advance::Next));
        }

        let reward = completion_reward(self.items.len());
        store.record_completion(self.lesson_id, reward).await?;
        self.state = SessionState::Completed;
        debug!(lesson = %self.lesson_id, reward, "lesson session completed");
        Ok(Some(Advance::Completed { reward }))
    }

    /// Discard the attempt with no progress side effects.
    ///
    /// Valid from any non-terminal state; terminal states are left as-is,
    /// and an aborted session ignores all further transitions.
    pub fn abort(&mut self) {
        match self.state {
            SessionState::Loading | SessionState::Active => {
                debug!(lesson = %self.lesson_id, "lesson session aborted");
                self.state = SessionState::Aborted;
            }
            SessionState::Completed | SessionState::Aborted => {}
        }
    }

    //
    // ─── READ SURFACE ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// The item under the cursor, while the session is active.
    #[must_use]
    pub fn current_item(&self) -> Option<&QuizItem> {
        if self.state == SessionState::Active {
            self.items.get(self.cursor)
        } else {
            None
        }
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Zero-based index of the current item.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn staged_response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    #[must_use]
    pub fn current_outcome(&self) -> ItemOutcome {
        self.outcome
    }

    /// Hearts lost over this attempt so far.
    #[must_use]
    pub fn hearts_lost(&self) -> u32 {
        self.hearts_lost
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson_id", &self.lesson_id)
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("items_len", &self.items.len())
            .field("outcome", &self.outcome)
            .field("hearts_lost", &self.hearts_lost)
            .finish_non_exhaustive()
    }
}

/// Reward formula for finishing a lesson of `item_count` items.
#[must_use]
pub fn completion_reward(item_count: usize) -> u32 {
    10 + 2 * u32::try_from(item_count).unwrap_or(0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentProvider, LessonContentService};
    use crate::error::ContentError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use storage::repository::InMemoryKvStore;

    struct FailingProvider;

    #[async_trait]
    impl ContentProvider for FailingProvider {
        async fn fetch_lesson(
            &self,
            _topic: &str,
            _target: Language,
            _native: Language,
        ) -> Result<Vec<QuizItem>, ContentError> {
            Err(ContentError::Disabled)
        }
    }

    fn fallback_content() -> LessonContentService {
        LessonContentService::new(Arc::new(FailingProvider))
    }

    async fn fresh_store() -> ProgressStore {
        ProgressStore::load(Arc::new(InMemoryKvStore::new()))
            .await
            .unwrap()
    }

    async fn active_session() -> LessonSession {
        let mut session = LessonSession::new(LessonId::new(2), Language::Fr, Language::En);
        session.start(&fallback_content()).await;
        assert_eq!(session.state(), SessionState::Active);
        session
    }

    #[tokio::test]
    async fn start_falls_back_to_fixed_sequence() {
        let session = active_session().await;
        assert_eq!(session.item_count(), 5);

        let first = session.current_item().unwrap();
        assert_eq!(first.prompt(), r#"How do you say "Hello" in French?"#);
        assert_eq!(first.correct_answer(), "Bonjour");
    }

    #[tokio::test]
    async fn loading_exposes_no_mutable_surface() {
        let mut session = LessonSession::new(LessonId::new(2), Language::Fr, Language::En);
        let mut store = fresh_store().await;

        session.submit_response("Bonjour");
        assert_eq!(session.staged_response(), None);
        assert!(!session.can_grade());
        assert_eq!(session.grade(&mut store).await.unwrap(), None);
        assert_eq!(session.advance(&mut store).await.unwrap(), None);
        assert_eq!(session.state(), SessionState::Loading);
    }

    #[tokio::test]
    async fn blank_response_is_not_gradable() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response("   ");
        assert!(!session.can_grade());
        assert_eq!(session.grade(&mut store).await.unwrap(), None);
        assert_eq!(store.progress().hearts, 5);
    }

    #[tokio::test]
    async fn grading_is_case_and_whitespace_insensitive() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response(" bonjour ");
        let outcome = session.grade(&mut store).await.unwrap();
        assert_eq!(outcome, Some(ItemOutcome::Correct));
        assert_eq!(store.progress().hearts, 5);
    }

    #[tokio::test]
    async fn incorrect_grade_costs_one_heart() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response("Au revoir");
        let outcome = session.grade(&mut store).await.unwrap();
        assert_eq!(outcome, Some(ItemOutcome::Incorrect));
        assert_eq!(store.progress().hearts, 4);
        assert_eq!(session.hearts_lost(), 1);
    }

    #[tokio::test]
    async fn double_grade_is_a_no_op() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response("wrong");
        session.grade(&mut store).await.unwrap();
        assert_eq!(session.grade(&mut store).await.unwrap(), None);
        assert_eq!(store.progress().hearts, 4);
    }

    #[tokio::test]
    async fn response_cannot_change_after_grading() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response("wrong");
        session.grade(&mut store).await.unwrap();
        session.submit_response("Bonjour");
        assert_eq!(session.staged_response(), Some("wrong"));
    }

    #[tokio::test]
    async fn advance_before_grading_is_a_no_op() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response("Bonjour");
        assert_eq!(session.advance(&mut store).await.unwrap(), None);
        assert_eq!(session.cursor(), 0);
    }

    #[tokio::test]
    async fn advance_resets_per_item_state() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        session.submit_response("Bonjour");
        session.grade(&mut store).await.unwrap();
        let step = session.advance(&mut store).await.unwrap();

        assert_eq!(step, Some(Advance::Next));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.staged_response(), None);
        assert_eq!(session.current_outcome(), ItemOutcome::Pending);
    }

    #[tokio::test]
    async fn full_run_reports_reward_and_advances_frontier() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;
        let xp_before = store.progress().experience;

        // Answer item 2 incorrectly, the rest correctly.
        for idx in 0..5 {
            let correct = session.current_item().unwrap().correct_answer().to_string();
            if idx == 1 {
                session.submit_response("definitely wrong");
            } else {
                session.submit_response(correct);
            }
            session.grade(&mut store).await.unwrap();
            let step = session.advance(&mut store).await.unwrap().unwrap();
            if idx < 4 {
                assert_eq!(step, Advance::Next);
            } else {
                assert_eq!(step, Advance::Completed { reward: 20 });
            }
        }

        assert!(session.is_complete());
        assert_eq!(store.progress().hearts, 4);
        assert_eq!(store.progress().experience, xp_before + 20);
        assert_eq!(store.progress().current_level, 3);
        assert!(store.is_completed(LessonId::new(2)));
    }

    #[tokio::test]
    async fn abort_from_active_leaves_store_untouched() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;
        let before = store.snapshot();

        session.submit_response("Bonjour");
        session.abort();
        assert_eq!(session.state(), SessionState::Aborted);

        // Everything after abort is ignored.
        assert_eq!(session.grade(&mut store).await.unwrap(), None);
        assert_eq!(session.advance(&mut store).await.unwrap(), None);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn fetch_resolving_after_abort_is_discarded() {
        let mut session = LessonSession::new(LessonId::new(2), Language::Fr, Language::En);
        session.abort();
        session.start(&fallback_content()).await;

        assert_eq!(session.state(), SessionState::Aborted);
        assert_eq!(session.item_count(), 0);
        assert_eq!(session.current_item(), None);
    }

    #[tokio::test]
    async fn completed_session_cannot_be_aborted_or_restarted() {
        let mut session = active_session().await;
        let mut store = fresh_store().await;

        for _ in 0..5 {
            let correct = session.current_item().unwrap().correct_answer().to_string();
            session.submit_response(correct);
            session.grade(&mut store).await.unwrap();
            session.advance(&mut store).await.unwrap();
        }
        assert!(session.is_complete());

        session.abort();
        assert_eq!(session.state(), SessionState::Completed);

        session.start(&fallback_content()).await;
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn reward_formula() {
        assert_eq!(completion_reward(5), 20);
        assert_eq!(completion_reward(0), 10);
        assert_eq!(completion_reward(8), 26);
    }
}
