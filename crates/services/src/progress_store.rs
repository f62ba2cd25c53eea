use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use lingo_core::{LessonId, ProgressPatch, UserProgress};
use storage::repository::KeyValueStore;

use crate::error::ProgressStoreError;

/// Key under which the user-progress record is persisted.
///
/// Both key names are carried over from the original browser-localStorage
/// schema so existing blobs read back unchanged.
pub const USER_KEY: &str = "lingoleap_user";

/// Key under which the completed-lesson list is persisted.
pub const COMPLETED_KEY: &str = "lingoleap_completed";

//
// ─── SNAPSHOTS & OUTCOMES ─────────────────────────────────────────────────────
//

/// Read-only view published to observers after every committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub progress: UserProgress,
    pub completed: BTreeSet<LessonId>,
}

/// What a `record_completion` call actually granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// False when the lesson had been completed before (practice mode).
    pub newly_completed: bool,
    /// Experience actually added (halved and floored on practice replays).
    pub xp_granted: u32,
    /// Unlock frontier after the call.
    pub level_after: u32,
}

//
// ─── PROGRESS STORE ───────────────────────────────────────────────────────────
//

/// Single source of truth for durable learner state.
///
/// Owns the [`UserProgress`] record and the completed-lesson set, and is the
/// sole (de)serializer of both. Every mutation persists through the key-value
/// store before the method returns and before observers are notified, so no
/// observer can see a value that is not yet durable. On a write failure the
/// in-memory state is left unchanged.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    progress: UserProgress,
    completed: BTreeSet<LessonId>,
    tx: watch::Sender<ProgressSnapshot>,
}

impl ProgressStore {
    /// Load persisted state, degrading to the fixed default progress and an
    /// empty completed set when either key is absent or unparsable.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError::Storage` only for backend failures;
    /// corrupt content never fails outward.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Result<Self, ProgressStoreError> {
        let progress = match kv.read_key(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<UserProgress>(&raw) {
                Ok(progress) => progress,
                Err(err) => {
                    warn!(key = USER_KEY, error = %err, "unreadable progress blob, using defaults");
                    UserProgress::default()
                }
            },
            None => UserProgress::default(),
        };

        let completed = match kv.read_key(COMPLETED_KEY).await? {
            Some(raw) => parse_completed(&raw).unwrap_or_else(|err| {
                warn!(key = COMPLETED_KEY, error = %err, "unreadable completed set, starting empty");
                BTreeSet::new()
            }),
            None => BTreeSet::new(),
        };

        let (tx, _rx) = watch::channel(ProgressSnapshot {
            progress: progress.clone(),
            completed: completed.clone(),
        });

        Ok(Self {
            kv,
            progress,
            completed,
            tx,
        })
    }

    #[must_use]
    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<LessonId> {
        &self.completed
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: LessonId) -> bool {
        self.completed.contains(&lesson_id)
    }

    /// A lesson node is unlocked when its id is at or below the frontier.
    #[must_use]
    pub fn is_unlocked(&self, lesson_id: LessonId) -> bool {
        lesson_id.value() <= u64::from(self.progress.current_level)
    }

    /// Current state as an owned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            progress: self.progress.clone(),
            completed: self.completed.clone(),
        }
    }

    /// Observer surface: receives a snapshot after each committed mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }

    /// Merge a partial update, persist, notify.
    ///
    /// Hearts are clamped on merge; no other validation is applied, callers
    /// are trusted to pass sane values.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting fails; in-memory state is
    /// then unchanged.
    pub async fn apply_patch(&mut self, patch: ProgressPatch) -> Result<(), ProgressStoreError> {
        let mut next = self.progress.clone();
        next.apply(patch);
        self.commit(next, self.completed.clone()).await
    }

    /// Remove one heart, clamped at zero. Returns the new count.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting fails.
    pub async fn lose_heart(&mut self) -> Result<u8, ProgressStoreError> {
        let mut next = self.progress.clone();
        let hearts = next.lose_heart();
        self.commit(next, self.completed.clone()).await?;
        Ok(hearts)
    }

    /// Record a finished lesson attempt and grant experience.
    ///
    /// First completion of the frontier lesson (`id == current_level`)
    /// advances the frontier by exactly one and grants full XP. First
    /// completion of any other unlocked id grants full XP with no level
    /// change. Replaying an already-completed lesson is practice mode:
    /// half XP (floored), no level change, no duplicate entry.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting fails; in-memory state is
    /// then unchanged.
    pub async fn record_completion(
        &mut self,
        lesson_id: LessonId,
        xp_earned: u32,
    ) -> Result<CompletionOutcome, ProgressStoreError> {
        let mut progress = self.progress.clone();
        let mut completed = self.completed.clone();

        let newly_completed = completed.insert(lesson_id);
        let xp_granted = if newly_completed {
            if lesson_id.value() == u64::from(progress.current_level) {
                progress.current_level += 1;
            }
            xp_earned
        } else {
            xp_earned / 2
        };
        progress.add_experience(xp_granted);

        let level_after = progress.current_level;
        self.commit(progress, completed).await?;

        debug!(
            lesson = %lesson_id,
            xp_granted,
            level_after,
            newly_completed,
            "lesson completion recorded"
        );

        Ok(CompletionOutcome {
            newly_completed,
            xp_granted,
            level_after,
        })
    }

    /// Restore the fixed default progress and clear the completed set.
    ///
    /// Idempotent under repetition.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting fails.
    pub async fn reset(&mut self) -> Result<(), ProgressStoreError> {
        self.commit(UserProgress::default(), BTreeSet::new()).await
    }

    /// Persist the candidate state, then commit it in memory and notify.
    async fn commit(
        &mut self,
        progress: UserProgress,
        completed: BTreeSet<LessonId>,
    ) -> Result<(), ProgressStoreError> {
        let user_blob = serde_json::to_string(&progress)?;
        let completed_list: Vec<String> = completed.iter().map(ToString::to_string).collect();
        let completed_blob = serde_json::to_string(&completed_list)?;

        self.kv.write_key(USER_KEY, &user_blob).await?;
        self.kv.write_key(COMPLETED_KEY, &completed_blob).await?;

        self.progress = progress;
        self.completed = completed;
        self.tx.send_replace(self.snapshot());
        Ok(())
    }
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore")
            .field("progress", &self.progress)
            .field("completed_len", &self.completed.len())
            .finish_non_exhaustive()
    }
}

/// Parse the persisted completed-lesson list (a JSON array of id strings).
fn parse_completed(raw: &str) -> Result<BTreeSet<LessonId>, serde_json::Error> {
    let entries: Vec<String> = serde_json::from_str(raw)?;
    let mut completed = BTreeSet::new();
    for entry in &entries {
        match entry.parse::<LessonId>() {
            Ok(id) => {
                completed.insert(id);
            }
            Err(err) => {
                // One bad entry makes the whole blob untrustworthy.
                return Err(serde::de::Error::custom(err));
            }
        }
    }
    Ok(completed)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
