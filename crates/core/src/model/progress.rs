use serde::{Deserialize, Serialize};

use crate::model::Language;

/// Upper bound for hearts; decrements clamp into `[0, HEARTS_MAX]`.
pub const HEARTS_MAX: u8 = 5;

/// Durable learner state, one record per installation.
///
/// Serialized field names match the original browser-localStorage schema so a
/// persisted blob from the demo app reads back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(rename = "xp")]
    pub experience: u32,
    #[serde(rename = "streak")]
    pub streak_days: u32,
    pub hearts: u8,
    #[serde(rename = "currentLevel")]
    pub current_level: u32,
    #[serde(rename = "targetLanguage")]
    pub target_language: Language,
    #[serde(rename = "nativeLanguage")]
    pub native_language: Language,
    pub gems: u32,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl Default for UserProgress {
    /// The fixed demo starting state: some progress already banked so the
    /// unit map shows an unlocked frontier at level 2.
    fn default() -> Self {
        Self {
            experience: 1240,
            streak_days: 5,
            hearts: HEARTS_MAX,
            current_level: 2,
            target_language: Language::Fr,
            native_language: Language::En,
            gems: 450,
            display_name: "Learner".to_string(),
        }
    }
}

impl UserProgress {
    /// Merge a partial update into this record.
    ///
    /// Hearts are clamped to `[0, HEARTS_MAX]`; no other field is validated,
    /// callers are trusted to pass sane values.
    pub fn apply(&mut self, patch: ProgressPatch) {
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        if let Some(streak_days) = patch.streak_days {
            self.streak_days = streak_days;
        }
        if let Some(hearts) = patch.hearts {
            self.hearts = hearts.min(HEARTS_MAX);
        }
        if let Some(current_level) = patch.current_level {
            self.current_level = current_level;
        }
        if let Some(target_language) = patch.target_language {
            self.target_language = target_language;
        }
        if let Some(native_language) = patch.native_language {
            self.native_language = native_language;
        }
        if let Some(gems) = patch.gems {
            self.gems = gems;
        }
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
    }

    /// Remove one heart, clamped at zero. Returns the new count.
    pub fn lose_heart(&mut self) -> u8 {
        self.hearts = self.hearts.saturating_sub(1);
        self.hearts
    }

    /// Add earned experience points, saturating on overflow.
    pub fn add_experience(&mut self, earned: u32) {
        self.experience = self.experience.saturating_add(earned);
    }
}

/// Partial update for [`UserProgress`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPatch {
    pub experience: Option<u32>,
    pub streak_days: Option<u32>,
    pub hearts: Option<u8>,
    pub current_level: Option<u32>,
    pub target_language: Option<Language>,
    pub native_language: Option<Language>,
    pub gems: Option<u32>,
    pub display_name: Option<String>,
}

impl ProgressPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hearts(mut self, hearts: u8) -> Self {
        self.hearts = Some(hearts);
        self
    }

    #[must_use]
    pub fn experience(mut self, experience: u32) -> Self {
        self.experience = Some(experience);
        self
    }

    #[must_use]
    pub fn streak_days(mut self, streak_days: u32) -> Self {
        self.streak_days = Some(streak_days);
        self
    }

    #[must_use]
    pub fn current_level(mut self, current_level: u32) -> Self {
        self.current_level = Some(current_level);
        self
    }

    #[must_use]
    pub fn languages(mut self, target: Language, native: Language) -> Self {
        self.target_language = Some(target);
        self.native_language = Some(native);
        self
    }

    #[must_use]
    pub fn gems(mut self, gems: u32) -> Self {
        self.gems = Some(gems);
        self
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns true when the patch carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_demo_seed() {
        let p = UserProgress::default();
        assert_eq!(p.experience, 1240);
        assert_eq!(p.streak_days, 5);
        assert_eq!(p.hearts, 5);
        assert_eq!(p.current_level, 2);
        assert_eq!(p.gems, 450);
        assert_eq!(p.target_language, Language::Fr);
        assert_eq!(p.native_language, Language::En);
        assert_eq!(p.display_name, "Learner");
    }

    #[test]
    fn apply_merges_only_given_fields() {
        let mut p = UserProgress::default();
        p.apply(ProgressPatch::new().experience(2000).display_name("Ada"));
        assert_eq!(p.experience, 2000);
        assert_eq!(p.display_name, "Ada");
        assert_eq!(p.hearts, 5);
        assert_eq!(p.current_level, 2);
    }

    #[test]
    fn apply_clamps_hearts_to_max() {
        let mut p = UserProgress::default();
        p.apply(ProgressPatch::new().hearts(9));
        assert_eq!(p.hearts, HEARTS_MAX);
    }

    #[test]
    fn lose_heart_clamps_at_zero() {
        let mut p = UserProgress::default();
        for _ in 0..10 {
            p.lose_heart();
        }
        assert_eq!(p.hearts, 0);
    }

    #[test]
    fn serde_uses_original_field_names() {
        let json = serde_json::to_value(UserProgress::default()).unwrap();
        assert_eq!(json["xp"], 1240);
        assert_eq!(json["streak"], 5);
        assert_eq!(json["currentLevel"], 2);
        assert_eq!(json["targetLanguage"], "fr");
        assert_eq!(json["nativeLanguage"], "en");
        assert_eq!(json["name"], "Learner");
    }
}
