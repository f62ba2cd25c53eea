use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors from constructing a quiz item with an invalid shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizItemError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("correct answer must not be empty")]
    EmptyAnswer,

    #[error("multiple-choice item needs at least two choices, got {got}")]
    TooFewChoices { got: usize },

    #[error("choices are only valid for multiple-choice items")]
    UnexpectedChoices,

    #[error("listening item needs audio text")]
    MissingAudioText,

    #[error("audio text is only valid for listening items")]
    UnexpectedAudioText,
}

//
// ─── QUIZ KIND ────────────────────────────────────────────────────────────────
//

/// The four exercise shapes a lesson is built from.
///
/// Serde names match the wire enum the content provider emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizKind {
    /// Prompt in the native language, answer typed in the target language.
    #[serde(rename = "translate_to_target")]
    TranslateToTarget,
    /// Prompt in the target language, answer typed in the native language.
    #[serde(rename = "translate_to_native")]
    TranslateToNative,
    /// Pick the correct option among the given choices.
    #[serde(rename = "multiple_choice")]
    MultipleChoice,
    /// Audio text is voiced instead of shown; learner types what they hear.
    #[serde(rename = "listening")]
    Listening,
}

impl QuizKind {
    /// True for kinds answered by typing free text.
    #[must_use]
    pub fn is_free_text(self) -> bool {
        !matches!(self, QuizKind::MultipleChoice)
    }
}

//
// ─── QUIZ ITEM ────────────────────────────────────────────────────────────────
//

/// A single exercise within a lesson.
///
/// Shape invariants: `choices` is present iff the kind is multiple-choice,
/// `audio_text` is present iff the kind is listening. The validating
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    id: String,
    kind: QuizKind,
    prompt: String,
    correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    choices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_text: Option<String>,
}

impl QuizItem {
    /// Build a free-text translation item.
    ///
    /// # Errors
    ///
    /// Returns `QuizItemError` if prompt or answer is empty, or the kind is
    /// not a translation kind.
    pub fn translation(
        id: impl Into<String>,
        kind: QuizKind,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuizItemError> {
        match kind {
            QuizKind::TranslateToTarget | QuizKind::TranslateToNative => {}
            QuizKind::MultipleChoice => return Err(QuizItemError::TooFewChoices { got: 0 }),
            QuizKind::Listening => return Err(QuizItemError::MissingAudioText),
        }
        Self::validated(id, kind, prompt, correct_answer, None, None)
    }

    /// Build a multiple-choice item.
    ///
    /// # Errors
    ///
    /// Returns `QuizItemError::TooFewChoices` with fewer than two options,
    /// or empty-field errors.
    pub fn multiple_choice(
        id: impl Into<String>,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        choices: Vec<String>,
    ) -> Result<Self, QuizItemError> {
        if choices.len() < 2 {
            return Err(QuizItemError::TooFewChoices { got: choices.len() });
        }
        Self::validated(
            id,
            QuizKind::MultipleChoice,
            prompt,
            correct_answer,
            Some(choices),
            None,
        )
    }

    /// Build a listening item whose `audio_text` is voiced instead of shown.
    ///
    /// # Errors
    ///
    /// Returns `QuizItemError` on empty fields.
    pub fn listening(
        id: impl Into<String>,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        audio_text: impl Into<String>,
    ) -> Result<Self, QuizItemError> {
        let audio_text = audio_text.into();
        if audio_text.trim().is_empty() {
            return Err(QuizItemError::MissingAudioText);
        }
        Self::validated(
            id,
            QuizKind::Listening,
            prompt,
            correct_answer,
            None,
            Some(audio_text),
        )
    }

    /// Rehydrate an item from untrusted parts (provider output, persisted
    /// blobs), enforcing the shape invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuizItemError` if the optional fields do not match the kind
    /// or mandatory fields are empty.
    pub fn from_parts(
        id: impl Into<String>,
        kind: QuizKind,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        choices: Option<Vec<String>>,
        audio_text: Option<String>,
    ) -> Result<Self, QuizItemError> {
        match kind {
            QuizKind::MultipleChoice => {
                let choices = choices.ok_or(QuizItemError::TooFewChoices { got: 0 })?;
                if audio_text.is_some() {
                    return Err(QuizItemError::UnexpectedAudioText);
                }
                Self::multiple_choice(id, prompt, correct_answer, choices)
            }
            QuizKind::Listening => {
                if choices.is_some() {
                    return Err(QuizItemError::UnexpectedChoices);
                }
                let audio_text = audio_text.ok_or(QuizItemError::MissingAudioText)?;
                Self::listening(id, prompt, correct_answer, audio_text)
            }
            QuizKind::TranslateToTarget | QuizKind::TranslateToNative => {
                if choices.is_some() {
                    return Err(QuizItemError::UnexpectedChoices);
                }
                if audio_text.is_some() {
                    return Err(QuizItemError::UnexpectedAudioText);
                }
                Self::translation(id, kind, prompt, correct_answer)
            }
        }
    }

    fn validated(
        id: impl Into<String>,
        kind: QuizKind,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        choices: Option<Vec<String>>,
        audio_text: Option<String>,
    ) -> Result<Self, QuizItemError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuizItemError::EmptyPrompt);
        }
        let correct_answer = correct_answer.into();
        if correct_answer.trim().is_empty() {
            return Err(QuizItemError::EmptyAnswer);
        }

        Ok(Self {
            id: id.into(),
            kind,
            prompt,
            correct_answer,
            choices,
            audio_text,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Options for a multiple-choice item, in presentation order.
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Text to voice for a listening item.
    #[must_use]
    pub fn audio_text(&self) -> Option<&str> {
        self.audio_text.as_deref()
    }

    /// Text the audio collaborator should speak for this item, if any.
    ///
    /// Listening items fall back to the prompt when `audio_text` is missing
    /// upstream; other kinds speak their prompt.
    #[must_use]
    pub fn spoken_text(&self) -> &str {
        self.audio_text.as_deref().unwrap_or(&self.prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_choice_requires_choices() {
        let err = QuizItem::from_parts("1", QuizKind::MultipleChoice, "p", "a", None, None)
            .unwrap_err();
        assert_eq!(err, QuizItemError::TooFewChoices { got: 0 });
    }

    #[test]
    fn multiple_choice_requires_two_options() {
        let err =
            QuizItem::multiple_choice("1", "p", "a", vec!["a".into()]).unwrap_err();
        assert_eq!(err, QuizItemError::TooFewChoices { got: 1 });
    }

    #[test]
    fn listening_requires_audio_text() {
        let err = QuizItem::from_parts("4", QuizKind::Listening, "p", "a", None, None)
            .unwrap_err();
        assert_eq!(err, QuizItemError::MissingAudioText);
    }

    #[test]
    fn translation_rejects_stray_choices() {
        let err = QuizItem::from_parts(
            "2",
            QuizKind::TranslateToNative,
            "p",
            "a",
            Some(vec!["x".into(), "y".into()]),
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuizItemError::UnexpectedChoices);
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err =
            QuizItem::translation("3", QuizKind::TranslateToTarget, "  ", "a").unwrap_err();
        assert_eq!(err, QuizItemError::EmptyPrompt);
    }

    #[test]
    fn listening_speaks_audio_text() {
        let item = QuizItem::listening("4", "Type what you hear", "Merci beaucoup", "Merci beaucoup")
            .unwrap();
        assert_eq!(item.spoken_text(), "Merci beaucoup");
    }

    #[test]
    fn serde_kind_names_match_wire_enum() {
        let item = QuizItem::translation("2", QuizKind::TranslateToNative, "Je mange", "I eat")
            .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "translate_to_native");
        assert!(json.get("choices").is_none());
    }
}
