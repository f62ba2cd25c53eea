//! Simulated pronunciation scoring.
//!
//! The real product would score recorded audio server-side; the demo only
//! compares transcribed text. Not consulted by the grading path.

use lingo_core::grading;

/// Score and coach line for one pronunciation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronunciationCheck {
    /// 0-100; the simulation only emits 100 or 50.
    pub score: u8,
    pub feedback: &'static str,
}

/// Compare the transcribed attempt against the expected text.
#[must_use]
pub fn check_pronunciation(user_text: &str, expected: &str) -> PronunciationCheck {
    if grading::answers_match(user_text, expected) {
        PronunciationCheck {
            score: 100,
            feedback: "Perfect pronunciation!",
        }
    } else {
        PronunciationCheck {
            score: 50,
            feedback: "Close, but try to enunciate clearly.",
        }
    }
}
