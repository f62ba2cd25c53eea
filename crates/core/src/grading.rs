//! Pure answer grading: every exercise kind reduces to one normalized
//! string comparison. No partial credit, no fuzzy matching.

/// Normalize a learner response or expected answer for comparison:
/// surrounding whitespace trimmed, lowercased.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Case-insensitive, whitespace-trimmed exact equality.
///
/// Applies to every kind, multiple-choice included (the chosen option string
/// is compared against the correct answer).
#[must_use]
pub fn answers_match(response: &str, expected: &str) -> bool {
    normalize(response) == normalize(expected)
}
