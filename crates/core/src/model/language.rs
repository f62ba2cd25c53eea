use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of supported language codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "fr")]
    Fr,
}

impl Language {
    /// Two-letter language code, as persisted and as sent to the content provider.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    /// Human-readable name, used in generation prompts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "French",
        }
    }

    /// BCP-47 locale passed to the speech-playback collaborator.
    #[must_use]
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Fr => "fr-FR",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error type for parsing a `Language` from a code string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    raw: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language code: {:?}", self.raw)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(ParseLanguageError {
                raw: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for lang in [Language::En, Language::Fr] {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn serde_uses_two_letter_codes() {
        assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"fr\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn speech_locales() {
        assert_eq!(Language::Fr.speech_locale(), "fr-FR");
        assert_eq!(Language::En.speech_locale(), "en-US");
    }
}
