//! Fire-and-forget seam for the audio playback collaborator.

use lingo_core::Language;

/// Best-effort spoken playback of a text in a given language.
///
/// Callers never consume a return value; an implementation that cannot play
/// audio should simply do nothing.
pub trait SpeechPlayback: Send + Sync {
    fn speak(&self, text: &str, language: Language);
}

/// No-op playback for headless environments and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeech;

impl SpeechPlayback for NullSpeech {
    fn speak(&self, _text: &str, _language: Language) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingSpeech {
        spoken: Arc<Mutex<Vec<(String, Language)>>>,
    }

    impl SpeechPlayback for RecordingSpeech {
        fn speak(&self, text: &str, language: Language) {
            self.spoken
                .lock()
                .unwrap()
                .push((text.to_string(), language));
        }
    }

    #[test]
    fn playback_receives_text_and_language() {
        let speech = RecordingSpeech::default();
        speech.speak("Merci beaucoup", Language::Fr);

        let spoken = speech.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].0, "Merci beaucoup");
        assert_eq!(spoken[0].1.speech_locale(), "fr-FR");
    }

    #[test]
    fn null_speech_is_silent() {
        NullSpeech.speak("Bonjour", Language::Fr);
    }
}
