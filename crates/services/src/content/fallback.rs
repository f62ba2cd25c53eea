use lingo_core::{Language, QuizItem};

/// The fixed five-item lesson used whenever live generation is unavailable.
///
/// Deterministic and language-specific: the same target language always
/// yields the same sequence, so the offline demo behaves reproducibly.
#[must_use]
pub fn fallback_lesson(target: Language) -> Vec<QuizItem> {
    match target {
        Language::Fr => french_lesson(),
        Language::En => english_lesson(),
    }
}

fn french_lesson() -> Vec<QuizItem> {
    vec![
        QuizItem::multiple_choice(
            "1",
            r#"How do you say "Hello" in French?"#,
            "Bonjour",
            vec![
                "Bonjour".into(),
                "Au revoir".into(),
                "Merci".into(),
                "Oui".into(),
            ],
        )
        .expect("fallback item is well-formed"),
        QuizItem::translation(
            "2",
            lingo_core::QuizKind::TranslateToNative,
            "Je mange une pomme",
            "I eat an apple",
        )
        .expect("fallback item is well-formed"),
        QuizItem::translation(
            "3",
            lingo_core::QuizKind::TranslateToTarget,
            "The cat",
            "Le chat",
        )
        .expect("fallback item is well-formed"),
        QuizItem::listening("4", "Type what you hear", "Merci beaucoup", "Merci beaucoup")
            .expect("fallback item is well-formed"),
        QuizItem::multiple_choice(
            "5",
            r#"Which of these is "Red"?"#,
            "Rouge",
            vec![
                "Bleu".into(),
                "Rouge".into(),
                "Vert".into(),
                "Jaune".into(),
            ],
        )
        .expect("fallback item is well-formed"),
    ]
}

fn english_lesson() -> Vec<QuizItem> {
    vec![
        QuizItem::multiple_choice(
            "1",
            r#"How do you say "Bonjour" in English?"#,
            "Hello",
            vec![
                "Hello".into(),
                "Goodbye".into(),
                "Thanks".into(),
                "Yes".into(),
            ],
        )
        .expect("fallback item is well-formed"),
        QuizItem::translation(
            "2",
            lingo_core::QuizKind::TranslateToNative,
            "I eat an apple",
            "Je mange une pomme",
        )
        .expect("fallback item is well-formed"),
        QuizItem::translation(
            "3",
            lingo_core::QuizKind::TranslateToTarget,
            "Le chat",
            "The cat",
        )
        .expect("fallback item is well-formed"),
        QuizItem::listening(
            "4",
            "Type what you hear",
            "Thank you very much",
            "Thank you very much",
        )
        .expect("fallback item is well-formed"),
        QuizItem::multiple_choice(
            "5",
            r#"Which of these is "Rouge"?"#,
            "Red",
            vec!["Blue".into(), "Red".into(), "Green".into(), "Yellow".into()],
        )
        .expect("fallback item is well-formed"),
    ]
}
