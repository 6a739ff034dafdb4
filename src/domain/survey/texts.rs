//! Localized user-facing texts.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Language used when a conversation has none or an unknown one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Message identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    DocumentCaption,
    BudgetExhausted,
    AttachmentReceived,
    TurnFailed,
}

static DICTIONARY: Lazy<HashMap<(TextKey, &'static str), &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            (TextKey::DocumentCaption, "en"),
            "Here is a summary of your profile. Thank you for your answers!",
        ),
        (
            (TextKey::DocumentCaption, "ru"),
            "Вот краткое резюме вашего профиля. Спасибо за ответы!",
        ),
        (
            (TextKey::BudgetExhausted, "en"),
            "This conversation has reached its limit.",
        ),
        (
            (TextKey::BudgetExhausted, "ru"),
            "Лимит этого диалога исчерпан.",
        ),
        (
            (TextKey::AttachmentReceived, "en"),
            "Thanks, your file has been received.",
        ),
        (
            (TextKey::AttachmentReceived, "ru"),
            "Спасибо, файл получен.",
        ),
        (
            (TextKey::TurnFailed, "en"),
            "Sorry, something went wrong. Please try again.",
        ),
        (
            (TextKey::TurnFailed, "ru"),
            "Извините, что-то пошло не так. Попробуйте ещё раз.",
        ),
    ])
});

/// Text for `key` in `language`, falling back to English.
pub fn text(key: TextKey, language: Option<&str>) -> &'static str {
    let language = language.unwrap_or(DEFAULT_LANGUAGE);
    DICTIONARY
        .get(&(key, language))
        .or_else(|| DICTIONARY.get(&(key, DEFAULT_LANGUAGE)))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_requested_language() {
        assert_eq!(text(TextKey::AttachmentReceived, Some("ru")), "Спасибо, файл получен.");
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(
            text(TextKey::AttachmentReceived, Some("de")),
            "Thanks, your file has been received."
        );
        assert_eq!(text(TextKey::BudgetExhausted, None), text(TextKey::BudgetExhausted, Some("en")));
    }

    #[test]
    fn every_key_has_english_text() {
        for key in [
            TextKey::DocumentCaption,
            TextKey::BudgetExhausted,
            TextKey::AttachmentReceived,
            TextKey::TurnFailed,
        ] {
            assert!(!text(key, None).is_empty());
        }
    }
}
