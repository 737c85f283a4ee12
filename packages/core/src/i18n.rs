//! 引擎与登录流程会显示的少量反馈文案

use crate::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    GoodJob,
    TryAgain,
    TapToSpeak,
    SpeechUnsupported,
    InvalidCode,
}

pub fn phrase(language: Language, key: Phrase) -> &'static str {
    match (language, key) {
        (Language::En, Phrase::GoodJob) => "Good job!",
        (Language::En, Phrase::TryAgain) => "Try again!",
        (Language::En, Phrase::TapToSpeak) => "Say the word!",
        (Language::En, Phrase::SpeechUnsupported) => {
            "Speech recognition is not supported on this device."
        }
        (Language::En, Phrase::InvalidCode) => "Oops! That code is not right.",

        (Language::Ru, Phrase::GoodJob) => "Молодец!",
        (Language::Ru, Phrase::TryAgain) => "Попробуй ещё раз!",
        (Language::Ru, Phrase::TapToSpeak) => "Скажи слово!",
        (Language::Ru, Phrase::SpeechUnsupported) => {
            "Распознавание речи не поддерживается на этом устройстве."
        }
        (Language::Ru, Phrase::InvalidCode) => "Ой! Неверный код.",

        (Language::Tr, Phrase::GoodJob) => "Aferin!",
        (Language::Tr, Phrase::TryAgain) => "Tekrar dene!",
        (Language::Tr, Phrase::TapToSpeak) => "Kelimeyi söyle!",
        (Language::Tr, Phrase::SpeechUnsupported) => "Bu cihazda konuşma tanıma desteklenmiyor.",
        (Language::Tr, Phrase::InvalidCode) => "Hata! Bu kod doğru değil.",
    }
}
