use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownLanguage;

// 常量定义
pub const PLACEHOLDER_NICKNAME: &str = "Little Learner";
pub const DEFAULT_TTS_RATE: f32 = 0.8;
pub const DEFAULT_SESSION_MINUTES: u32 = 5;
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

/// 课程条目：目标单词 + 可选的提示短语 (常带 emoji)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningItem {
    pub content: String,
    pub example: Option<String>,
}

impl LearningItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            example: None,
        }
    }

    pub fn with_example(content: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            example: Some(example.into()),
        }
    }

    /// 拼写模式卡片上显示的图片：提示短语的最后一个词
    pub fn picture(&self) -> Option<&str> {
        self.example
            .as_deref()
            .and_then(|example| example.split_whitespace().last())
    }
}

/// 练习模式，会话期间固定不变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMode {
    Recognition,
    Spelling,
}

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
    Tr,
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            "tr" => Ok(Language::Tr),
            _ => Err(UnknownLanguage(s.trim().to_string())),
        }
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Tr => "tr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Success,
    Failure,
    Neutral,
}

/// 临时反馈：定时清除或切换条目时清除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn new(message: impl Into<String>, kind: FeedbackKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}
