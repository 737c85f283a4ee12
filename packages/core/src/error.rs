use thiserror::Error;

/// 练习会话错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("speech capture is not supported on this platform")]
    SpeechCaptureUnsupported,

    #[error("a listening window is already open")]
    AlreadyListening,

    #[error("spoken answers are not available in spelling mode")]
    NotInRecognitionMode,

    #[error("session has already finished")]
    SessionFinished,
}

/// 不支持的界面语言代码
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);
