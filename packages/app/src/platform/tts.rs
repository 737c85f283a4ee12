// TTS (Text-to-Speech) 平台模块
//
// 新的朗读请求会打断正在播放的朗读 (后到者生效，不排队)

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// TTS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// 语言代码 (如 "en-US")
    pub language: String,
    /// 语速 (0.5 - 2.0, 1.0 为正常)
    pub rate: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            language: nextoddlers_core::DEFAULT_SPEECH_LANGUAGE.to_string(),
            rate: nextoddlers_core::DEFAULT_TTS_RATE, // 稍慢一点，便于幼儿跟读
        }
    }
}

/// TTS 错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TtsError {
    #[error("TTS 不支持当前平台")]
    NotSupported,
    #[error("TTS 播放失败: {0}")]
    SpeakFailed(String),
}

/// 朗读能力：发出即返回，不关心结果
pub trait TextToSpeech: Send + Sync {
    fn speak(&self, text: &str, config: &TtsConfig) -> Result<(), TtsError>;
    /// 停止正在播放的朗读
    fn cancel(&self);
}

/// 无界面朗读：只写日志并记录播放状态
#[derive(Debug, Default)]
pub struct HeadlessTts {
    speaking: AtomicBool,
}

impl HeadlessTts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}

impl TextToSpeech for HeadlessTts {
    fn speak(&self, text: &str, config: &TtsConfig) -> Result<(), TtsError> {
        self.speaking.store(true, Ordering::SeqCst);
        tracing::info!(
            text,
            language = %config.language,
            rate = config.rate,
            "tts speak"
        );
        Ok(())
    }

    fn cancel(&self) {
        self.speaking.store(false, Ordering::SeqCst);
    }
}
