// Platform 模块 - 平台能力接口
// 朗读、语音识别、彩纸特效都由宿主平台提供，这里只定义接口和无界面实现

pub mod celebration;
pub mod speech;
pub mod tts;

use std::sync::Arc;

pub use celebration::{CelebrationEffect, LoggingCelebration};
pub use speech::{
    ListenRequest, RecognitionError, RecognitionSink, SpeechRecognizer, UnsupportedRecognizer,
};
pub use tts::{HeadlessTts, TextToSpeech, TtsConfig, TtsError};

/// 一个会话用到的全部平台能力
#[derive(Clone)]
pub struct Platform {
    pub tts: Arc<dyn TextToSpeech>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub celebration: Arc<dyn CelebrationEffect>,
}

impl Platform {
    /// 无界面实现：朗读和特效只写日志，不支持语音识别
    pub fn headless() -> Self {
        Self {
            tts: Arc::new(HeadlessTts::new()),
            recognizer: Arc::new(UnsupportedRecognizer),
            celebration: Arc::new(LoggingCelebration),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::headless()
    }
}
