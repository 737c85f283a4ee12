// 语音识别平台模块
//
// 一次性、非连续的聆听窗口：每个窗口最多产生一个识别结果。
// 结果通过 RecognitionSink 异步送回会话的事件循环。

use nextoddlers_core::ListenHandle;
use thiserror::Error;
use tokio::sync::mpsc;

/// 聆听请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenRequest {
    pub handle: ListenHandle,
    /// 识别语言 (如 "en-US")
    pub language: String,
}

/// 语音识别错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("speech recognition is not supported on this platform")]
    NotSupported,
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("recognition failed to start: {0}")]
    StartFailed(String),
    #[error("no speech detected")]
    NoSpeech,
    #[error("recognition aborted")]
    Aborted,
}

/// 识别结果，带上所属窗口的句柄
#[derive(Debug)]
pub(crate) struct RecognitionResult {
    pub handle: ListenHandle,
    pub outcome: Result<String, RecognitionError>,
}

/// 一次性回传通道。未投递就被丢弃时自动回传 `Aborted`，保证窗口一定会结束
pub struct RecognitionSink {
    handle: ListenHandle,
    tx: Option<mpsc::UnboundedSender<RecognitionResult>>,
}

impl RecognitionSink {
    pub(crate) fn new(handle: ListenHandle, tx: mpsc::UnboundedSender<RecognitionResult>) -> Self {
        Self {
            handle,
            tx: Some(tx),
        }
    }

    pub fn handle(&self) -> ListenHandle {
        self.handle
    }

    /// 投递识别结果
    pub fn deliver(mut self, outcome: Result<String, RecognitionError>) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: Result<String, RecognitionError>) {
        if let Some(tx) = self.tx.take() {
            // 会话已经结束时接收端不存在，直接丢弃
            let _ = tx.send(RecognitionResult {
                handle: self.handle,
                outcome,
            });
        }
    }
}

impl Drop for RecognitionSink {
    fn drop(&mut self) {
        self.send(Err(RecognitionError::Aborted));
    }
}

impl std::fmt::Debug for RecognitionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionSink")
            .field("handle", &self.handle)
            .field("delivered", &self.tx.is_none())
            .finish()
    }
}

/// 语音识别能力
pub trait SpeechRecognizer: Send + Sync {
    /// 使用前必须检查
    fn is_supported(&self) -> bool;

    /// 打开聆听窗口。返回错误表示窗口根本没有打开 (例如麦克风权限被拒绝)
    fn start(&self, request: ListenRequest, sink: RecognitionSink) -> Result<(), RecognitionError>;

    /// 关闭窗口；之后对应的结果会被会话忽略
    fn cancel(&self, handle: ListenHandle);
}

/// 不支持语音识别的平台
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self, _request: ListenRequest, _sink: RecognitionSink) -> Result<(), RecognitionError> {
        Err(RecognitionError::NotSupported)
    }

    fn cancel(&self, _handle: ListenHandle) {}
}
