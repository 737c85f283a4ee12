use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// 计时器用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// 答对后延时进入下一条
    Advance,
    /// 清除答错的反馈
    ClearFeedback,
    /// 拼错后把字母块放回银行
    ResetTiles,
    /// 拼写模式进入条目后自动朗读
    AutoSpeak,
}

/// 计时器身份。会话只认自己仍挂着的令牌，过期令牌触发时什么也不做
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub id: u64,
    pub kind: TimerKind,
}

/// 一次性聆听窗口的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenHandle(pub u64);

/// 彩纸特效参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Celebration {
    pub particle_count: u32,
    pub spread: u32,
    pub origin_y: f32,
    pub colors: Vec<String>,
}

impl Celebration {
    /// 答对一条时的小庆祝
    pub fn pulse() -> Self {
        Self {
            particle_count: 100,
            spread: 70,
            origin_y: 0.6,
            colors: vec![
                "#84CC16".to_string(),
                "#FFB799".to_string(),
                "#FFFDF5".to_string(),
            ],
        }
    }

    /// 整个主题完成时的大庆祝，使用默认配色
    pub fn finale() -> Self {
        Self {
            particle_count: 200,
            spread: 100,
            origin_y: 0.6,
            colors: Vec::new(),
        }
    }
}

/// 会话结束时交给调用方的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub topic: Topic,
    pub stars: u32,
}

/// 会话要求外部执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// 朗读文本；新的朗读会取代正在播放的
    Speak {
        text: String,
        rate: f32,
        language: String,
    },
    StopSpeaking,
    StartListening {
        handle: ListenHandle,
        language: String,
    },
    CancelListening {
        handle: ListenHandle,
    },
    ScheduleTimer {
        token: TimerToken,
        delay: Duration,
    },
    CancelTimer {
        token: TimerToken,
    },
    Celebrate(Celebration),
    /// 全局星星计数 +amount
    AwardStar {
        amount: u32,
    },
    Completed(CompletionReport),
    Exited,
}
