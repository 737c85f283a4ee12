//! # nextoddlers-core - 幼儿词汇练习核心库
//!
//! 本 crate 提供纯 Rust 实现的练习会话逻辑，不做任何 I/O:
//!
//! - **Activity Session** - 单个主题的练习状态机 (闪卡 / 跟读 / 拼写)
//! - **Tile Board** - 拼写模式的字母块银行与答案区
//! - **Matching** - 语音识别结果的宽松匹配规则
//! - **Curriculum / Registry** - 只读课程数据与班级码表
//!
//! ## 设计理念
//!
//! - **纯逻辑** - 会话的每次输入只返回 [`Effect`] 列表，由外部驱动执行
//! - **可确定** - 随机打乱使用可播种的 ChaCha RNG，测试可重放
//! - **计时器有身份** - 每个延时动作都带 [`TimerToken`]，过期的令牌会被忽略
//!
//! ## 模块结构
//!
//! - [`session`] - 练习会话状态机与副作用类型
//! - [`tiles`] - 拼写字母块
//! - [`matching`] - 语音匹配规则
//! - [`topic`] - 主题与分类的封闭枚举
//! - [`curriculum`] - 课程数据提供者
//! - [`registry`] - 班级码注册表
//! - [`i18n`] - 反馈文案
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use nextoddlers_core::{ActivitySession, BuiltinCurriculum, Effect, SessionOptions};
//!
//! let curriculum = BuiltinCurriculum::new();
//! let (mut session, effects) =
//!     ActivitySession::start("colors", &curriculum, SessionOptions::default()).unwrap();
//! assert!(effects.iter().any(|e| matches!(e, Effect::Speak { .. })));
//!
//! let effects = session.skip();
//! assert_eq!(session.current_index(), 1);
//! assert!(!effects.iter().any(|e| matches!(e, Effect::AwardStar { .. })));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod curriculum;
pub mod error;
pub mod i18n;
pub mod matching;
pub mod registry;
pub mod session;
pub mod tiles;
pub mod topic;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

pub use curriculum::{BuiltinCurriculum, CurriculumProvider};
pub use error::{ActivityError, UnknownLanguage};
pub use i18n::{phrase, Phrase};
pub use matching::{is_match, normalize};
pub use registry::{ClassroomRegistry, StaticClassroomRegistry};
pub use session::{
    ActivitySession, ActivityTimings, Celebration, CompletionReport, Effect, ListenHandle, Phase,
    SessionOptions, SessionView, TimerKind, TimerToken,
};
pub use tiles::{Tile, TileBoard, TileId};
pub use topic::{CategoryGroup, Topic};
pub use types::*;
