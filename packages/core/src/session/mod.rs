//! 练习会话状态机
//!
//! 一个会话从头到尾驱动一个主题的条目列表。每个输入 (点击、计时器到期、
//! 语音识别回调) 都同步地修改状态并返回 [`Effect`] 列表，由驱动方执行。
//!
//! ## 状态
//!
//! - `Presenting` - 展示当前条目，等待输入
//! - `Listening` - 聆听窗口打开 (仅识别模式)
//! - `Celebrating` - 答对，等待延时进入下一条
//! - `Retrying` - 拼错，等待字母块放回银行 (仅拼写模式)
//! - `Completed` / `Exited` - 终止状态

mod effect;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use effect::{Celebration, CompletionReport, Effect, ListenHandle, TimerKind, TimerToken};

use crate::curriculum::CurriculumProvider;
use crate::error::ActivityError;
use crate::i18n::{phrase, Phrase};
use crate::matching::is_match;
use crate::tiles::{Tile, TileBoard, TileId};
use crate::topic::Topic;
use crate::types::{
    ActivityMode, Feedback, FeedbackKind, Language, LearningItem, DEFAULT_SPEECH_LANGUAGE,
    DEFAULT_TTS_RATE,
};

// ========== Options ==========

/// 各个延时。默认值以 1 秒为一个时间单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityTimings {
    pub advance: Duration,
    pub feedback_clear: Duration,
    pub tile_reset: Duration,
    pub auto_speak: Duration,
}

impl ActivityTimings {
    /// 按时间单位缩放：答对 2、清反馈 2、放回字母 1、自动朗读 0.5
    pub fn scaled(unit: Duration) -> Self {
        Self {
            advance: unit * 2,
            feedback_clear: unit * 2,
            tile_reset: unit,
            auto_speak: unit / 2,
        }
    }
}

impl Default for ActivityTimings {
    fn default() -> Self {
        Self::scaled(Duration::from_secs(1))
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub language: Language,
    pub tts_rate: f32,
    /// 朗读与识别使用的语言标签，课程内容是英文
    pub speech_language: String,
    pub speech_capture_supported: bool,
    pub timings: ActivityTimings,
    /// 固定种子时字母块顺序可复现
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            tts_rate: DEFAULT_TTS_RATE,
            speech_language: DEFAULT_SPEECH_LANGUAGE.to_string(),
            speech_capture_supported: false,
            timings: ActivityTimings::default(),
            seed: None,
        }
    }
}

// ========== State ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Presenting,
    Listening,
    Celebrating,
    Retrying,
    Completed,
    Exited,
}

/// 给界面渲染用的只读快照
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub topic: Topic,
    pub mode: ActivityMode,
    pub index: usize,
    pub total: usize,
    pub tally: u32,
    pub phase: Phase,
    pub item: LearningItem,
    pub feedback: Option<Feedback>,
    pub tiles: Vec<Tile>,
    pub answer: Vec<Tile>,
    pub listening: bool,
    pub progress: f32,
}

impl SessionView {
    /// 卡片上显示的内容：识别模式显示单词，拼写模式只显示图片，不泄露答案
    pub fn card_label(&self) -> Option<&str> {
        match self.mode {
            ActivityMode::Recognition => Some(self.item.content.as_str()),
            ActivityMode::Spelling => self.item.picture(),
        }
    }
}

pub struct ActivitySession {
    topic: Topic,
    mode: ActivityMode,
    items: Vec<LearningItem>,
    current_index: usize,
    tally: u32,
    phase: Phase,
    feedback: Option<Feedback>,
    board: Option<TileBoard>,
    listening: Option<ListenHandle>,
    pending: Vec<TimerToken>,
    next_id: u64,
    options: SessionOptions,
    rng: ChaCha8Rng,
}

impl ActivitySession {
    /// 为主题 id 创建会话并进入第一个条目。
    ///
    /// 未知的 id 或空的条目列表返回 [`ActivityError::TopicNotFound`]。
    pub fn start<C>(
        topic_id: &str,
        curriculum: &C,
        options: SessionOptions,
    ) -> Result<(Self, Vec<Effect>), ActivityError>
    where
        C: CurriculumProvider + ?Sized,
    {
        let topic = Topic::from_id(topic_id)
            .ok_or_else(|| ActivityError::TopicNotFound(topic_id.to_string()))?;
        let items = curriculum
            .lookup(topic)
            .filter(|items| !items.is_empty())
            .ok_or_else(|| ActivityError::TopicNotFound(topic_id.to_string()))?;

        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut session = Self {
            topic,
            mode: topic.mode(),
            items,
            current_index: 0,
            tally: 0,
            phase: Phase::Presenting,
            feedback: None,
            board: None,
            listening: None,
            pending: Vec::new(),
            next_id: 1,
            options,
            rng,
        };

        info!(
            topic = %session.topic,
            mode = ?session.mode,
            items = session.items.len(),
            "activity session started"
        );

        let effects = session.enter_item();
        Ok((session, effects))
    }

    // ========== Accessors ==========

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn mode(&self) -> ActivityMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_item(&self) -> &LearningItem {
        &self.items[self.current_index]
    }

    pub fn tally(&self) -> u32 {
        self.tally
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn board(&self) -> Option<&TileBoard> {
        self.board.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_some()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Completed | Phase::Exited)
    }

    pub fn pending_timers(&self) -> &[TimerToken] {
        &self.pending
    }

    /// 进度条比例：已经过的条目数 / 总数
    pub fn progress(&self) -> f32 {
        self.current_index as f32 / self.items.len() as f32
    }

    pub fn view(&self) -> SessionView {
        let (tiles, answer) = match &self.board {
            Some(board) => (
                board.tiles().to_vec(),
                board.answer().into_iter().cloned().collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        SessionView {
            topic: self.topic,
            mode: self.mode,
            index: self.current_index,
            total: self.items.len(),
            tally: self.tally,
            phase: self.phase,
            item: self.current_item().clone(),
            feedback: self.feedback.clone(),
            tiles,
            answer,
            listening: self.is_listening(),
            progress: self.progress(),
        }
    }

    /// 平台检测到语音识别能力后打开语音按钮
    pub fn set_speech_capture_supported(&mut self, supported: bool) {
        self.options.speech_capture_supported = supported;
    }

    // ========== Inputs ==========

    /// "再听一遍"，不改变状态
    pub fn speak_again(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }
        vec![self.speak_effect()]
    }

    /// 打开一次性聆听窗口 (仅识别模式)
    pub fn start_listening(&mut self) -> Result<Vec<Effect>, ActivityError> {
        if !self.is_active() {
            return Err(ActivityError::SessionFinished);
        }
        if self.mode != ActivityMode::Recognition {
            return Err(ActivityError::NotInRecognitionMode);
        }
        if !self.options.speech_capture_supported {
            return Err(ActivityError::SpeechCaptureUnsupported);
        }
        if self.listening.is_some() {
            return Err(ActivityError::AlreadyListening);
        }
        if self.phase == Phase::Celebrating {
            return Ok(Vec::new());
        }

        let handle = ListenHandle(self.next_id());
        self.listening = Some(handle);
        self.phase = Phase::Listening;
        self.feedback = Some(Feedback::new(
            phrase(self.options.language, Phrase::TapToSpeak),
            FeedbackKind::Neutral,
        ));

        // 上一次答错的清除计时器会把提示提前抹掉
        let mut effects = self.cancel_timers(TimerKind::ClearFeedback);
        effects.push(Effect::StartListening {
            handle,
            language: self.options.speech_language.clone(),
        });
        debug!(topic = %self.topic, index = self.current_index, handle = handle.0, "listening window opened");
        Ok(effects)
    }

    /// 平台无法打开聆听窗口 (例如麦克风权限被拒绝)
    pub fn listening_failed(&mut self, handle: ListenHandle, reason: &str) -> Vec<Effect> {
        if self.listening != Some(handle) {
            return Vec::new();
        }
        warn!(topic = %self.topic, handle = handle.0, reason, "speech capture failed to start");
        self.listening = None;
        self.phase = Phase::Presenting;
        self.feedback = None;
        Vec::new()
    }

    /// 聆听窗口结束。`None` 表示没有识别结果 (出错或超时)
    pub fn transcript_received(
        &mut self,
        handle: ListenHandle,
        transcript: Option<&str>,
    ) -> Vec<Effect> {
        if !self.is_active() || self.listening != Some(handle) {
            debug!(handle = handle.0, "stale transcript ignored");
            return Vec::new();
        }
        self.listening = None;
        self.phase = Phase::Presenting;

        match transcript {
            None => {
                self.feedback = None;
                Vec::new()
            }
            Some(spoken) => {
                if is_match(&self.current_item().content, spoken) {
                    self.succeed()
                } else {
                    debug!(topic = %self.topic, index = self.current_index, spoken, "spoken answer did not match");
                    self.miss()
                }
            }
        }
    }

    /// 从银行选择字母块；答案填满时检查对错
    pub fn select_tile(&mut self, id: TileId) -> Vec<Effect> {
        if self.phase != Phase::Presenting {
            return Vec::new();
        }
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        if !board.place(id) || !board.is_full() {
            return Vec::new();
        }

        if board.is_correct() {
            self.succeed()
        } else {
            debug!(topic = %self.topic, attempt = %board.answer_text(), "spelling mismatch");
            self.miss_spelling()
        }
    }

    /// 从答案区任意位置取回字母块
    pub fn retract_tile(&mut self, id: TileId) -> Vec<Effect> {
        if self.phase != Phase::Presenting {
            return Vec::new();
        }
        if let Some(board) = self.board.as_mut() {
            board.retract(id);
        }
        Vec::new()
    }

    /// 手动进入下一条，不加星
    pub fn skip(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }
        debug!(topic = %self.topic, index = self.current_index, "item skipped");
        self.advance()
    }

    pub fn timer_fired(&mut self, token: TimerToken) -> Vec<Effect> {
        let Some(pos) = self.pending.iter().position(|pending| *pending == token) else {
            debug!(timer = token.id, kind = ?token.kind, "stale timer ignored");
            return Vec::new();
        };
        self.pending.remove(pos);

        match token.kind {
            TimerKind::Advance => self.advance(),
            TimerKind::ClearFeedback => {
                self.feedback = None;
                Vec::new()
            }
            TimerKind::ResetTiles => {
                if let Some(board) = self.board.as_mut() {
                    board.reset();
                }
                self.phase = Phase::Presenting;
                Vec::new()
            }
            TimerKind::AutoSpeak => vec![self.speak_effect()],
        }
    }

    /// 中途退出：丢弃会话，不上报成绩
    pub fn exit(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut effects = self.leave_item();
        effects.push(Effect::StopSpeaking);
        self.phase = Phase::Exited;
        info!(topic = %self.topic, index = self.current_index, "activity session exited");
        effects.push(Effect::Exited);
        effects
    }

    // ========== Transitions ==========

    fn enter_item(&mut self) -> Vec<Effect> {
        self.feedback = None;
        match self.mode {
            ActivityMode::Recognition => vec![self.speak_effect()],
            ActivityMode::Spelling => {
                let content = self.current_item().content.clone();
                self.board = Some(TileBoard::shuffled(&content, &mut self.rng));
                let delay = self.options.timings.auto_speak;
                vec![self.schedule(TimerKind::AutoSpeak, delay)]
            }
        }
    }

    /// 条目作用域的清理：计时器、聆听窗口、反馈、字母块
    fn leave_item(&mut self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .pending
            .drain(..)
            .map(|token| Effect::CancelTimer { token })
            .collect();
        if let Some(handle) = self.listening.take() {
            effects.push(Effect::CancelListening { handle });
        }
        self.feedback = None;
        self.board = None;
        effects
    }

    fn advance(&mut self) -> Vec<Effect> {
        let mut effects = self.leave_item();
        if self.current_index + 1 < self.items.len() {
            self.current_index += 1;
            self.phase = Phase::Presenting;
            effects.extend(self.enter_item());
        } else {
            effects.extend(self.finish());
        }
        effects
    }

    fn finish(&mut self) -> Vec<Effect> {
        self.phase = Phase::Completed;
        let report = CompletionReport {
            topic: self.topic,
            stars: self.tally,
        };
        info!(topic = %self.topic, stars = self.tally, "activity session completed");
        vec![
            Effect::Celebrate(Celebration::finale()),
            Effect::Completed(report),
        ]
    }

    fn succeed(&mut self) -> Vec<Effect> {
        self.tally += 1;
        self.phase = Phase::Celebrating;
        self.feedback = Some(Feedback::new(
            phrase(self.options.language, Phrase::GoodJob),
            FeedbackKind::Success,
        ));
        info!(topic = %self.topic, index = self.current_index, tally = self.tally, "item resolved");

        let mut effects = self.cancel_timers(TimerKind::ClearFeedback);
        effects.push(Effect::AwardStar { amount: 1 });
        effects.push(Effect::Celebrate(Celebration::pulse()));
        let delay = self.options.timings.advance;
        effects.push(self.schedule(TimerKind::Advance, delay));
        effects
    }

    fn miss(&mut self) -> Vec<Effect> {
        self.feedback = Some(Feedback::new(
            phrase(self.options.language, Phrase::TryAgain),
            FeedbackKind::Failure,
        ));
        let mut effects = self.cancel_timers(TimerKind::ClearFeedback);
        let delay = self.options.timings.feedback_clear;
        effects.push(self.schedule(TimerKind::ClearFeedback, delay));
        effects
    }

    fn miss_spelling(&mut self) -> Vec<Effect> {
        let mut effects = self.miss();
        self.phase = Phase::Retrying;
        let delay = self.options.timings.tile_reset;
        effects.push(self.schedule(TimerKind::ResetTiles, delay));
        effects
    }

    // ========== Helpers ==========

    fn speak_effect(&self) -> Effect {
        let item = self.current_item();
        let text = match (self.mode, item.example.as_deref()) {
            (ActivityMode::Recognition, Some(example)) => format!("{}. {}", item.content, example),
            _ => item.content.clone(),
        };
        Effect::Speak {
            text,
            rate: self.options.tts_rate,
            language: self.options.speech_language.clone(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> Effect {
        let token = TimerToken {
            id: self.next_id(),
            kind,
        };
        self.pending.push(token);
        Effect::ScheduleTimer { token, delay }
    }

    fn cancel_timers(&mut self, kind: TimerKind) -> Vec<Effect> {
        let (cancelled, kept): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|token| token.kind == kind);
        self.pending = kept;
        cancelled
            .into_iter()
            .map(|token| Effect::CancelTimer { token })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::BuiltinCurriculum;

    fn numbers_curriculum() -> BuiltinCurriculum {
        BuiltinCurriculum::empty()
            .with_topic(
                Topic::Numbers,
                vec![
                    LearningItem::new("1"),
                    LearningItem::new("2"),
                    LearningItem::new("3"),
                ],
            )
            .with_topic(
                Topic::Spelling,
                vec![
                    LearningItem::with_example("cat", "Meow 🐱"),
                    LearningItem::with_example("dog", "Woof 🐶"),
                ],
            )
            .with_topic(Topic::Colors, vec![])
    }

    fn options() -> SessionOptions {
        SessionOptions {
            speech_capture_supported: true,
            seed: Some(42),
            ..Default::default()
        }
    }

    fn start(topic: &str) -> ActivitySession {
        let (session, _) = ActivitySession::start(topic, &numbers_curriculum(), options())
            .expect("session should start");
        session
    }

    fn scheduled(effects: &[Effect], kind: TimerKind) -> TimerToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::ScheduleTimer { token, .. } if token.kind == kind => Some(*token),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no {kind:?} timer in {effects:?}"))
    }

    fn listen_handle(effects: &[Effect]) -> ListenHandle {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::StartListening { handle, .. } => Some(*handle),
                _ => None,
            })
            .expect("listening should start")
    }

    fn say(session: &mut ActivitySession, words: &str) -> Vec<Effect> {
        let effects = session.start_listening().expect("listening allowed");
        session.transcript_received(listen_handle(&effects), Some(words))
    }

    fn spell(session: &mut ActivitySession, word: &str) -> Vec<Effect> {
        let mut effects = Vec::new();
        for ch in word.to_uppercase().chars() {
            let id = session
                .board()
                .and_then(|board| board.available().find(|tile| tile.ch == ch).map(|t| t.id))
                .expect("letter available");
            effects = session.select_tile(id);
        }
        effects
    }

    #[test]
    fn test_unknown_topic_is_not_found() {
        let result = ActivitySession::start("dinosaurs", &numbers_curriculum(), options());
        assert_eq!(
            result.err(),
            Some(ActivityError::TopicNotFound("dinosaurs".to_string()))
        );
    }

    #[test]
    fn test_empty_or_missing_topic_is_not_found() {
        let curriculum = numbers_curriculum();
        assert!(matches!(
            ActivitySession::start("colors", &curriculum, options()),
            Err(ActivityError::TopicNotFound(_))
        ));
        assert!(matches!(
            ActivitySession::start("food", &curriculum, options()),
            Err(ActivityError::TopicNotFound(_))
        ));
    }

    #[test]
    fn test_recognition_speaks_content_with_example() {
        let curriculum = BuiltinCurriculum::empty()
            .with_topic(Topic::Food, vec![LearningItem::with_example("apple", "🍎")]);
        let (session, effects) = ActivitySession::start("food", &curriculum, options()).unwrap();
        assert_eq!(session.mode(), ActivityMode::Recognition);
        assert_eq!(
            effects,
            vec![Effect::Speak {
                text: "apple. 🍎".to_string(),
                rate: DEFAULT_TTS_RATE,
                language: "en-US".to_string(),
            }]
        );
    }

    #[test]
    fn test_matching_every_item_completes_with_full_tally() {
        let mut session = start("numbers");
        let mut stars = 0;

        for word in ["1", "2", "3"] {
            let effects = say(&mut session, word);
            stars += effects
                .iter()
                .filter(|e| matches!(e, Effect::AwardStar { amount: 1 }))
                .count();
            assert_eq!(session.phase(), Phase::Celebrating);

            let advance = scheduled(&effects, TimerKind::Advance);
            let effects = session.timer_fired(advance);
            if word == "3" {
                assert!(effects.contains(&Effect::Completed(CompletionReport {
                    topic: Topic::Numbers,
                    stars: 3,
                })));
            }
        }

        assert_eq!(stars, 3);
        assert_eq!(session.tally(), 3);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_mismatch_stays_and_clears_feedback() {
        let mut session = start("numbers");
        let effects = say(&mut session, "banana");

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.tally(), 0);
        assert_eq!(session.feedback().map(|f| f.kind), Some(FeedbackKind::Failure));
        assert!(!effects.iter().any(|e| matches!(e, Effect::AwardStar { .. })));

        let clear = scheduled(&effects, TimerKind::ClearFeedback);
        assert!(session.timer_fired(clear).is_empty());
        assert_eq!(session.feedback(), None);
        assert_eq!(session.phase(), Phase::Presenting);
    }

    #[test]
    fn test_retry_after_mismatch_cancels_stale_clear() {
        let mut session = start("numbers");
        let effects = say(&mut session, "nope");
        let clear = scheduled(&effects, TimerKind::ClearFeedback);

        let effects = say(&mut session, "one 1");
        assert!(effects.contains(&Effect::AwardStar { amount: 1 }));
        assert_eq!(session.tally(), 1);
        assert!(session.timer_fired(clear).is_empty());
        assert_eq!(session.feedback().map(|f| f.kind), Some(FeedbackKind::Success));
    }

    #[test]
    fn test_second_listening_window_is_refused() {
        let mut session = start("numbers");
        session.start_listening().unwrap();
        assert!(session.is_listening());
        assert_eq!(session.start_listening(), Err(ActivityError::AlreadyListening));
    }

    #[test]
    fn test_unsupported_capture_is_reported() {
        let (mut session, _) = ActivitySession::start(
            "numbers",
            &numbers_curriculum(),
            SessionOptions {
                speech_capture_supported: false,
                ..options()
            },
        )
        .unwrap();
        assert_eq!(
            session.start_listening(),
            Err(ActivityError::SpeechCaptureUnsupported)
        );
        session.set_speech_capture_supported(true);
        assert!(session.start_listening().is_ok());
    }

    #[test]
    fn test_listening_failure_returns_to_idle() {
        let mut session = start("numbers");
        let handle = listen_handle(&session.start_listening().unwrap());
        session.listening_failed(handle, "permission denied");
        assert!(!session.is_listening());
        assert_eq!(session.phase(), Phase::Presenting);
        assert!(session.start_listening().is_ok());
    }

    #[test]
    fn test_window_without_transcript_gives_no_feedback() {
        let mut session = start("numbers");
        let handle = listen_handle(&session.start_listening().unwrap());
        assert!(session.transcript_received(handle, None).is_empty());
        assert_eq!(session.feedback(), None);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_skip_cancels_pending_advance() {
        let mut session = start("numbers");
        let effects = say(&mut session, "1");
        let advance = scheduled(&effects, TimerKind::Advance);

        let effects = session.skip();
        assert!(effects.contains(&Effect::CancelTimer { token: advance }));
        assert_eq!(session.current_index(), 1);

        assert!(session.timer_fired(advance).is_empty());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.tally(), 1);
    }

    #[test]
    fn test_skip_on_last_item_completes_without_reward() {
        let mut session = start("numbers");
        session.skip();
        session.skip();
        let effects = session.skip();
        assert!(!effects.iter().any(|e| matches!(e, Effect::AwardStar { .. })));
        assert!(effects.contains(&Effect::Completed(CompletionReport {
            topic: Topic::Numbers,
            stars: 0,
        })));
        assert!(session.skip().is_empty());
    }

    #[test]
    fn test_skip_while_listening_closes_window() {
        let mut session = start("numbers");
        let handle = listen_handle(&session.start_listening().unwrap());
        let effects = session.skip();
        assert!(effects.contains(&Effect::CancelListening { handle }));

        assert!(session.transcript_received(handle, Some("2")).is_empty());
        assert_eq!(session.tally(), 0);
    }

    #[test]
    fn test_exit_discards_session_and_ignores_late_callbacks() {
        let mut session = start("numbers");
        let handle = listen_handle(&session.start_listening().unwrap());

        let effects = session.exit();
        assert_eq!(
            effects,
            vec![
                Effect::CancelListening { handle },
                Effect::StopSpeaking,
                Effect::Exited
            ]
        );
        assert!(session.transcript_received(handle, Some("1")).is_empty());
        assert_eq!(session.tally(), 0);
        assert!(session.exit().is_empty());
        assert_eq!(session.start_listening(), Err(ActivityError::SessionFinished));
    }

    #[test]
    fn test_exit_cancels_pending_timers() {
        let mut session = start("numbers");
        let effects = say(&mut session, "1");
        let advance = scheduled(&effects, TimerKind::Advance);

        let effects = session.exit();
        assert!(effects.contains(&Effect::CancelTimer { token: advance }));
        assert!(session.pending_timers().is_empty());
        assert!(session.timer_fired(advance).is_empty());
        assert_eq!(session.phase(), Phase::Exited);
    }

    #[test]
    fn test_spelling_entry_builds_tiles_and_schedules_speech() {
        let (session, effects) =
            ActivitySession::start("spelling", &numbers_curriculum(), options()).unwrap();
        assert_eq!(session.mode(), ActivityMode::Spelling);

        let board = session.board().expect("tiles generated");
        assert_eq!(board.target(), "CAT");
        assert!(board.preserves_letters());

        let token = scheduled(&effects, TimerKind::AutoSpeak);
        assert!(matches!(
            effects.as_slice(),
            [Effect::ScheduleTimer { delay, .. }] if *delay == Duration::from_millis(500)
        ));

        let mut session = session;
        assert_eq!(
            session.timer_fired(token),
            vec![Effect::Speak {
                text: "cat".to_string(),
                rate: DEFAULT_TTS_RATE,
                language: "en-US".to_string(),
            }]
        );
    }

    #[test]
    fn test_spelling_has_no_voice_capture() {
        let mut session = start("spelling");
        assert_eq!(
            session.start_listening(),
            Err(ActivityError::NotInRecognitionMode)
        );
    }

    #[test]
    fn test_wrong_spelling_resets_tiles_after_delay() {
        let mut session = start("spelling");
        let effects = spell(&mut session, "cta");

        assert_eq!(session.feedback().map(|f| f.kind), Some(FeedbackKind::Failure));
        assert_eq!(session.phase(), Phase::Retrying);
        assert!(session.board().unwrap().preserves_letters());

        let reset = scheduled(&effects, TimerKind::ResetTiles);
        assert!(matches!(
            effects.iter().find(|e| matches!(e, Effect::ScheduleTimer { token, .. } if *token == reset)),
            Some(Effect::ScheduleTimer { delay, .. }) if *delay == Duration::from_secs(1)
        ));
        session.timer_fired(reset);

        let board = session.board().unwrap();
        assert_eq!(board.available().count(), 3);
        assert!(board.answer().is_empty());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.tally(), 0);
        assert_eq!(session.phase(), Phase::Presenting);
    }

    #[test]
    fn test_tiles_are_locked_while_resetting() {
        let mut session = start("spelling");
        spell(&mut session, "tac");
        let placed = session.board().unwrap().answer()[0].id;

        assert!(session.retract_tile(placed).is_empty());
        assert_eq!(session.board().unwrap().answer().len(), 3);
    }

    #[test]
    fn test_correct_spelling_rewards_and_advances() {
        let mut session = start("spelling");
        let effects = spell(&mut session, "cat");
        assert!(effects.contains(&Effect::AwardStar { amount: 1 }));
        assert_eq!(session.tally(), 1);

        session.timer_fired(scheduled(&effects, TimerKind::Advance));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.board().unwrap().target(), "DOG");
    }

    #[test]
    fn test_retract_then_finish_spelling() {
        let mut session = start("spelling");
        spell(&mut session, "ct");
        let t_id = session.board().unwrap().answer()[1].id;
        session.retract_tile(t_id);
        assert_eq!(session.board().unwrap().answer_text(), "C");

        let effects = spell(&mut session, "at");
        assert!(effects.contains(&Effect::AwardStar { amount: 1 }));
    }

    #[test]
    fn test_view_reflects_state() {
        let mut session = start("numbers");
        session.skip();
        let view = session.view();
        assert_eq!(view.index, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.item.content, "2");
        assert!((view.progress - 1.0 / 3.0).abs() < f32::EPSILON);
        assert!(view.tiles.is_empty());
        assert_eq!(view.card_label(), Some("2"));
    }

    #[test]
    fn test_spelling_card_shows_picture_only() {
        let view = start("spelling").view();
        assert_eq!(view.card_label(), Some("🐱"));

        let curriculum = BuiltinCurriculum::empty()
            .with_topic(Topic::Spelling, vec![LearningItem::new("sun")]);
        let (session, _) = ActivitySession::start("spelling", &curriculum, options()).unwrap();
        assert_eq!(session.view().card_label(), None);
    }
}
