#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nextoddlers_app::platform::{
    CelebrationEffect, ListenRequest, RecognitionError, RecognitionSink, SpeechRecognizer,
    TextToSpeech, TtsConfig, TtsError,
};
use nextoddlers_app::{App, AppConfig, MemoryStore, Platform, SessionStore};
use nextoddlers_core::{
    BuiltinCurriculum, Celebration, LearningItem, ListenHandle, StaticClassroomRegistry, Topic,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Hands every opened listening window to the test.
pub struct ScriptedRecognizer {
    sinks: mpsc::UnboundedSender<RecognitionSink>,
    pub supported: AtomicBool,
    pub refuse_start: AtomicBool,
    pub cancelled: Mutex<Vec<ListenHandle>>,
}

impl ScriptedRecognizer {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<RecognitionSink>) {
        let (sinks, rx) = mpsc::unbounded_channel();
        let recognizer = Arc::new(Self {
            sinks,
            supported: AtomicBool::new(true),
            refuse_start: AtomicBool::new(false),
            cancelled: Mutex::new(Vec::new()),
        });
        (recognizer, rx)
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    fn start(&self, _request: ListenRequest, sink: RecognitionSink) -> Result<(), RecognitionError> {
        if self.refuse_start.load(Ordering::SeqCst) {
            return Err(RecognitionError::PermissionDenied);
        }
        let _ = self.sinks.send(sink);
        Ok(())
    }

    fn cancel(&self, handle: ListenHandle) {
        self.cancelled.lock().push(handle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TtsEvent {
    Speak { text: String, rate: f32 },
    Cancel,
}

#[derive(Default)]
pub struct RecordingTts {
    pub spoken: Mutex<Vec<String>>,
    pub cancels: AtomicUsize,
    /// Speak and cancel calls in the order they reached the engine.
    pub events: Mutex<Vec<TtsEvent>>,
}

impl TextToSpeech for RecordingTts {
    fn speak(&self, text: &str, config: &TtsConfig) -> Result<(), TtsError> {
        self.spoken.lock().push(text.to_string());
        self.events.lock().push(TtsEvent::Speak {
            text: text.to_string(),
            rate: config.rate,
        });
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.events.lock().push(TtsEvent::Cancel);
    }
}

#[derive(Default)]
pub struct RecordingCelebration {
    pub bursts: Mutex<Vec<Celebration>>,
}

impl CelebrationEffect for RecordingCelebration {
    fn celebrate(&self, burst: &Celebration) {
        self.bursts.lock().push(burst.clone());
    }
}

pub struct Harness {
    pub app: App,
    pub recognizer: Arc<ScriptedRecognizer>,
    pub sinks: mpsc::UnboundedReceiver<RecognitionSink>,
    pub tts: Arc<RecordingTts>,
    pub celebration: Arc<RecordingCelebration>,
}

pub fn test_curriculum() -> BuiltinCurriculum {
    BuiltinCurriculum::empty()
        .with_topic(
            Topic::Numbers,
            vec![
                LearningItem::new("1"),
                LearningItem::new("2"),
                LearningItem::new("3"),
            ],
        )
        .with_topic(Topic::Spelling, vec![LearningItem::new("cat")])
        .with_topic(
            Topic::Colors,
            vec![
                LearningItem::with_example("red", "A red apple"),
                LearningItem::with_example("blue", "The blue sky"),
            ],
        )
}

pub fn harness() -> Harness {
    let (recognizer, sinks) = ScriptedRecognizer::new();
    let tts = Arc::new(RecordingTts::default());
    let celebration = Arc::new(RecordingCelebration::default());

    let platform = Platform {
        tts: tts.clone(),
        recognizer: recognizer.clone(),
        celebration: celebration.clone(),
    };

    let store = SessionStore::load(Box::new(MemoryStore::new())).unwrap();
    let app = App::with_parts(
        AppConfig::default(),
        store,
        Arc::new(StaticClassroomRegistry::builtin()),
        Arc::new(test_curriculum()),
        platform,
    );

    Harness {
        app,
        recognizer,
        sinks,
        tts,
        celebration,
    }
}

pub fn logged_in_harness() -> Harness {
    let mut harness = harness();
    harness.app.login("LUM123", "Alice").unwrap();
    harness
}

/// Lets the runner drain its queue without advancing past any scheduled timer.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
