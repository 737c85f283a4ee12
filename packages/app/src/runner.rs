//! Drives one [`ActivitySession`] on a single event loop.
//!
//! Learner input, timer expiry and recognition results are funnelled through
//! channels and handled one at a time, so the session never sees interleaved
//! events. Timers are spawned as abortable sleeps; whatever is still pending
//! when the session ends is aborted.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use nextoddlers_core::{
    phrase, ActivityError, ActivitySession, CompletionReport, Effect, Language, Phrase,
    SessionView, TileId, TimerToken,
};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::platform::speech::RecognitionResult;
use crate::platform::{ListenRequest, Platform, RecognitionSink, TtsConfig};
use crate::store::SharedStore;

// ========== Types ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerInput {
    SpeakAgain,
    StartListening,
    SelectTile(TileId),
    RetractTile(TileId),
    Skip,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(CompletionReport),
    Exited,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerView {
    pub session: SessionView,
    /// Blocking notice, e.g. speech capture unsupported. Cleared by the next input.
    pub notice: Option<String>,
}

pub struct RunnerHandle {
    inputs: mpsc::UnboundedSender<RunnerInput>,
    view: watch::Receiver<RunnerView>,
}

impl RunnerHandle {
    /// Returns false once the session has ended.
    pub fn send(&self, input: RunnerInput) -> bool {
        self.inputs.send(input).is_ok()
    }

    pub fn view(&self) -> RunnerView {
        self.view.borrow().clone()
    }

    /// Waits for the next published view. Returns false when the runner is gone.
    pub async fn changed(&mut self) -> bool {
        self.view.changed().await.is_ok()
    }
}

/// A running practice session: send input through `handle`, await `outcome`.
pub struct PracticeSession {
    pub handle: RunnerHandle,
    pub outcome: JoinHandle<SessionOutcome>,
}

enum LoopEvent {
    Input(Option<RunnerInput>),
    Timer(TimerToken),
    Speech(RecognitionResult),
}

// ========== Runner ==========

pub struct ActivityRunner {
    session: ActivitySession,
    store: SharedStore,
    platform: Platform,
    language: Language,
    inputs: mpsc::UnboundedReceiver<RunnerInput>,
    timer_tx: mpsc::UnboundedSender<TimerToken>,
    timer_rx: mpsc::UnboundedReceiver<TimerToken>,
    speech_tx: mpsc::UnboundedSender<RecognitionResult>,
    speech_rx: mpsc::UnboundedReceiver<RecognitionResult>,
    timers: HashMap<TimerToken, AbortHandle>,
    view_tx: watch::Sender<RunnerView>,
    notice: Option<String>,
}

impl ActivityRunner {
    /// Spawns the event loop on the current tokio runtime. `initial` are the
    /// effects returned by [`ActivitySession::start`].
    pub fn spawn(
        mut session: ActivitySession,
        initial: Vec<Effect>,
        store: SharedStore,
        platform: Platform,
    ) -> PracticeSession {
        session.set_speech_capture_supported(platform.recognizer.is_supported());
        let language = store.lock().state().language;

        let (input_tx, inputs) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(RunnerView {
            session: session.view(),
            notice: None,
        });

        let span = info_span!(
            "activity",
            session_id = %Uuid::new_v4(),
            topic = %session.topic()
        );

        let runner = Self {
            session,
            store,
            platform,
            language,
            inputs,
            timer_tx,
            timer_rx,
            speech_tx,
            speech_rx,
            timers: HashMap::new(),
            view_tx,
            notice: None,
        };

        let outcome = tokio::spawn(runner.run(initial).instrument(span));

        PracticeSession {
            handle: RunnerHandle {
                inputs: input_tx,
                view: view_rx,
            },
            outcome,
        }
    }

    async fn run(mut self, initial: Vec<Effect>) -> SessionOutcome {
        if let Some(outcome) = self.apply(initial) {
            return self.shutdown(outcome);
        }
        self.publish();

        loop {
            let event = tokio::select! {
                input = self.inputs.recv() => LoopEvent::Input(input),
                Some(token) = self.timer_rx.recv() => LoopEvent::Timer(token),
                Some(result) = self.speech_rx.recv() => LoopEvent::Speech(result),
            };

            let effects = match event {
                LoopEvent::Input(Some(input)) => self.handle_input(input),
                LoopEvent::Input(None) => {
                    debug!("runner handle dropped, abandoning session");
                    self.session.exit()
                }
                LoopEvent::Timer(token) => {
                    self.timers.remove(&token);
                    self.session.timer_fired(token)
                }
                LoopEvent::Speech(result) => self.handle_recognition(result),
            };

            if let Some(outcome) = self.apply(effects) {
                return self.shutdown(outcome);
            }
            self.publish();
        }
    }

    fn handle_input(&mut self, input: RunnerInput) -> Vec<Effect> {
        self.notice = None;
        match input {
            RunnerInput::SpeakAgain => self.session.speak_again(),
            RunnerInput::StartListening => {
                self.session
                    .set_speech_capture_supported(self.platform.recognizer.is_supported());
                match self.session.start_listening() {
                    Ok(effects) => effects,
                    Err(ActivityError::SpeechCaptureUnsupported) => {
                        warn!("speech capture unsupported on this platform");
                        self.notice =
                            Some(phrase(self.language, Phrase::SpeechUnsupported).to_string());
                        Vec::new()
                    }
                    Err(err) => {
                        debug!(error = %err, "listening request ignored");
                        Vec::new()
                    }
                }
            }
            RunnerInput::SelectTile(id) => self.session.select_tile(id),
            RunnerInput::RetractTile(id) => self.session.retract_tile(id),
            RunnerInput::Skip => self.session.skip(),
            RunnerInput::Exit => self.session.exit(),
        }
    }

    fn handle_recognition(&mut self, result: RecognitionResult) -> Vec<Effect> {
        match result.outcome {
            Ok(transcript) => self
                .session
                .transcript_received(result.handle, Some(&transcript)),
            Err(err) => {
                debug!(handle = result.handle.0, error = %err, "listening window closed without transcript");
                self.session.transcript_received(result.handle, None)
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Option<SessionOutcome> {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut outcome = None;

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Speak {
                    text,
                    rate,
                    language,
                } => {
                    self.platform.tts.cancel();
                    if let Err(err) = self.platform.tts.speak(&text, &TtsConfig { language, rate }) {
                        warn!(error = %err, "tts speak failed");
                    }
                }
                Effect::StopSpeaking => self.platform.tts.cancel(),
                Effect::StartListening { handle, language } => {
                    let sink = RecognitionSink::new(handle, self.speech_tx.clone());
                    let request = ListenRequest { handle, language };
                    if let Err(err) = self.platform.recognizer.start(request, sink) {
                        queue.extend(self.session.listening_failed(handle, &err.to_string()));
                    }
                }
                Effect::CancelListening { handle } => self.platform.recognizer.cancel(handle),
                Effect::ScheduleTimer { token, delay } => self.schedule(token, delay),
                Effect::CancelTimer { token } => {
                    if let Some(task) = self.timers.remove(&token) {
                        task.abort();
                    }
                }
                Effect::Celebrate(burst) => self.platform.celebration.celebrate(&burst),
                Effect::AwardStar { amount } => self.store.lock().add_stars(amount),
                Effect::Completed(report) => outcome = Some(SessionOutcome::Completed(report)),
                Effect::Exited => outcome = Some(SessionOutcome::Exited),
            }
        }

        outcome
    }

    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        let tx = self.timer_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(token);
        });
        self.timers.insert(token, task.abort_handle());
    }

    fn publish(&self) {
        self.view_tx.send_replace(RunnerView {
            session: self.session.view(),
            notice: self.notice.clone(),
        });
    }

    fn shutdown(mut self, outcome: SessionOutcome) -> SessionOutcome {
        for (_, task) in self.timers.drain() {
            task.abort();
        }
        self.publish();
        info!(outcome = ?outcome, "activity runner finished");
        outcome
    }
}
