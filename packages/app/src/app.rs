//! Application facade: wires the store, registry, curriculum and platform
//! together and keeps the navigation shell in step with them.

use std::sync::Arc;

use nextoddlers_core::{
    phrase, ActivityError, ActivitySession, BuiltinCurriculum, CategoryGroup, ClassroomRegistry,
    CurriculumProvider, Feedback, FeedbackKind, Language, Phrase, SessionOptions, StaticClassroomRegistry,
};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::platform::Platform;
use crate::runner::{ActivityRunner, PracticeSession, SessionOutcome};
use crate::shell::{Route, Shell};
use crate::storage::{StorageError, SqliteStore};
use crate::store::{LoginError, SessionStore, SharedStore, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PracticeError {
    #[error("login required")]
    LoginRequired,
    #[error("no finished topic to replay")]
    NothingToReplay,
    #[error(transparent)]
    Activity(#[from] ActivityError),
}

pub struct App {
    config: AppConfig,
    store: SharedStore,
    registry: Arc<dyn ClassroomRegistry>,
    curriculum: Arc<dyn CurriculumProvider>,
    platform: Platform,
    shell: Shell,
    login_error: Option<(Feedback, Instant)>,
}

impl App {
    /// Opens the database at `config.db_path` and restores the persisted store.
    pub fn bootstrap(config: AppConfig, platform: Platform) -> Result<Self, AppError> {
        let backend = SqliteStore::open(&config.db_path)?;
        let store = SessionStore::load(Box::new(backend))?;

        let mut registry = StaticClassroomRegistry::builtin();
        registry.extend(&config.extra_classroom_codes);

        info!(
            db_path = %config.db_path.display(),
            classroom_codes = registry.len(),
            "app bootstrapped"
        );

        Ok(Self::with_parts(
            config,
            store,
            Arc::new(registry),
            Arc::new(BuiltinCurriculum::new()),
            platform,
        ))
    }

    pub fn with_parts(
        config: AppConfig,
        store: SessionStore,
        registry: Arc<dyn ClassroomRegistry>,
        curriculum: Arc<dyn CurriculumProvider>,
        platform: Platform,
    ) -> Self {
        let shell = Shell::new(store.is_authenticated());
        Self {
            config,
            store: store.into_shared(),
            registry,
            curriculum,
            platform,
            shell,
            login_error: None,
        }
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn route(&self) -> &Route {
        self.shell.route()
    }

    pub fn navigate(&mut self, target: Route) -> &Route {
        let authenticated = self.store.lock().is_authenticated();
        self.shell.navigate(target, authenticated)
    }

    pub fn login(&mut self, code: &str, nickname: &str) -> Result<(), LoginError> {
        let result = self.store.lock().login(self.registry.as_ref(), code, nickname);
        match result {
            Ok(()) => {
                self.login_error = None;
                self.navigate(Route::Dashboard);
                Ok(())
            }
            Err(err) => {
                let language = self.store.lock().state().language;
                let message = phrase(language, Phrase::InvalidCode);
                self.login_error = Some((
                    Feedback::new(message, FeedbackKind::Failure),
                    Instant::now(),
                ));
                Err(err)
            }
        }
    }

    /// The invalid-code message, while it is still on screen.
    pub fn login_error(&self) -> Option<&Feedback> {
        let window = self.config.time_unit * 2;
        self.login_error
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < window)
            .map(|(feedback, _)| feedback)
    }

    pub fn logout(&mut self) -> &Route {
        self.store.lock().logout();
        self.navigate(Route::Login)
    }

    pub fn open_category(&mut self, group: CategoryGroup) -> &Route {
        self.navigate(Route::Category { group })
    }

    pub fn go_home(&mut self) -> &Route {
        self.navigate(Route::Dashboard)
    }

    /// Feedback language for sessions started from now on.
    pub fn set_language(&self, language: Language) {
        info!(language = language.as_str(), "language changed");
        self.store.lock().set_language(language);
    }

    pub fn set_session_duration(&self, minutes: u32) {
        self.store.lock().set_session_duration(minutes);
    }

    pub fn set_tts_rate(&self, rate: f32) {
        self.store.lock().set_tts_rate(rate);
    }

    /// Starts a practice session on the current tokio runtime.
    pub fn start_practice(&mut self, topic_id: &str) -> Result<PracticeSession, PracticeError> {
        let route = self.navigate(Route::Practice {
            topic: topic_id.to_string(),
        });
        if route == &Route::Login {
            return Err(PracticeError::LoginRequired);
        }

        let options = {
            let store = self.store.lock();
            let state = store.state();
            SessionOptions {
                language: state.language,
                tts_rate: state.tts_rate,
                speech_language: self.config.speech_language.clone(),
                speech_capture_supported: self.platform.recognizer.is_supported(),
                timings: self.config.timings(),
                seed: None,
            }
        };

        match ActivitySession::start(topic_id, self.curriculum.as_ref(), options) {
            Ok((session, effects)) => Ok(ActivityRunner::spawn(
                session,
                effects,
                self.store(),
                self.platform.clone(),
            )),
            Err(err) => {
                warn!(topic = topic_id, error = %err, "practice could not start");
                if matches!(err, ActivityError::TopicNotFound(_)) {
                    self.navigate(Route::TopicNotFound {
                        topic: topic_id.to_string(),
                    });
                }
                Err(err.into())
            }
        }
    }

    pub fn finish_practice(&mut self, outcome: SessionOutcome) -> &Route {
        match outcome {
            SessionOutcome::Completed(report) => self.navigate(Route::Complete {
                stars: report.stars,
                topic: report.topic.id().to_string(),
            }),
            SessionOutcome::Exited => self.navigate(Route::Dashboard),
        }
    }

    /// From the completion screen, restarts the same topic with a fresh tally.
    pub fn play_again(&mut self) -> Result<PracticeSession, PracticeError> {
        let topic = match self.shell.route() {
            Route::Complete { topic, .. } if !topic.is_empty() => topic.clone(),
            _ => return Err(PracticeError::NothingToReplay),
        };
        self.start_practice(&topic)
    }
}
