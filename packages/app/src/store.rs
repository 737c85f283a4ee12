use std::sync::Arc;

use nextoddlers_core::registry::normalize_code;
use nextoddlers_core::{
    ClassroomRegistry, Language, DEFAULT_SESSION_MINUTES, DEFAULT_TTS_RATE, PLACEHOLDER_NICKNAME,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::{KeyValueStore, StorageError};

// ========== Types ==========

/// Everything persisted under the store namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreState {
    pub is_authenticated: bool,
    pub classroom_code: Option<String>,
    pub nickname: Option<String>,
    pub language: Language,
    pub tts_rate: f32,
    pub session_duration: u32,
    pub stars: u32,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            classroom_code: None,
            nickname: None,
            language: Language::En,
            tts_rate: DEFAULT_TTS_RATE,
            session_duration: DEFAULT_SESSION_MINUTES,
            stars: 0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("invalid classroom code")]
    InvalidClassroomCode,
}

pub type SharedStore = Arc<parking_lot::Mutex<SessionStore>>;

// ========== Store ==========

/// Process-wide state: read once at startup, written through on every mutation.
pub struct SessionStore {
    state: StoreState,
    backend: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub const NAMESPACE: &'static str = "nexttoddlers-storage";

    pub fn load(backend: Box<dyn KeyValueStore>) -> StoreResult<Self> {
        let state = match backend.get(Self::NAMESPACE)? {
            Some(raw) => match serde_json::from_str::<StoreState>(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "stored state unreadable, starting fresh");
                    StoreState::default()
                }
            },
            None => StoreState::default(),
        };

        info!(
            authenticated = state.is_authenticated,
            stars = state.stars,
            language = state.language.as_str(),
            "session store loaded"
        );

        Ok(Self { state, backend })
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(parking_lot::Mutex::new(self))
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn stars(&self) -> u32 {
        self.state.stars
    }

    pub fn login(
        &mut self,
        registry: &dyn ClassroomRegistry,
        code: &str,
        nickname: &str,
    ) -> Result<(), LoginError> {
        if !registry.is_valid(code) {
            warn!("login rejected: invalid classroom code");
            return Err(LoginError::InvalidClassroomCode);
        }

        let nickname = match nickname.trim() {
            "" => PLACEHOLDER_NICKNAME.to_string(),
            name => name.to_string(),
        };

        self.state.is_authenticated = true;
        self.state.classroom_code = Some(normalize_code(code));
        self.state.nickname = Some(nickname);
        info!(nickname = ?self.state.nickname, "learner logged in");
        self.commit();
        Ok(())
    }

    /// Stars and settings survive logout.
    pub fn logout(&mut self) {
        self.state.is_authenticated = false;
        self.state.classroom_code = None;
        self.state.nickname = None;
        info!("learner logged out");
        self.commit();
    }

    pub fn set_language(&mut self, language: Language) {
        self.state.language = language;
        self.commit();
    }

    pub fn set_tts_rate(&mut self, rate: f32) {
        self.state.tts_rate = rate;
        self.commit();
    }

    pub fn set_session_duration(&mut self, minutes: u32) {
        self.state.session_duration = minutes;
        self.commit();
    }

    pub fn add_star(&mut self) {
        self.add_stars(1);
    }

    pub fn add_stars(&mut self, amount: u32) {
        self.state.stars = self.state.stars.saturating_add(amount);
        self.commit();
    }

    /// Wipes the namespace and returns to defaults.
    pub fn clear_storage(&mut self) -> StoreResult<()> {
        self.backend.remove(Self::NAMESPACE)?;
        self.state = StoreState::default();
        info!("session store cleared");
        Ok(())
    }

    pub fn persist(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.state)?;
        self.backend.put(Self::NAMESPACE, &raw)?;
        Ok(())
    }

    // The in-memory change stands even if the write fails.
    fn commit(&self) {
        if let Err(err) = self.persist() {
            warn!(error = %err, "failed to persist session store");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nextoddlers_core::StaticClassroomRegistry;

    use super::*;
    use crate::storage::MemoryStore;

    fn store_with(backend: Arc<MemoryStore>) -> SessionStore {
        SessionStore::load(Box::new(backend)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let state = store.state();
        assert!(!state.is_authenticated);
        assert_eq!(state.language, Language::En);
        assert!((state.tts_rate - 0.8).abs() < f32::EPSILON);
        assert_eq!(state.session_duration, 5);
        assert_eq!(state.stars, 0);
    }

    #[test]
    fn test_invalid_code_leaves_state_untouched() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let registry = StaticClassroomRegistry::builtin();

        assert_eq!(
            store.login(&registry, "WRONG1", "Alice"),
            Err(LoginError::InvalidClassroomCode)
        );
        assert!(!store.is_authenticated());
        assert_eq!(store.state().nickname, None);
    }

    #[test]
    fn test_blank_nickname_gets_placeholder() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let registry = StaticClassroomRegistry::builtin();

        store.login(&registry, "lum123", "   ").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.state().nickname.as_deref(), Some(PLACEHOLDER_NICKNAME));
        assert_eq!(store.state().classroom_code.as_deref(), Some("LUM123"));
    }

    #[test]
    fn test_logout_keeps_stars_and_settings() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let registry = StaticClassroomRegistry::builtin();
        store.login(&registry, "LUM123", "Alice").unwrap();
        store.add_stars(4);
        store.set_language(Language::Ru);
        store.set_session_duration(10);

        store.logout();
        let state = store.state();
        assert!(!state.is_authenticated);
        assert_eq!(state.classroom_code, None);
        assert_eq!(state.nickname, None);
        assert_eq!(state.stars, 4);
        assert_eq!(state.language, Language::Ru);
        assert_eq!(state.session_duration, 10);
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = store_with(Arc::clone(&backend));
        store.add_star();
        store.set_tts_rate(1.2);

        let reloaded = store_with(backend);
        assert_eq!(reloaded.stars(), 1);
        assert!((reloaded.state().tts_rate - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_defaults() {
        let backend = Arc::new(MemoryStore::new());
        backend.put(SessionStore::NAMESPACE, "{not json").unwrap();
        let store = store_with(backend);
        assert_eq!(store.state(), &StoreState::default());
    }

    #[test]
    fn test_partial_state_fills_defaults() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .put(SessionStore::NAMESPACE, r#"{"stars":7,"language":"tr"}"#)
            .unwrap();
        let store = store_with(backend);
        assert_eq!(store.stars(), 7);
        assert_eq!(store.state().language, Language::Tr);
        assert_eq!(store.state().session_duration, 5);
    }

    #[test]
    fn test_clear_storage_resets() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = store_with(Arc::clone(&backend));
        store.add_stars(3);
        store.clear_storage().unwrap();
        assert_eq!(store.stars(), 0);
        assert_eq!(backend.get(SessionStore::NAMESPACE).unwrap(), None);
    }
}
