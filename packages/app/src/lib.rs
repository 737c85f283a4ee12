//! NexToddlers application layer: persisted session store, platform speech
//! seams, the tokio activity runner and the navigation shell around the
//! `nextoddlers-core` engine.

pub mod app;
pub mod config;
pub mod logging;
pub mod platform;
pub mod runner;
pub mod shell;
pub mod storage;
pub mod store;

pub use app::{App, AppError, PracticeError};
pub use config::AppConfig;
pub use platform::Platform;
pub use runner::{
    ActivityRunner, PracticeSession, RunnerHandle, RunnerInput, RunnerView, SessionOutcome,
};
pub use shell::{Route, Shell};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
pub use store::{LoginError, SessionStore, SharedStore, StoreError, StoreState};
