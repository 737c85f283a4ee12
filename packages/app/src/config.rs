use std::path::PathBuf;
use std::time::Duration;

use nextoddlers_core::{ActivityTimings, DEFAULT_SPEECH_LANGUAGE};

const DB_FILE_NAME: &str = "nextoddlers.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Directory for the daily rolling log file; `None` keeps logs on stdout only.
    pub log_dir: Option<PathBuf>,
    pub time_unit: Duration,
    pub speech_language: String,
    pub extra_classroom_codes: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let db_path = std::env::var("NEXTODDLERS_DB_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = file_log_dir(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok(),
        );

        let time_unit = std::env::var("NEXTODDLERS_TIME_UNIT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));

        let speech_language = std::env::var("NEXTODDLERS_SPEECH_LANG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SPEECH_LANGUAGE.to_string());

        let extra_classroom_codes = std::env::var("NEXTODDLERS_CLASSROOM_CODES")
            .map(|value| parse_codes(&value))
            .unwrap_or_default();

        Self {
            db_path,
            log_level,
            log_dir,
            time_unit,
            speech_language,
            extra_classroom_codes,
        }
    }

    pub fn timings(&self) -> ActivityTimings {
        ActivityTimings::scaled(self.time_unit)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: "info".to_string(),
            log_dir: None,
            time_unit: Duration::from_secs(1),
            speech_language: DEFAULT_SPEECH_LANGUAGE.to_string(),
            extra_classroom_codes: Vec::new(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join("nextoddlers")
        .join(DB_FILE_NAME)
}

fn file_log_dir(enabled: Option<&str>, dir: Option<String>) -> Option<PathBuf> {
    match enabled {
        Some("true") | Some("1") => Some(
            dir.filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs")),
        ),
        _ => None,
    }
}

fn parse_codes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
