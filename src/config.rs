use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_NAME: &str = "lexicard.db";
const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Process configuration read from the environment. User-facing settings
/// (sheet URL, auto-pronounce) live in the store instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    /// Language the meanings and translations are written in
    pub native_language: String,
    pub debounce: Duration,
    /// TTS command line; the text is appended as the last argument
    pub tts_command: String,
    /// Recording checked when pronunciation is tested from a flashcard
    pub recording_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty());

        let api_url = env::var("LEXICARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("LEXICARD_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let native_language =
            env::var("LEXICARD_NATIVE_LANG").unwrap_or_else(|_| "Korean".to_string());

        let debounce_ms = env::var("LEXICARD_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(400); // 400ms default

        let tts_command = env::var("LEXICARD_TTS").unwrap_or_else(|_| default_tts().to_string());

        let db_path = db_path();
        let recording_path = env::var("LEXICARD_RECORDING")
            .map(PathBuf::from)
            .unwrap_or_else(|_| db_path.with_file_name("attempt.wav"));

        Config {
            db_path,
            api_key,
            api_url,
            model,
            native_language,
            debounce: Duration::from_millis(debounce_ms),
            tts_command,
            recording_path,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.db_path.with_extension("log")
    }

    /// Creates the directory holding the database and log file.
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        match self.db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }
}

fn db_path() -> PathBuf {
    match env::var("LEXICARD_DB") {
        Ok(path) => PathBuf::from(path),
        Err(_) => default_db_path(dirs::config_dir()),
    }
}

fn default_db_path(config_dir: Option<PathBuf>) -> PathBuf {
    config_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexicard")
        .join(DEFAULT_DB_NAME)
}

fn default_tts() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak"
    }
}
