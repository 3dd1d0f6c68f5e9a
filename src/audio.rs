use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("Audio unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio sample is empty")]
    Empty,
}

/// A recorded pronunciation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSample {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl AudioSample {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RecordingError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let mime_type = mime_for_extension(&ext)
            .ok_or_else(|| RecordingError::UnsupportedFormat(ext.clone()))?;

        let data = std::fs::read(path)?;
        if data.is_empty() {
            return Err(RecordingError::Empty);
        }

        tracing::debug!(path = %path.display(), bytes = data.len(), "loaded audio sample");
        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mp3"),
        "ogg" | "oga" => Some("audio/ogg"),
        "webm" => Some("audio/webm"),
        "m4a" | "aac" => Some("audio/aac"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}
