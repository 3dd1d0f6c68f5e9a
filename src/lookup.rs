use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::audio::AudioSample;
use crate::cache::LookupCache;
use crate::models::{PronunciationFeedback, Record, RecordKind, SentenceRecord, WordRecord};

/// Generative-language backend that turns text into structured records.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn analyze_word(&self, text: &str) -> Result<WordRecord, LookupError>;

    async fn analyze_sentence(&self, text: &str) -> Result<SentenceRecord, LookupError>;

    async fn check_pronunciation(
        &self,
        target: &str,
        audio: &AudioSample,
    ) -> Result<PronunciationFeedback, LookupError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Nothing to look up")]
    EmptyQuery,

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Cached front door to a [`LookupClient`].
pub struct LookupService {
    client: Arc<dyn LookupClient>,
    cache: Mutex<LookupCache>,
}

impl LookupService {
    pub fn new(client: Arc<dyn LookupClient>) -> Self {
        Self {
            client,
            cache: Mutex::new(LookupCache::new()),
        }
    }

    pub async fn lookup(&self, kind: RecordKind, text: &str) -> Result<Record, LookupError> {
        let query = kind.normalize(text);
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        if let Some(hit) = self.cache.lock().await.get(kind, &query) {
            tracing::debug!(kind = kind.as_str(), %query, "lookup cache hit");
            return Ok(hit.clone());
        }

        tracing::info!(kind = kind.as_str(), %query, "querying lookup backend");
        let record: Record = match kind {
            RecordKind::Word => self.client.analyze_word(&query).await?.into(),
            RecordKind::Sentence => self.client.analyze_sentence(&query).await?.into(),
        };

        self.cache.lock().await.insert(kind, &query, record.clone());
        Ok(record)
    }

    // Attempts differ every time, so feedback is never cached
    pub async fn check_pronunciation(
        &self,
        target: &str,
        audio: &AudioSample,
    ) -> Result<PronunciationFeedback, LookupError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        self.client.check_pronunciation(target, audio).await
    }

    #[cfg(test)]
    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Marks the most recently issued query so late results for older queries
/// can be dropped when they arrive.
#[derive(Debug, Default)]
pub struct LatestQuery {
    issued: u64,
}

impl LatestQuery {
    pub fn issue(&mut self) -> QueryTicket {
        self.issued += 1;
        QueryTicket(self.issued)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.issued
    }

    pub fn accept<T>(&self, ticket: QueryTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "dropping stale lookup result");
            None
        }
    }
}

/// A finished lookup on its way back to the event loop.
#[derive(Debug)]
pub struct LookupOutcome {
    pub ticket: QueryTicket,
    pub kind: RecordKind,
    pub query: String,
    pub result: Result<Record, LookupError>,
}
