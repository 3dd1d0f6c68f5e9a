use rusqlite::Result;
use serde::Serialize;

use crate::models::{Record, RecordKind, SentenceRecord, Settings, WordRecord};
use crate::srs;
use crate::store::KeyValueStore;

pub const WORDS_KEY: &str = "lexicard.words";
pub const SENTENCES_KEY: &str = "lexicard.sentences";
pub const SETTINGS_KEY: &str = "lexicard.settings";

/// Sink for items graded during a study session.
pub trait DeckWriter {
    fn update_item(&mut self, item: &Record);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeckStats {
    pub total: usize,
    pub due_now: usize,
    pub mastered: usize,
    pub avg_level: f64,
}

/// In-memory decks and settings, mirrored to the store on every change.
pub struct AppState<S: KeyValueStore> {
    store: S,
    words: Vec<WordRecord>,
    sentences: Vec<SentenceRecord>,
    settings: Settings,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn load(store: S) -> Result<Self> {
        let words = load_blob(&store, WORDS_KEY)?.unwrap_or_default();
        let sentences = load_blob(&store, SENTENCES_KEY)?.unwrap_or_default();
        let settings = load_blob(&store, SETTINGS_KEY)?.unwrap_or_default();

        Ok(Self {
            store,
            words,
            sentences,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.persist_blob(SETTINGS_KEY, &self.settings)
    }

    #[cfg(test)]
    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    #[cfg(test)]
    pub fn sentences(&self) -> &[SentenceRecord] {
        &self.sentences
    }

    pub fn deck(&self, kind: RecordKind) -> Vec<Record> {
        match kind {
            RecordKind::Word => self.words.iter().cloned().map(Record::Word).collect(),
            RecordKind::Sentence => self
                .sentences
                .iter()
                .cloned()
                .map(Record::Sentence)
                .collect(),
        }
    }

    pub fn find(&self, kind: RecordKind, text: &str) -> Option<Record> {
        let key = kind.normalize(text);
        match kind {
            RecordKind::Word => self
                .words
                .iter()
                .find(|w| kind.normalize(&w.word) == key)
                .cloned()
                .map(Record::Word),
            RecordKind::Sentence => self
                .sentences
                .iter()
                .find(|s| kind.normalize(&s.sentence) == key)
                .cloned()
                .map(Record::Sentence),
        }
    }

    /// Adds a record to its deck. Returns false if an item with the same key
    /// is already saved; the saved copy keeps its review history.
    pub fn save(&mut self, record: Record) -> Result<bool> {
        let kind = record.kind();
        if self.position(kind, &record.key()).is_some() {
            return Ok(false);
        }

        match record {
            Record::Word(w) => self.words.push(w),
            Record::Sentence(s) => self.sentences.push(s),
        }
        tracing::info!(kind = kind.as_str(), "saved item to deck");
        self.persist(kind)?;
        Ok(true)
    }

    pub fn delete(&mut self, kind: RecordKind, text: &str) -> Result<bool> {
        let Some(index) = self.position(kind, &kind.normalize(text)) else {
            return Ok(false);
        };

        match kind {
            RecordKind::Word => {
                self.words.remove(index);
            }
            RecordKind::Sentence => {
                self.sentences.remove(index);
            }
        }
        self.persist(kind)?;
        Ok(true)
    }

    /// Replaces the saved item with the same key. Returns false if it is gone.
    pub fn replace(&mut self, item: &Record) -> Result<bool> {
        let kind = item.kind();
        let Some(index) = self.position(kind, &item.key()) else {
            return Ok(false);
        };

        match item {
            Record::Word(w) => self.words[index] = w.clone(),
            Record::Sentence(s) => self.sentences[index] = s.clone(),
        }
        self.persist(kind)?;
        Ok(true)
    }

    pub fn due(&self, kind: RecordKind, now: i64) -> Vec<Record> {
        srs::due_items(&self.deck(kind), now)
    }

    pub fn stats(&self, kind: RecordKind, now: i64) -> DeckStats {
        let deck = self.deck(kind);
        if deck.is_empty() {
            return DeckStats::default();
        }

        let total_level: usize = deck.iter().map(|r| r.srs().level()).sum();
        DeckStats {
            total: deck.len(),
            due_now: deck.iter().filter(|r| r.is_due(now)).count(),
            mastered: deck.iter().filter(|r| r.srs().level() >= 4).count(),
            avg_level: total_level as f64 / deck.len() as f64,
        }
    }

    fn position(&self, kind: RecordKind, key: &str) -> Option<usize> {
        match kind {
            RecordKind::Word => self.words.iter().position(|w| kind.normalize(&w.word) == key),
            RecordKind::Sentence => self
                .sentences
                .iter()
                .position(|s| kind.normalize(&s.sentence) == key),
        }
    }

    fn persist(&self, kind: RecordKind) -> Result<()> {
        match kind {
            RecordKind::Word => self.persist_blob(WORDS_KEY, &self.words),
            RecordKind::Sentence => self.persist_blob(SENTENCES_KEY, &self.sentences),
        }
    }

    fn persist_blob<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        self.store.set(key, &json)
    }
}

impl<S: KeyValueStore> DeckWriter for AppState<S> {
    fn update_item(&mut self, item: &Record) {
        match self.replace(item) {
            Ok(true) => {}
            Ok(false) => tracing::warn!(key = %item.key(), "graded item no longer in deck"),
            Err(e) => tracing::warn!(key = %item.key(), "failed to persist graded item: {e}"),
        }
    }
}

// Corrupt blobs fall back to empty rather than failing startup
fn load_blob<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, "ignoring malformed stored data: {e}");
            Ok(None)
        }
    }
}
