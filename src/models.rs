use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::srs;

// Which deck a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Word,
    Sentence,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Word => "word",
            RecordKind::Sentence => "sentence",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "word" | "words" | "w" => Some(RecordKind::Word),
            "sentence" | "sentences" | "s" => Some(RecordKind::Sentence),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Word => "Words",
            RecordKind::Sentence => "Sentences",
        }
    }

    /// Canonical key for a query or saved item of this kind.
    ///
    /// Words are case-insensitive. Sentences keep their case because
    /// naturalness judgments can depend on it.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            RecordKind::Word => text.trim().to_lowercase(),
            RecordKind::Sentence => text.trim().to_string(),
        }
    }
}

/// Mutable scheduling fields carried by every saved record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrsState {
    #[serde(default)]
    pub srs_level: usize,
    /// Milliseconds since the epoch; `None` means due now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<i64>,
}

impl SrsState {
    /// Level clamped into the interval table, so stale stored values stay usable.
    pub fn level(&self) -> usize {
        self.srs_level.min(srs::last_level())
    }

    pub fn is_due(&self, now: i64) -> bool {
        match self.next_review {
            None => true,
            Some(at) => at <= now,
        }
    }

    pub fn next_review_label(&self) -> String {
        match self.next_review.and_then(DateTime::<Utc>::from_timestamp_millis) {
            Some(dt) => dt.format("%b %d %H:%M").to_string(),
            None => "now".to_string(),
        }
    }

    pub fn mastery_label(&self) -> &'static str {
        match self.level() {
            0 => "New",
            1 => "Learning",
            2 => "Familiar",
            3 => "Comfortable",
            4 => "Proficient",
            5 => "Strong",
            _ => "Mastered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub english: String,
    #[serde(default)]
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub meaning: String,
    pub definition: String,
    #[serde(default)]
    pub ipa: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[serde(flatten)]
    pub srs: SrsState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarPoint {
    pub segment: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub sentence: String,
    pub translation: String,
    #[serde(default)]
    pub grammar: Vec<GrammarPoint>,
    #[serde(default)]
    pub usage: String,
    /// 0-100, how natural a native speaker would find the sentence
    #[serde(default, deserialize_with = "percent")]
    pub naturalness: u8,
    #[serde(default)]
    pub similar: Vec<Example>,
    #[serde(flatten)]
    pub srs: SrsState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationFeedback {
    #[serde(deserialize_with = "percent")]
    pub score: u8,
    pub feedback_english: String,
    pub feedback_native: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Reads any JSON number as a 0-100 score, rounding fractions and clamping
/// out-of-range values.
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

/// A saved or looked-up entry. The variant is fixed when the record is
/// built, never guessed from which fields happen to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Word(WordRecord),
    Sentence(SentenceRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Word(_) => RecordKind::Word,
            Record::Sentence(_) => RecordKind::Sentence,
        }
    }

    /// Primary text shown on the front of a card.
    pub fn text(&self) -> &str {
        match self {
            Record::Word(w) => &w.word,
            Record::Sentence(s) => &s.sentence,
        }
    }

    pub fn key(&self) -> String {
        self.kind().normalize(self.text())
    }

    /// Short answer shown on the back of a card.
    pub fn summary(&self) -> &str {
        match self {
            Record::Word(w) => &w.meaning,
            Record::Sentence(s) => &s.translation,
        }
    }

    pub fn srs(&self) -> &SrsState {
        match self {
            Record::Word(w) => &w.srs,
            Record::Sentence(s) => &s.srs,
        }
    }

    pub fn srs_mut(&mut self) -> &mut SrsState {
        match self {
            Record::Word(w) => &mut w.srs,
            Record::Sentence(s) => &mut s.srs,
        }
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.srs().is_due(now)
    }

    /// Lines for the revealed side of a card.
    pub fn back_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self {
            Record::Word(w) => {
                if !w.ipa.is_empty() {
                    lines.push(format!("/{}/  {}", w.ipa.trim_matches('/'), w.part_of_speech));
                }
                lines.push(w.meaning.clone());
                lines.push(w.definition.clone());
                for ex in w.examples.iter().take(2) {
                    lines.push(format!("- {}", ex.english));
                    if !ex.translation.is_empty() {
                        lines.push(format!("  {}", ex.translation));
                    }
                }
                if let Some(mnemonic) = &w.mnemonic {
                    lines.push(format!("Mnemonic: {}", mnemonic));
                }
            }
            Record::Sentence(s) => {
                lines.push(s.translation.clone());
                for point in &s.grammar {
                    lines.push(format!("- {}: {}", point.segment, point.explanation));
                }
                if !s.usage.is_empty() {
                    lines.push(format!("Usage: {}", s.usage));
                }
            }
        }
        lines
    }
}

impl From<WordRecord> for Record {
    fn from(w: WordRecord) -> Self {
        Record::Word(w)
    }
}

impl From<SentenceRecord> for Record {
    fn from(s: SentenceRecord) -> Self {
        Record::Sentence(s)
    }
}

// Recall grade given after an answer is revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Fail,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Fail, Grade::Hard, Grade::Good, Grade::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Fail => "fail",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail" | "f" | "again" | "forgot" | "1" => Some(Grade::Fail),
            "hard" | "h" | "2" => Some(Grade::Hard),
            "good" | "g" | "ok" | "3" => Some(Grade::Good),
            "easy" | "e" | "4" => Some(Grade::Easy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Fail => "Forgot",
            Grade::Hard => "Hard",
            Grade::Good => "Good",
            Grade::Easy => "Easy",
        }
    }
}

/// User settings persisted alongside the decks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    #[serde(default)]
    pub auto_pronounce: bool,
}

// JSON output wrapper for --json mode
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
