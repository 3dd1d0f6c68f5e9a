//! Study session state machine.
//!
//! A session walks a queue of due items in one of three modes. Each item has
//! to be revealed (flipped, answered or picked) before it can be graded;
//! grading reschedules the item, writes it back to the deck and advances.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::app::DeckWriter;
use crate::models::{Grade, Record};
use crate::speech::Speaker;
use crate::srs;

pub const QUIZ_DISTRACTORS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    Flashcard,
    Typing,
    Quiz,
}

impl StudyMode {
    pub const ALL: [StudyMode; 3] = [StudyMode::Flashcard, StudyMode::Typing, StudyMode::Quiz];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudyMode::Flashcard => "flashcard",
            StudyMode::Typing => "typing",
            StudyMode::Quiz => "quiz",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flashcard" | "flashcards" | "flip" | "f" => Some(StudyMode::Flashcard),
            "typing" | "type" | "t" => Some(StudyMode::Typing),
            "quiz" | "choice" | "q" => Some(StudyMode::Quiz),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StudyMode::Flashcard => "Recall the meaning, then flip the card",
            StudyMode::Typing => "Type the word from its meaning",
            StudyMode::Quiz => "Pick the right answer out of four",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ModeSelect,
    Active(StudyMode),
    Complete,
    /// Handed back to the caller, by cancelling or after the summary
    Exited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub reviewed: usize,
    pub forgotten: usize,
}

/// Per-item interaction state; reset whenever the queue advances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    pub flipped: bool,
    pub revealed: bool,
    pub input: String,
    pub correct: Option<bool>,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No item is being reviewed")]
    NotActive,

    #[error("A study mode has already been chosen")]
    ModeAlreadyChosen,

    #[error("Reveal the answer before grading")]
    NotRevealed,

    #[error("Wait for the pronunciation check to finish")]
    AudioCheckInProgress,

    #[error("Not available in {0} mode")]
    WrongMode(&'static str),

    #[error("Option {0} does not exist")]
    NoSuchOption(usize),

    #[error("This item has already been answered")]
    AlreadyAnswered,

    #[error("The session is still running")]
    NotComplete,
}

pub struct StudySession<R: Rng = StdRng> {
    phase: Phase,
    queue: Vec<Record>,
    deck_texts: Vec<String>,
    current: usize,
    card: CardState,
    stats: SessionStats,
    auto_pronounce: bool,
    audio_check: bool,
    rng: R,
}

impl<R: Rng> StudySession<R> {
    /// `queue` is reviewed in the given order; `deck` is the whole deck the
    /// queue was drawn from and feeds quiz distractors.
    pub fn new(queue: Vec<Record>, deck: &[Record], auto_pronounce: bool, rng: R) -> Self {
        let phase = if queue.is_empty() {
            Phase::Complete
        } else {
            Phase::ModeSelect
        };

        Self {
            phase,
            queue,
            deck_texts: deck.iter().map(|r| r.text().to_string()).collect(),
            current: 0,
            card: CardState::default(),
            stats: SessionStats::default(),
            auto_pronounce,
            audio_check: false,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Option<StudyMode> {
        match self.phase {
            Phase::Active(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn card(&self) -> &CardState {
        &self.card
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// One-based position of the current item.
    pub fn position(&self) -> usize {
        (self.current + 1).min(self.queue.len())
    }

    pub fn current_item(&self) -> Option<&Record> {
        match self.phase {
            Phase::Active(_) => self.queue.get(self.current),
            _ => None,
        }
    }

    pub fn is_audio_check_running(&self) -> bool {
        self.audio_check
    }

    /// Whether the current answer is showing, which is what unlocks grading.
    pub fn is_revealed(&self) -> bool {
        match self.mode() {
            Some(StudyMode::Flashcard) => self.card.revealed,
            Some(StudyMode::Typing) => self.card.correct.is_some(),
            Some(StudyMode::Quiz) => self.card.selected.is_some(),
            None => false,
        }
    }

    pub fn choose_mode(&mut self, mode: StudyMode) -> Result<(), SessionError> {
        if self.phase != Phase::ModeSelect {
            return Err(SessionError::ModeAlreadyChosen);
        }

        tracing::info!(mode = mode.as_str(), items = self.queue.len(), "study session started");
        self.phase = Phase::Active(mode);
        self.prepare_card();
        Ok(())
    }

    pub fn flip(&mut self) -> Result<(), SessionError> {
        self.require_mode(StudyMode::Flashcard)?;
        if self.audio_check {
            return Err(SessionError::AudioCheckInProgress);
        }

        self.card.flipped = !self.card.flipped;
        self.card.revealed = true;
        Ok(())
    }

    pub fn begin_audio_check(&mut self) -> Result<(), SessionError> {
        if self.current_item().is_none() {
            return Err(SessionError::NotActive);
        }
        if self.audio_check {
            return Err(SessionError::AudioCheckInProgress);
        }
        self.audio_check = true;
        Ok(())
    }

    pub fn end_audio_check(&mut self) {
        self.audio_check = false;
    }

    pub fn push_input(&mut self, c: char) -> Result<(), SessionError> {
        self.require_open_typing()?;
        self.card.input.push(c);
        Ok(())
    }

    pub fn pop_input(&mut self) -> Result<(), SessionError> {
        self.require_open_typing()?;
        self.card.input.pop();
        Ok(())
    }

    #[cfg(test)]
    pub fn set_input(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_open_typing()?;
        self.card.input = text.to_string();
        Ok(())
    }

    /// Checks the typed answer against the item's text. Returns whether it
    /// was right; the canonical answer is revealed either way.
    pub fn submit(&mut self) -> Result<bool, SessionError> {
        self.require_open_typing()?;
        let expected = self.current_text()?;
        let correct = answers_match(&self.card.input, &expected);
        self.card.correct = Some(correct);
        Ok(correct)
    }

    #[cfg(test)]
    pub fn submit_answer(&mut self, answer: &str) -> Result<bool, SessionError> {
        self.set_input(answer)?;
        self.submit()
    }

    /// Locks in a quiz option. Returns whether it was the right one.
    pub fn select_option(&mut self, index: usize) -> Result<bool, SessionError> {
        self.require_mode(StudyMode::Quiz)?;
        if self.card.selected.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        if index >= self.card.options.len() {
            return Err(SessionError::NoSuchOption(index));
        }

        self.card.selected = Some(index);
        Ok(Some(index) == self.correct_option())
    }

    pub fn correct_option(&self) -> Option<usize> {
        let item = self.current_item()?;
        self.card.options.iter().position(|o| o == item.text())
    }

    /// Reschedules the current item, writes it back through `deck` and moves
    /// on. Returns the updated item.
    pub fn grade(
        &mut self,
        grade: Grade,
        now: i64,
        deck: &mut dyn DeckWriter,
        speaker: &mut dyn Speaker,
    ) -> Result<Record, SessionError> {
        let mode = self.mode().ok_or(SessionError::NotActive)?;
        if !self.is_revealed() {
            return Err(SessionError::NotRevealed);
        }

        let updated = srs::rate(&self.queue[self.current], grade, now);
        deck.update_item(&updated);
        self.queue[self.current] = updated.clone();

        self.stats.reviewed += 1;
        if grade == Grade::Fail {
            self.stats.forgotten += 1;
        }
        tracing::debug!(
            item = %updated.key(),
            grade = grade.as_str(),
            level = updated.srs().srs_level,
            "graded item"
        );

        self.current += 1;
        if self.current >= self.queue.len() {
            self.phase = Phase::Complete;
            self.card = CardState::default();
            self.audio_check = false;
            tracing::info!(
                reviewed = self.stats.reviewed,
                forgotten = self.stats.forgotten,
                "study session complete"
            );
        } else {
            self.prepare_card();
            if mode == StudyMode::Flashcard && self.auto_pronounce {
                speaker.speak(self.queue[self.current].text());
            }
        }

        Ok(updated)
    }

    /// Leaves the session early. Items not yet graded keep their schedule.
    pub fn cancel(&mut self) -> SessionStats {
        if self.phase != Phase::Exited {
            tracing::info!(reviewed = self.stats.reviewed, "study session cancelled");
        }
        self.phase = Phase::Exited;
        self.stats
    }

    /// Dismisses the summary shown after the last item.
    pub fn acknowledge(&mut self) -> Result<SessionStats, SessionError> {
        if self.phase != Phase::Complete {
            return Err(SessionError::NotComplete);
        }
        self.phase = Phase::Exited;
        Ok(self.stats)
    }

    fn prepare_card(&mut self) {
        self.card = CardState::default();
        self.audio_check = false;

        if self.mode() == Some(StudyMode::Quiz) {
            if let Some(item) = self.queue.get(self.current) {
                let correct = item.text().to_string();
                self.card.options = quiz_options(&correct, &self.deck_texts, &mut self.rng);
            }
        }
    }

    fn current_text(&self) -> Result<String, SessionError> {
        self.current_item()
            .map(|item| item.text().to_string())
            .ok_or(SessionError::NotActive)
    }

    fn require_mode(&self, mode: StudyMode) -> Result<(), SessionError> {
        match self.mode() {
            Some(m) if m == mode => Ok(()),
            Some(m) => Err(SessionError::WrongMode(m.as_str())),
            None => Err(SessionError::NotActive),
        }
    }

    fn require_open_typing(&self) -> Result<(), SessionError> {
        self.require_mode(StudyMode::Typing)?;
        if self.card.correct.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        Ok(())
    }
}

pub fn answers_match(answer: &str, expected: &str) -> bool {
    answer.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Correct answer plus up to three distinct distractors from the deck, in
/// random order. A deck of fewer than two items yields only the answer.
pub fn quiz_options<R: Rng + ?Sized>(correct: &str, deck: &[String], rng: &mut R) -> Vec<String> {
    if deck.len() < 2 {
        return vec![correct.to_string()];
    }

    let mut pool: Vec<&String> = deck.iter().filter(|t| t.as_str() != correct).collect();
    pool.sort();
    pool.dedup();

    let mut options: Vec<String> = pool
        .choose_multiple(rng, QUIZ_DISTRACTORS)
        .map(|t| t.to_string())
        .collect();
    options.push(correct.to_string());
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::word;
    use crate::speech::RecordingSpeaker;
    use rand::SeedableRng;

    const NOW: i64 = 1_700_000_000_000;

    #[derive(Default)]
    struct RecordingDeck {
        written: Vec<Record>,
    }

    impl DeckWriter for RecordingDeck {
        fn update_item(&mut self, item: &Record) {
            self.written.push(item.clone());
        }
    }

    fn deck_of(words: &[&str]) -> Vec<Record> {
        words.iter().map(|w| Record::from(word(w))).collect()
    }

    fn session(words: &[&str], auto_pronounce: bool) -> StudySession {
        let deck = deck_of(words);
        StudySession::new(deck.clone(), &deck, auto_pronounce, StdRng::seed_from_u64(7))
    }

    fn texts(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn empty_queue_is_complete_immediately() {
            let mut s = session(&[], false);
            assert_eq!(s.phase(), Phase::Complete);
            assert_eq!(s.stats(), SessionStats::default());
            assert!(s.current_item().is_none());
            assert_eq!(s.acknowledge().unwrap(), SessionStats::default());
            assert_eq!(s.phase(), Phase::Exited);
        }

        #[test]
        fn starts_in_mode_select() {
            let s = session(&["apple"], false);
            assert_eq!(s.phase(), Phase::ModeSelect);
            assert!(s.current_item().is_none());
        }

        #[test]
        fn mode_is_fixed_once_chosen() {
            let mut s = session(&["apple"], false);
            s.choose_mode(StudyMode::Typing).unwrap();
            assert_eq!(s.mode(), Some(StudyMode::Typing));
            assert_eq!(
                s.choose_mode(StudyMode::Quiz),
                Err(SessionError::ModeAlreadyChosen)
            );
        }

        #[test]
        fn cancel_from_mode_select() {
            let mut s = session(&["apple"], false);
            assert_eq!(s.cancel(), SessionStats::default());
            assert_eq!(s.phase(), Phase::Exited);
        }

        #[test]
        fn cancel_mid_session_leaves_rest_untouched() {
            let mut s = session(&["apple", "pear", "plum"], false);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Flashcard).unwrap();
            s.flip().unwrap();
            s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap();

            let stats = s.cancel();
            assert_eq!(stats.reviewed, 1);
            assert_eq!(deck.written.len(), 1);
            assert_eq!(deck.written[0].text(), "apple");
            assert!(s.flip().is_err());
        }

        #[test]
        fn acknowledge_requires_complete() {
            let mut s = session(&["apple"], false);
            assert_eq!(s.acknowledge(), Err(SessionError::NotComplete));
        }
    }

    mod flashcard_tests {
        use super::*;

        #[test]
        fn grade_requires_flip() {
            let mut s = session(&["apple"], false);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Flashcard).unwrap();

            let err = s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap_err();
            assert_eq!(err, SessionError::NotRevealed);
            assert!(deck.written.is_empty());
        }

        #[test]
        fn flip_blocked_during_audio_check() {
            let mut s = session(&["apple"], false);
            s.choose_mode(StudyMode::Flashcard).unwrap();
            s.begin_audio_check().unwrap();

            assert_eq!(s.flip(), Err(SessionError::AudioCheckInProgress));
            assert_eq!(s.begin_audio_check(), Err(SessionError::AudioCheckInProgress));

            s.end_audio_check();
            s.flip().unwrap();
            assert!(s.card().flipped);
            assert!(s.is_revealed());
        }

        #[test]
        fn flipping_back_keeps_grading_unlocked() {
            let mut s = session(&["apple"], false);
            s.choose_mode(StudyMode::Flashcard).unwrap();
            s.flip().unwrap();
            s.flip().unwrap();
            assert!(!s.card().flipped);
            assert!(s.is_revealed());
        }

        #[test]
        fn grading_walks_queue_to_complete() {
            let mut s = session(&["apple", "pear"], false);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Flashcard).unwrap();

            s.flip().unwrap();
            let first = s.grade(Grade::Fail, NOW, &mut deck, &mut speaker).unwrap();
            assert_eq!(first.srs().srs_level, 0);
            assert_eq!(s.position(), 2);
            assert!(!s.card().flipped);
            assert_eq!(s.current_item().unwrap().text(), "pear");

            s.flip().unwrap();
            s.grade(Grade::Easy, NOW, &mut deck, &mut speaker).unwrap();

            assert_eq!(s.phase(), Phase::Complete);
            assert_eq!(
                s.stats(),
                SessionStats {
                    reviewed: 2,
                    forgotten: 1
                }
            );
            assert_eq!(deck.written.len(), 2);
            assert_eq!(deck.written[1].srs().srs_level, 2);
            assert_eq!(
                deck.written[1].srs().next_review,
                Some(NOW + 7 * srs::DAY_MS)
            );
        }

        #[test]
        fn auto_pronounce_speaks_next_item() {
            let mut s = session(&["apple", "pear"], true);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Flashcard).unwrap();
            s.flip().unwrap();
            s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap();
            s.flip().unwrap();
            s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap();

            assert_eq!(speaker.spoken, vec!["pear".to_string()]);
        }

        #[test]
        fn no_speech_without_auto_pronounce() {
            let mut s = session(&["apple", "pear"], false);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Flashcard).unwrap();
            s.flip().unwrap();
            s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap();
            assert!(speaker.spoken.is_empty());
        }

        #[test]
        fn good_then_easy_across_sessions() {
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            let mut item = Record::from(word("apple"));

            for (grade, expected) in [(Grade::Good, 1), (Grade::Easy, 3)] {
                let queue = vec![item.clone()];
                let mut s = StudySession::new(queue.clone(), &queue, false, StdRng::seed_from_u64(1));
                s.choose_mode(StudyMode::Flashcard).unwrap();
                s.flip().unwrap();
                item = s.grade(grade, NOW, &mut deck, &mut speaker).unwrap();
                assert_eq!(item.srs().srs_level, expected);
            }
        }
    }

    mod typing_tests {
        use super::*;

        #[test]
        fn submit_is_case_and_space_insensitive() {
            let mut s = session(&["Apple"], false);
            s.choose_mode(StudyMode::Typing).unwrap();
            assert!(s.submit_answer("  apple ").unwrap());
            assert_eq!(s.card().correct, Some(true));
            assert!(s.is_revealed());
        }

        #[test]
        fn wrong_answer_still_reveals() {
            let mut s = session(&["apple"], false);
            s.choose_mode(StudyMode::Typing).unwrap();
            s.push_input('a').unwrap();
            s.push_input('p').unwrap();
            s.pop_input().unwrap();
            assert_eq!(s.card().input, "a");
            assert!(!s.submit().unwrap());
            assert!(s.is_revealed());
            assert_eq!(s.push_input('x'), Err(SessionError::AlreadyAnswered));
        }

        #[test]
        fn grade_requires_submit_and_resets_input() {
            let mut s = session(&["apple", "pear"], false);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Typing).unwrap();
            s.set_input("apple").unwrap();
            assert_eq!(
                s.grade(Grade::Good, NOW, &mut deck, &mut speaker),
                Err(SessionError::NotRevealed)
            );

            s.submit().unwrap();
            s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap();
            assert_eq!(s.card(), &CardState::default());
        }

        #[test]
        fn flip_is_wrong_mode() {
            let mut s = session(&["apple"], false);
            s.choose_mode(StudyMode::Typing).unwrap();
            assert_eq!(s.flip(), Err(SessionError::WrongMode("typing")));
        }

        #[test]
        fn auto_pronounce_only_in_flashcard_mode() {
            let mut s = session(&["apple", "pear"], true);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Typing).unwrap();
            s.submit_answer("apple").unwrap();
            s.grade(Grade::Good, NOW, &mut deck, &mut speaker).unwrap();
            assert!(speaker.spoken.is_empty());
        }
    }

    mod quiz_tests {
        use super::*;

        #[test]
        fn options_for_large_deck() {
            let deck = texts(&["apple", "pear", "plum", "fig", "kiwi", "lime"]);
            for seed in 0..20 {
                let mut rng = StdRng::seed_from_u64(seed);
                let options = quiz_options("plum", &deck, &mut rng);

                assert_eq!(options.len(), 4);
                assert_eq!(options.iter().filter(|o| *o == "plum").count(), 1);
                let mut distractors: Vec<&String> = options.iter().filter(|o| *o != "plum").collect();
                distractors.sort();
                distractors.dedup();
                assert_eq!(distractors.len(), 3);
            }
        }

        #[test]
        fn options_for_deck_of_one() {
            let mut rng = StdRng::seed_from_u64(3);
            assert_eq!(
                quiz_options("apple", &texts(&["apple"]), &mut rng),
                vec!["apple".to_string()]
            );
        }

        #[test]
        fn options_for_small_deck() {
            let mut rng = StdRng::seed_from_u64(3);
            let mut options = quiz_options("apple", &texts(&["apple", "pear"]), &mut rng);
            options.sort();
            assert_eq!(options, texts(&["apple", "pear"]));
        }

        #[test]
        fn duplicate_deck_texts_do_not_repeat() {
            let mut rng = StdRng::seed_from_u64(9);
            let options = quiz_options("a", &texts(&["a", "b", "b", "b", "c"]), &mut rng);
            assert_eq!(options.len(), 3);
        }

        #[test]
        fn distractors_come_from_full_deck() {
            let deck = deck_of(&["apple", "pear", "plum", "fig"]);
            let queue = vec![deck[0].clone()];
            let mut s = StudySession::new(queue, &deck, false, StdRng::seed_from_u64(5));
            s.choose_mode(StudyMode::Quiz).unwrap();

            let mut options = s.card().options.clone();
            options.sort();
            assert_eq!(options, texts(&["apple", "fig", "pear", "plum"]));
        }

        #[test]
        fn selection_locks_and_reveals() {
            let mut s = session(&["apple", "pear", "plum", "fig"], false);
            s.choose_mode(StudyMode::Quiz).unwrap();
            let correct = s.correct_option().unwrap();
            let wrong = (correct + 1) % s.card().options.len();

            assert!(!s.select_option(wrong).unwrap());
            assert!(s.is_revealed());
            assert_eq!(s.select_option(correct), Err(SessionError::AlreadyAnswered));
        }

        #[test]
        fn select_out_of_range() {
            let mut s = session(&["apple"], false);
            s.choose_mode(StudyMode::Quiz).unwrap();
            assert_eq!(s.card().options, texts(&["apple"]));
            assert_eq!(s.select_option(1), Err(SessionError::NoSuchOption(1)));
            assert!(s.select_option(0).unwrap());
        }

        #[test]
        fn options_regenerate_per_item() {
            let mut s = session(&["apple", "pear", "plum", "fig"], false);
            let mut deck = RecordingDeck::default();
            let mut speaker = RecordingSpeaker::default();
            s.choose_mode(StudyMode::Quiz).unwrap();
            s.select_option(0).unwrap();
            s.grade(Grade::Hard, NOW, &mut deck, &mut speaker).unwrap();

            assert!(s.card().selected.is_none());
            assert!(s.card().options.contains(&"pear".to_string()));
            assert_eq!(s.card().options.len(), 4);
        }
    }

    mod mode_tests {
        use super::*;

        #[test]
        fn from_str_aliases() {
            assert_eq!(StudyMode::from_str("Flip"), Some(StudyMode::Flashcard));
            assert_eq!(StudyMode::from_str("type"), Some(StudyMode::Typing));
            assert_eq!(StudyMode::from_str("quiz"), Some(StudyMode::Quiz));
            assert_eq!(StudyMode::from_str("exam"), None);
        }

        #[test]
        fn answers_match_ignores_case_and_whitespace() {
            assert!(answers_match(" Hello World ", "hello world"));
            assert!(!answers_match("hello", "hallo"));
        }
    }
}
