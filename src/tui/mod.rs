mod ui;
mod widgets;

pub(crate) use widgets::truncate;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::app::{AppState, DeckStats};
use crate::audio::AudioSample;
use crate::debounce::Debouncer;
use crate::lookup::{LatestQuery, LookupError, LookupOutcome, LookupService, QueryTicket};
use crate::models::{Grade, PronunciationFeedback, Record, RecordKind};
use crate::session::{Phase, StudyMode, StudySession};
use crate::sheet::SheetExporter;
use crate::speech::Speaker;
use crate::srs;
use crate::store::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Lookup,
    Words,
    Sentences,
    Study,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Lookup,
            View::Lookup => View::Words,
            View::Words => View::Sentences,
            View::Sentences => View::Dashboard,
            View::Study => View::Study,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Sentences,
            View::Lookup => View::Dashboard,
            View::Words => View::Lookup,
            View::Sentences => View::Words,
            View::Study => View::Study,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    fn last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

/// Search-as-you-type state for the lookup view.
pub struct LookupPane {
    pub kind: RecordKind,
    pub input: String,
    pub editing: bool,
    pub loading: bool,
    pub result: Option<Record>,
    pub error: Option<String>,
    debouncer: Debouncer,
    latest: LatestQuery,
}

type FeedbackOutcome = (QueryTicket, Result<PronunciationFeedback, LookupError>);

pub struct App {
    state: AppState<SqliteStore>,
    runtime: Handle,
    service: Arc<LookupService>,
    outcomes_tx: UnboundedSender<LookupOutcome>,
    outcomes_rx: UnboundedReceiver<LookupOutcome>,
    feedback_tx: UnboundedSender<FeedbackOutcome>,
    feedback_rx: UnboundedReceiver<FeedbackOutcome>,
    audio_latest: LatestQuery,
    speaker: Box<dyn Speaker>,
    recording_path: PathBuf,
    pub view: View,
    return_view: View,
    pub words: StatefulList<Record>,
    pub sentences: StatefulList<Record>,
    pub lookup: LookupPane,
    pub session: Option<StudySession>,
    pub study_kind: RecordKind,
    pub feedback: Option<PronunciationFeedback>,
    pub word_stats: DeckStats,
    pub sentence_stats: DeckStats,
    pub due_items: Vec<Record>,
    pub auto_pronounce: bool,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        state: AppState<SqliteStore>,
        service: Arc<LookupService>,
        speaker: Box<dyn Speaker>,
        runtime: Handle,
        debounce: Duration,
        recording_path: PathBuf,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = unbounded_channel();
        let (feedback_tx, feedback_rx) = unbounded_channel();
        let auto_pronounce = state.settings().auto_pronounce;

        let mut app = Self {
            state,
            runtime,
            service,
            outcomes_tx,
            outcomes_rx,
            feedback_tx,
            feedback_rx,
            audio_latest: LatestQuery::default(),
            speaker,
            recording_path,
            view: View::Dashboard,
            return_view: View::Dashboard,
            words: StatefulList::with_items(Vec::new()),
            sentences: StatefulList::with_items(Vec::new()),
            lookup: LookupPane {
                kind: RecordKind::Word,
                input: String::new(),
                editing: false,
                loading: false,
                result: None,
                error: None,
                debouncer: Debouncer::new(debounce),
                latest: LatestQuery::default(),
            },
            session: None,
            study_kind: RecordKind::Word,
            feedback: None,
            word_stats: DeckStats::default(),
            sentence_stats: DeckStats::default(),
            due_items: Vec::new(),
            auto_pronounce,
            status: None,
            should_quit: false,
        };
        app.refresh_data();
        app
    }

    pub fn refresh_data(&mut self) {
        let now = srs::now_ms();
        self.words = StatefulList::with_items(self.state.deck(RecordKind::Word));
        self.sentences = StatefulList::with_items(self.state.deck(RecordKind::Sentence));
        self.word_stats = self.state.stats(RecordKind::Word, now);
        self.sentence_stats = self.state.stats(RecordKind::Sentence, now);
        self.due_items = self.state.due(RecordKind::Word, now);
        self.due_items.extend(self.state.due(RecordKind::Sentence, now));
    }

    pub fn start_study(&mut self, kind: RecordKind, mode: Option<StudyMode>) {
        let now = srs::now_ms();
        let deck = self.state.deck(kind);
        let mut queue = srs::due_items(&deck, now);
        let mut rng = StdRng::from_entropy();
        queue.shuffle(&mut rng);

        let mut session = StudySession::new(queue, &deck, self.auto_pronounce, rng);
        if let Some(mode) = mode {
            if let Err(e) = session.choose_mode(mode) {
                tracing::debug!("preset study mode ignored: {e}");
            }
        }

        self.session = Some(session);
        self.study_kind = kind;
        self.feedback = None;
        self.audio_latest.issue();
        if self.view != View::Study {
            self.return_view = self.view;
        }
        self.view = View::Study;
    }

    fn leave_study(&mut self) {
        self.session = None;
        self.feedback = None;
        self.audio_latest.issue();
        self.view = self.return_view;
        self.refresh_data();
    }

    /// Fires settled lookups and applies finished ones. Called once per loop.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.lookup.debouncer.poll(now) {
            self.issue_lookup(query);
        }

        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.apply_outcome(outcome);
        }

        while let Ok((ticket, result)) = self.feedback_rx.try_recv() {
            self.apply_feedback(ticket, result);
        }
    }

    /// Sends the recording at `recording_path` off for a pronunciation check
    /// of the current flashcard. Flipping is locked until it comes back.
    fn check_pronunciation(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(target) = session.current_item().map(|r| r.text().to_string()) else {
            return;
        };

        let sample = match AudioSample::load(&self.recording_path) {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(path = %self.recording_path.display(), "recording unavailable: {e}");
                self.status = Some(e.to_string());
                return;
            }
        };

        if let Err(e) = session.begin_audio_check() {
            self.status = Some(e.to_string());
            return;
        }

        self.feedback = None;
        let ticket = self.audio_latest.issue();
        let service = Arc::clone(&self.service);
        let tx = self.feedback_tx.clone();
        self.runtime.spawn(async move {
            let result = service.check_pronunciation(&target, &sample).await;
            let _ = tx.send((ticket, result));
        });
    }

    /// Applies feedback for the check still pending on the current card.
    /// Results for a card that has since been graded are dropped.
    fn apply_feedback(
        &mut self,
        ticket: QueryTicket,
        result: Result<PronunciationFeedback, LookupError>,
    ) {
        let Some(result) = self.audio_latest.accept(ticket, result) else {
            tracing::debug!("dropping pronunciation feedback for an earlier card");
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.end_audio_check();

        match result {
            Ok(feedback) => self.feedback = Some(feedback),
            Err(e) => {
                tracing::warn!("pronunciation check failed: {e}");
                self.status = Some(format!("Pronunciation check failed: {}", e));
            }
        }
    }

    fn issue_lookup(&mut self, query: String) {
        if query.trim().is_empty() {
            return;
        }

        let ticket = self.lookup.latest.issue();
        let kind = self.lookup.kind;
        self.lookup.loading = true;
        self.lookup.error = None;

        let service = Arc::clone(&self.service);
        let tx = self.outcomes_tx.clone();
        self.runtime.spawn(async move {
            let result = service.lookup(kind, &query).await;
            let _ = tx.send(LookupOutcome {
                ticket,
                kind,
                query,
                result,
            });
        });
    }

    fn apply_outcome(&mut self, outcome: LookupOutcome) {
        let LookupOutcome {
            ticket,
            kind,
            query,
            result,
        } = outcome;

        let Some(result) = self.lookup.latest.accept(ticket, result) else {
            return;
        };

        self.lookup.loading = false;
        match result {
            Ok(record) => {
                self.lookup.result = Some(record);
                self.lookup.error = None;
            }
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), %query, "lookup failed: {e}");
                self.lookup.error = Some("No result found.".to_string());
            }
        }
    }

    /// Forgets any lookup in flight so its result is never shown.
    fn reset_lookup(&mut self) {
        self.lookup.debouncer.cancel();
        self.lookup.latest.issue();
        self.lookup.loading = false;
        self.lookup.result = None;
        self.lookup.error = None;
    }

    fn save_lookup_result(&mut self) {
        let Some(record) = self.lookup.result.clone() else {
            return;
        };

        match self.state.save(record.clone()) {
            Ok(true) => {
                self.status = Some(format!("Saved '{}'", record.text()));
                if let Some(exporter) = SheetExporter::from_setting(self.state.settings().sheet_url.as_deref()) {
                    self.runtime.spawn(async move {
                        exporter.export_quietly(&record).await;
                    });
                }
                self.refresh_data();
            }
            Ok(false) => self.status = Some(format!("'{}' is already saved", record.text())),
            Err(e) => {
                tracing::error!("failed to save record: {e}");
                self.status = Some("Could not save".to_string());
            }
        }
    }

    fn delete_selected(&mut self, kind: RecordKind) {
        let list = match kind {
            RecordKind::Word => &self.words,
            RecordKind::Sentence => &self.sentences,
        };
        let Some(text) = list.selected_item().map(|r| r.text().to_string()) else {
            return;
        };

        match self.state.delete(kind, &text) {
            Ok(_) => {
                self.status = Some(format!("Deleted '{}'", text));
                self.refresh_data();
            }
            Err(e) => {
                tracing::error!("failed to delete record: {e}");
                self.status = Some("Could not delete".to_string());
            }
        }
    }

    fn toggle_auto_pronounce(&mut self) {
        let mut settings = self.state.settings().clone();
        settings.auto_pronounce = !settings.auto_pronounce;
        self.auto_pronounce = settings.auto_pronounce;
        if let Err(e) = self.state.set_settings(settings) {
            tracing::error!("failed to save settings: {e}");
        }
        self.status = Some(format!(
            "Auto-pronounce {}",
            if self.auto_pronounce { "on" } else { "off" }
        ));
    }

    fn speak(&mut self, text: &str) {
        self.speaker.speak(text);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if self.view == View::Study {
            self.handle_study_key(key);
            return;
        }

        if self.lookup.editing {
            self.handle_lookup_input(key, modifiers);
            return;
        }

        self.status = None;
        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data();
            }

            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => self.view = self.view.prev(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => self.view = self.view.next(),

            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Words => self.words.next(),
                View::Sentences => self.sentences.next(),
                _ => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Words => self.words.previous(),
                View::Sentences => self.sentences.previous(),
                _ => {}
            },
            KeyCode::Char('g') => match self.view {
                View::Words => self.words.first(),
                View::Sentences => self.sentences.first(),
                _ => {}
            },
            KeyCode::Char('G') => match self.view {
                View::Words => self.words.last(),
                View::Sentences => self.sentences.last(),
                _ => {}
            },

            KeyCode::Char('/') | KeyCode::Char('i') if self.view == View::Lookup => {
                self.lookup.editing = true;
            }
            KeyCode::Char('t') if self.view == View::Lookup => {
                self.lookup.kind = match self.lookup.kind {
                    RecordKind::Word => RecordKind::Sentence,
                    RecordKind::Sentence => RecordKind::Word,
                };
                self.reset_lookup();
            }
            KeyCode::Char('a') if self.view == View::Lookup => self.save_lookup_result(),

            KeyCode::Char('p') => {
                let text = match self.view {
                    View::Lookup => self.lookup.result.as_ref().map(|r| r.text().to_string()),
                    View::Words => self.words.selected_item().map(|r| r.text().to_string()),
                    View::Sentences => self.sentences.selected_item().map(|r| r.text().to_string()),
                    _ => None,
                };
                if let Some(text) = text {
                    self.speak(&text);
                }
            }

            KeyCode::Char('d') => match self.view {
                View::Words => self.delete_selected(RecordKind::Word),
                View::Sentences => self.delete_selected(RecordKind::Sentence),
                _ => {}
            },

            KeyCode::Char('s') => match self.view {
                View::Sentences => self.start_study(RecordKind::Sentence, None),
                _ => self.start_study(RecordKind::Word, None),
            },
            KeyCode::Char('S') => self.start_study(RecordKind::Sentence, None),

            KeyCode::Char('A') => self.toggle_auto_pronounce(),

            _ => {}
        }
    }

    fn handle_lookup_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let now = Instant::now();
        match key {
            KeyCode::Esc => {
                self.lookup.editing = false;
            }
            KeyCode::Enter => {
                self.lookup.debouncer.cancel();
                self.lookup.editing = false;
                let query = self.lookup.input.clone();
                self.issue_lookup(query);
            }
            KeyCode::Backspace => {
                self.lookup.input.pop();
                if self.lookup.input.trim().is_empty() {
                    self.reset_lookup();
                } else {
                    self.lookup.debouncer.push(self.lookup.input.clone(), now);
                }
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.lookup.input.clear();
                self.reset_lookup();
            }
            KeyCode::Char(c) => {
                self.lookup.input.push(c);
                self.lookup.debouncer.push(self.lookup.input.clone(), now);
            }
            _ => {}
        }
    }

    fn handle_study_key(&mut self, key: KeyCode) {
        let Some(session) = self.session.as_mut() else {
            self.leave_study();
            return;
        };

        let result = match session.phase() {
            Phase::ModeSelect => match key {
                KeyCode::Char('1') | KeyCode::Char('f') => session.choose_mode(StudyMode::Flashcard),
                KeyCode::Char('2') | KeyCode::Char('t') => session.choose_mode(StudyMode::Typing),
                KeyCode::Char('3') | KeyCode::Char('q') => session.choose_mode(StudyMode::Quiz),
                KeyCode::Esc => {
                    session.cancel();
                    Ok(())
                }
                _ => Ok(()),
            },
            Phase::Complete => match key {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => session.acknowledge().map(|_| ()),
                _ => Ok(()),
            },
            Phase::Exited => Ok(()),
            Phase::Active(mode) => {
                if key == KeyCode::Esc {
                    session.cancel();
                    Ok(())
                } else if let Some(grade) = grade_for_key(key)
                    .filter(|_| mode != StudyMode::Typing || session.is_revealed())
                {
                    let graded = session
                        .grade(grade, srs::now_ms(), &mut self.state, self.speaker.as_mut())
                        .map(|_| ());
                    if graded.is_ok() {
                        self.feedback = None;
                        self.audio_latest.issue();
                    }
                    graded
                } else {
                    match (mode, key) {
                        (StudyMode::Flashcard, KeyCode::Char(' ') | KeyCode::Enter) => session.flip(),
                        (StudyMode::Flashcard, KeyCode::Char('p')) => {
                            if let Some(item) = session.current_item() {
                                self.speaker.speak(item.text());
                            }
                            Ok(())
                        }
                        (StudyMode::Flashcard, KeyCode::Char('r')) => {
                            self.check_pronunciation();
                            return;
                        }
                        (StudyMode::Typing, KeyCode::Enter) if !session.is_revealed() => {
                            session.submit().map(|_| ())
                        }
                        (StudyMode::Typing, KeyCode::Backspace) if !session.is_revealed() => {
                            session.pop_input()
                        }
                        (StudyMode::Typing, KeyCode::Char(c)) if !session.is_revealed() => {
                            session.push_input(c)
                        }
                        (StudyMode::Quiz, KeyCode::Char(c @ 'a'..='d')) => {
                            session.select_option(c as usize - 'a' as usize).map(|_| ())
                        }
                        _ => Ok(()),
                    }
                }
            }
        };

        self.status = result.err().map(|e| e.to_string());

        if self.session.as_ref().map(|s| s.phase()) == Some(Phase::Exited) {
            self.leave_study();
        }
    }
}

fn grade_for_key(key: KeyCode) -> Option<Grade> {
    match key {
        KeyCode::Char('1') => Some(Grade::Fail),
        KeyCode::Char('2') => Some(Grade::Hard),
        KeyCode::Char('3') => Some(Grade::Good),
        KeyCode::Char('4') => Some(Grade::Easy),
        _ => None,
    }
}

pub fn run(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers);
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::fake::FakeClient;
    use crate::models::fixtures::word;
    use crate::speech::SilentSpeaker;
    use crate::store::memory_store;

    fn setup_app(runtime: &tokio::runtime::Runtime, words: &[&str]) -> App {
        setup_app_with(runtime, words, FakeClient::default())
    }

    fn setup_app_with(
        runtime: &tokio::runtime::Runtime,
        words: &[&str],
        client: FakeClient,
    ) -> App {
        let mut state = AppState::load(memory_store()).unwrap();
        for w in words {
            state.save(word(w).into()).unwrap();
        }
        let service = Arc::new(LookupService::new(Arc::new(client)));
        App::new(
            state,
            service,
            Box::new(SilentSpeaker),
            runtime.handle().clone(),
            Duration::from_millis(50),
            PathBuf::from("/nonexistent/attempt.wav"),
        )
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    mod view_tests {
        use super::*;

        #[test]
        fn views_cycle() {
            assert_eq!(View::Dashboard.next(), View::Lookup);
            assert_eq!(View::Sentences.next(), View::Dashboard);
            assert_eq!(View::Dashboard.prev(), View::Sentences);
            assert_eq!(View::Study.next(), View::Study);
        }

        #[test]
        fn stateful_list_wraps() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.previous();
            assert_eq!(list.selected, Some(2));
            list.next();
            assert_eq!(list.selected, Some(0));
        }

        #[test]
        fn stateful_list_empty() {
            let mut list: StatefulList<i32> = StatefulList::with_items(vec![]);
            list.next();
            list.last();
            assert_eq!(list.selected, None);
        }
    }

    mod study_tests {
        use super::*;

        #[test]
        fn flashcard_session_grades_and_persists() {
            let rt = runtime();
            let mut app = setup_app(&rt, &["apple"]);
            assert_eq!(app.word_stats.due_now, 1);

            press(&mut app, KeyCode::Char('s'));
            assert_eq!(app.view, View::Study);
            press(&mut app, KeyCode::Char('1'));
            press(&mut app, KeyCode::Char('3'));
            assert_eq!(
                app.status.as_deref(),
                Some("Reveal the answer before grading")
            );
            press(&mut app, KeyCode::Char(' '));
            press(&mut app, KeyCode::Char('3'));
            assert_eq!(app.session.as_ref().unwrap().phase(), Phase::Complete);

            press(&mut app, KeyCode::Enter);
            assert_eq!(app.view, View::Dashboard);
            assert!(app.session.is_none());
            assert_eq!(app.word_stats.due_now, 0);
            assert_eq!(app.words.items[0].srs().srs_level, 1);
        }

        #[test]
        fn pronunciation_check_locks_flip_until_feedback() {
            let rt = runtime();
            let mut app = setup_app(&rt, &["water"]);
            let path = std::env::temp_dir().join("lexicard_tui_attempt.wav");
            std::fs::write(&path, b"RIFF0000").unwrap();
            app.recording_path = path.clone();

            app.start_study(RecordKind::Word, Some(StudyMode::Flashcard));
            press(&mut app, KeyCode::Char('r'));
            assert!(app.session.as_ref().unwrap().is_audio_check_running());

            press(&mut app, KeyCode::Char(' '));
            assert_eq!(
                app.status.as_deref(),
                Some("Wait for the pronunciation check to finish")
            );

            let deadline = Instant::now() + Duration::from_secs(2);
            while app.feedback.is_none() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(5));
                app.tick(Instant::now());
            }
            assert_eq!(app.feedback.as_ref().unwrap().score, 80);
            assert!(!app.session.as_ref().unwrap().is_audio_check_running());

            press(&mut app, KeyCode::Char(' '));
            assert!(app.session.as_ref().unwrap().card().flipped);
            std::fs::remove_file(path).ok();
        }

        #[test]
        fn late_feedback_is_not_shown_on_the_next_card() {
            let rt = runtime();
            let client = FakeClient {
                slow: Some("pear".to_string()),
                ..Default::default()
            };
            let mut app = setup_app_with(&rt, &["apple", "pear"], client);
            let path = std::env::temp_dir().join("lexicard_tui_late_feedback.wav");
            std::fs::write(&path, b"RIFF0000").unwrap();
            app.recording_path = path.clone();

            let queue: Vec<Record> = vec![word("apple").into(), word("pear").into()];
            let mut session = StudySession::new(queue.clone(), &queue, false, StdRng::seed_from_u64(1));
            session.choose_mode(StudyMode::Flashcard).unwrap();
            app.session = Some(session);
            app.view = View::Study;

            press(&mut app, KeyCode::Char(' '));
            press(&mut app, KeyCode::Char('r'));
            press(&mut app, KeyCode::Char('3'));
            assert_eq!(app.session.as_ref().unwrap().current_item().unwrap().text(), "pear");
            press(&mut app, KeyCode::Char('r'));
            assert!(app.session.as_ref().unwrap().is_audio_check_running());

            // apple's answer lands first; pear's is held back
            std::thread::sleep(Duration::from_millis(10));
            let deadline = Instant::now() + Duration::from_secs(2);
            while app.feedback.is_none() && Instant::now() < deadline {
                app.tick(Instant::now());
                std::thread::sleep(Duration::from_millis(5));
            }

            let feedback = app.feedback.as_ref().unwrap();
            assert_eq!(feedback.feedback_english, "Clear 'pear'");
            assert!(!app.session.as_ref().unwrap().is_audio_check_running());
            std::fs::remove_file(path).ok();
        }

        #[test]
        fn missing_recording_reports_status() {
            let rt = runtime();
            let mut app = setup_app(&rt, &["water"]);
            app.start_study(RecordKind::Word, Some(StudyMode::Flashcard));
            press(&mut app, KeyCode::Char('r'));
            assert!(!app.session.as_ref().unwrap().is_audio_check_running());
            assert!(app.status.as_deref().unwrap().starts_with("Audio unavailable"));
        }

        #[test]
        fn empty_deck_shows_complete_summary() {
            let rt = runtime();
            let mut app = setup_app(&rt, &[]);
            app.start_study(RecordKind::Word, None);
            assert_eq!(app.session.as_ref().unwrap().phase(), Phase::Complete);
            press(&mut app, KeyCode::Esc);
            assert_eq!(app.view, View::Dashboard);
        }

        #[test]
        fn typing_session_accepts_digits_before_submit() {
            let rt = runtime();
            let mut app = setup_app(&rt, &["b2b"]);
            app.start_study(RecordKind::Word, Some(StudyMode::Typing));
            for c in "B2B".chars() {
                press(&mut app, KeyCode::Char(c));
            }
            press(&mut app, KeyCode::Enter);
            let session = app.session.as_ref().unwrap();
            assert_eq!(session.card().correct, Some(true));
        }

        #[test]
        fn cancel_returns_to_previous_view() {
            let rt = runtime();
            let mut app = setup_app(&rt, &["apple", "pear"]);
            app.view = View::Words;
            press(&mut app, KeyCode::Char('s'));
            press(&mut app, KeyCode::Char('3'));
            press(&mut app, KeyCode::Esc);
            assert_eq!(app.view, View::Words);
            assert_eq!(app.word_stats.due_now, 2);
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn typed_query_fires_after_settling_and_can_be_saved() {
            let rt = runtime();
            let mut app = setup_app(&rt, &[]);
            app.view = View::Lookup;
            press(&mut app, KeyCode::Char('/'));
            for c in "Hello".chars() {
                press(&mut app, KeyCode::Char(c));
            }

            app.tick(Instant::now());
            assert!(!app.lookup.loading);

            app.tick(Instant::now() + Duration::from_millis(60));
            assert!(app.lookup.loading);

            let deadline = Instant::now() + Duration::from_secs(2);
            while app.lookup.loading && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(5));
                app.tick(Instant::now());
            }
            assert_eq!(app.lookup.result.as_ref().unwrap().text(), "hello");

            press(&mut app, KeyCode::Esc);
            press(&mut app, KeyCode::Char('a'));
            assert_eq!(app.words.items.len(), 1);
        }

        #[test]
        fn stale_outcome_is_ignored() {
            let rt = runtime();
            let mut app = setup_app(&rt, &[]);
            let stale = app.lookup.latest.issue();
            let _current = app.lookup.latest.issue();

            app.apply_outcome(LookupOutcome {
                ticket: stale,
                kind: RecordKind::Word,
                query: "old".to_string(),
                result: Ok(word("old").into()),
            });
            assert!(app.lookup.result.is_none());
        }

        #[test]
        fn switching_kind_drops_the_lookup_in_flight() {
            let rt = runtime();
            let mut app = setup_app(&rt, &[]);
            app.view = View::Lookup;
            let word_ticket = app.lookup.latest.issue();
            app.lookup.loading = true;

            press(&mut app, KeyCode::Char('t'));
            assert_eq!(app.lookup.kind, RecordKind::Sentence);
            assert!(!app.lookup.loading);

            app.apply_outcome(LookupOutcome {
                ticket: word_ticket,
                kind: RecordKind::Word,
                query: "apple".to_string(),
                result: Ok(word("apple").into()),
            });
            assert!(app.lookup.result.is_none());

            press(&mut app, KeyCode::Char('a'));
            assert!(app.words.items.is_empty());
        }

        #[test]
        fn clearing_input_drops_the_lookup_in_flight() {
            let rt = runtime();
            let mut app = setup_app(&rt, &[]);
            app.view = View::Lookup;
            press(&mut app, KeyCode::Char('/'));
            press(&mut app, KeyCode::Char('x'));
            let ticket = app.lookup.latest.issue();
            app.lookup.loading = true;

            press(&mut app, KeyCode::Backspace);
            assert!(!app.lookup.loading);
            app.tick(Instant::now() + Duration::from_millis(60));
            assert!(!app.lookup.loading);

            app.apply_outcome(LookupOutcome {
                ticket,
                kind: RecordKind::Word,
                query: "x".to_string(),
                result: Ok(word("x").into()),
            });
            assert!(app.lookup.result.is_none());
        }
    }

    #[test]
    fn toggle_auto_pronounce_persists() {
        let rt = runtime();
        let mut app = setup_app(&rt, &[]);
        press(&mut app, KeyCode::Char('A'));
        assert!(app.auto_pronounce);
        assert!(app.state.settings().auto_pronounce);
    }
}
