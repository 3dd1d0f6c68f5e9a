mod app;
mod audio;
mod cache;
mod config;
mod debounce;
mod gemini;
mod lookup;
mod models;
mod session;
mod sheet;
mod speech;
mod srs;
mod store;
mod tui;

use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use app::AppState;
use audio::AudioSample;
use config::Config;
use gemini::GeminiClient;
use lookup::LookupService;
use models::{Grade, JsonOutput, Record, RecordKind};
use session::StudyMode;
use sheet::SheetExporter;
use speech::{CommandSpeaker, SilentSpeaker, Speaker};
use store::SqliteStore;
use tui::truncate;

#[derive(Parser)]
#[command(name = "lexicard")]
#[command(about = "Look up English words and sentences, save them and review them with spaced repetition")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Look up a word
    Word {
        text: String,

        /// Save the result to the word deck
        #[arg(long, short)]
        save: bool,
    },

    /// Analyze a sentence
    Sentence {
        text: String,

        /// Save the result to the sentence deck
        #[arg(long, short)]
        save: bool,
    },

    /// Get feedback on a recorded pronunciation attempt
    Pronounce {
        /// Text that was spoken
        text: String,

        /// Recording of the attempt (wav, mp3, ogg, webm, m4a, ...)
        #[arg(long, short)]
        audio: PathBuf,
    },

    /// Manage saved words and sentences
    #[command(subcommand)]
    Deck(DeckCommands),

    /// List items due for review
    Due {
        /// Only this deck: word/sentence
        #[arg(long, short)]
        kind: Option<String>,
    },

    /// Grade a saved item without opening a session
    Review {
        text: String,

        /// Recall grade: fail/hard/good/easy
        #[arg(long, short)]
        grade: String,

        /// The item is a sentence
        #[arg(long)]
        sentence: bool,
    },

    /// Show deck statistics
    Stats,

    /// View or change settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Review due items in the terminal UI
    Study {
        /// Study the sentence deck instead of words
        #[arg(long)]
        sentences: bool,

        /// Skip mode selection: flashcard/typing/quiz
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Launch interactive terminal UI
    Tui,
}

#[derive(Subcommand)]
enum DeckCommands {
    /// List saved items
    List {
        /// List sentences instead of words
        #[arg(long)]
        sentences: bool,
    },

    /// Show a saved item
    Show {
        text: String,

        #[arg(long)]
        sentence: bool,
    },

    /// Delete a saved item
    Delete {
        text: String,

        #[arg(long)]
        sentence: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,

    /// Change settings
    Set {
        /// Webhook that receives newly saved items; empty string clears it
        #[arg(long)]
        sheet_url: Option<String>,

        /// Speak the next card automatically in flashcard mode
        #[arg(long)]
        auto_pronounce: Option<bool>,
    },
}

fn kind_for(sentence: bool) -> RecordKind {
    if sentence {
        RecordKind::Sentence
    } else {
        RecordKind::Word
    }
}

fn init_logging(config: &Config, interactive: bool) {
    let default_level = if interactive { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("LEXICARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // The alternate screen owns stderr while the TUI runs
    if interactive {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path());
        if let Ok(file) = file {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_state(config: &Config) -> Result<AppState<SqliteStore>, Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&config.db_path)?;
    store.init()?;
    Ok(AppState::load(store)?)
}

fn lookup_service(config: &Config) -> Arc<LookupService> {
    Arc::new(LookupService::new(Arc::new(GeminiClient::from_config(config))))
}

fn speaker(config: &Config) -> Box<dyn Speaker> {
    match CommandSpeaker::from_command_line(&config.tts_command) {
        Some(speaker) => Box::new(speaker),
        None => Box::new(SilentSpeaker),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    config.ensure_data_dir()?;
    let interactive = matches!(cli.command, Commands::Tui | Commands::Study { .. });
    init_logging(&config, interactive);

    let mut state = open_state(&config)?;

    match cli.command {
        Commands::Init => {
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Database initialized at: {}", config.db_path.display());
            }
        }

        Commands::Word { text, save } => {
            lookup_and_print(&config, &mut state, RecordKind::Word, &text, save, cli.json)?;
        }

        Commands::Sentence { text, save } => {
            lookup_and_print(&config, &mut state, RecordKind::Sentence, &text, save, cli.json)?;
        }

        Commands::Pronounce { text, audio } => {
            let sample = AudioSample::load(&audio)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let service = lookup_service(&config);

            match runtime.block_on(service.check_pronunciation(&text, &sample)) {
                Ok(feedback) => {
                    if cli.json {
                        println!("{}", serde_json::to_string(&JsonOutput::ok(&feedback))?);
                    } else {
                        println!("Score: {}/100", feedback.score);
                        println!();
                        println!("{}", feedback.feedback_english);
                        if !feedback.feedback_native.is_empty() {
                            println!("{}", feedback.feedback_native);
                        }
                        if !feedback.tips.is_empty() {
                            println!();
                            println!("Tips:");
                            for tip in &feedback.tips {
                                println!("  - {}", tip);
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("pronunciation check failed: {e}");
                    if cli.json {
                        println!("{}", serde_json::to_string(&JsonOutput::<()>::err(e.to_string()))?);
                    } else {
                        println!("Could not check pronunciation: {}", e);
                    }
                }
            }
        }

        Commands::Deck(deck_cmd) => match deck_cmd {
            DeckCommands::List { sentences } => {
                let kind = kind_for(sentences);
                let deck = state.deck(kind);
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(&deck))?);
                } else if deck.is_empty() {
                    println!("No {} saved.", kind.label().to_lowercase());
                } else {
                    println!("{:<40} {:<12} NEXT REVIEW", kind.label().to_uppercase(), "MASTERY");
                    println!("{}", "-".repeat(70));
                    for record in &deck {
                        println!(
                            "{:<40} {:<12} {}",
                            truncate(record.text(), 38),
                            record.srs().mastery_label(),
                            record.srs().next_review_label()
                        );
                    }
                }
            }

            DeckCommands::Show { text, sentence } => {
                let kind = kind_for(sentence);
                if let Some(record) = state.find(kind, &text) {
                    if cli.json {
                        println!("{}", serde_json::to_string(&JsonOutput::ok(&record))?);
                    } else {
                        print_record(&record);
                        println!();
                        println!(
                            "Mastery: {} (level {})",
                            record.srs().mastery_label(),
                            record.srs().level()
                        );
                        println!("Next review: {}", record.srs().next_review_label());
                    }
                } else if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::<()>::err("Item not found"))?
                    );
                } else {
                    println!("Item not found.");
                }
            }

            DeckCommands::Delete { text, sentence } => {
                if state.delete(kind_for(sentence), &text)? {
                    if cli.json {
                        println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
                    } else {
                        println!("Deleted '{}'.", text);
                    }
                } else if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::<()>::err("Item not found"))?
                    );
                } else {
                    println!("Item not found.");
                }
            }
        },

        Commands::Due { kind } => {
            let kinds = match kind {
                Some(k) => vec![RecordKind::from_str(&k)
                    .ok_or_else(|| format!("Invalid kind '{}'. Use: word or sentence", k))?],
                None => vec![RecordKind::Word, RecordKind::Sentence],
            };

            let now = srs::now_ms();
            let due: Vec<Record> = kinds.iter().flat_map(|k| state.due(*k, now)).collect();

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&due))?);
            } else if due.is_empty() {
                println!("Nothing is due. Come back later!");
            } else {
                println!("{:<10} {:<40} MASTERY", "KIND", "ITEM");
                println!("{}", "-".repeat(64));
                for record in &due {
                    println!(
                        "{:<10} {:<40} {}",
                        record.kind().as_str(),
                        truncate(record.text(), 38),
                        record.srs().mastery_label()
                    );
                }
                println!();
                println!("Start a session with: lexicard study");
            }
        }

        Commands::Review {
            text,
            grade,
            sentence,
        } => {
            let grade = Grade::from_str(&grade).ok_or_else(|| {
                format!("Invalid grade '{}'. Use: fail, hard, good, or easy", grade)
            })?;
            let kind = kind_for(sentence);
            let record = state
                .find(kind, &text)
                .ok_or_else(|| format!("'{}' is not in the {} deck", text, kind.as_str()))?;

            let updated = srs::rate(&record, grade, srs::now_ms());
            state.replace(&updated)?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&updated))?);
            } else {
                println!("Graded '{}' as {}.", updated.text(), grade.label());
                println!(
                    "New level: {} ({})",
                    updated.srs().level(),
                    updated.srs().mastery_label()
                );
                println!("Next review: {}", updated.srs().next_review_label());
            }
        }

        Commands::Stats => {
            let now = srs::now_ms();
            let words = state.stats(RecordKind::Word, now);
            let sentences = state.stats(RecordKind::Sentence, now);
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "words": words,
                        "sentences": sentences
                    })))?
                );
            } else {
                println!("=== Deck Statistics ===");
                for (kind, stats) in [(RecordKind::Word, words), (RecordKind::Sentence, sentences)] {
                    println!();
                    println!("{}", kind.label());
                    println!("  Saved: {}", stats.total);
                    println!("  Due for review: {}", stats.due_now);
                    println!("  Mastered (level 4+): {}", stats.mastered);
                    println!("  Average level: {:.1}/{}", stats.avg_level, srs::last_level());
                }
            }
        }

        Commands::Settings(settings_cmd) => match settings_cmd {
            SettingsCommands::Show => {
                let settings = state.settings();
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(settings))?);
                } else {
                    println!(
                        "Sheet URL: {}",
                        settings.sheet_url.as_deref().unwrap_or("-")
                    );
                    println!(
                        "Auto-pronounce: {}",
                        if settings.auto_pronounce { "on" } else { "off" }
                    );
                }
            }

            SettingsCommands::Set {
                sheet_url,
                auto_pronounce,
            } => {
                let mut settings = state.settings().clone();
                if let Some(url) = sheet_url {
                    let url = url.trim();
                    settings.sheet_url = if url.is_empty() {
                        None
                    } else {
                        Some(url.to_string())
                    };
                }
                if let Some(on) = auto_pronounce {
                    settings.auto_pronounce = on;
                }
                state.set_settings(settings)?;

                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
                } else {
                    println!("Settings updated.");
                }
            }
        },

        Commands::Study { sentences, mode } => {
            let mode = match mode {
                Some(m) => Some(StudyMode::from_str(&m).ok_or_else(|| {
                    format!("Invalid mode '{}'. Use: flashcard, typing, or quiz", m)
                })?),
                None => None,
            };
            run_tui(&config, state, Some((kind_for(sentences), mode)))?;
        }

        Commands::Tui => {
            run_tui(&config, state, None)?;
        }
    }

    Ok(())
}

fn lookup_and_print(
    config: &Config,
    state: &mut AppState<SqliteStore>,
    kind: RecordKind,
    text: &str,
    save: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let service = lookup_service(config);

    let record = match runtime.block_on(service.lookup(kind, text)) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(kind = kind.as_str(), "lookup failed: {e}");
            if json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::err(e.to_string()))?);
            } else {
                println!("No result found.");
            }
            return Ok(());
        }
    };

    let saved = if save {
        let saved = state.save(record.clone())?;
        if saved {
            if let Some(exporter) = SheetExporter::from_setting(state.settings().sheet_url.as_deref()) {
                runtime.block_on(exporter.export_quietly(&record));
            }
        }
        Some(saved)
    } else {
        None
    };

    if json {
        println!(
            "{}",
            serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                "record": record,
                "saved": saved
            })))?
        );
    } else {
        print_record(&record);
        match saved {
            Some(true) => println!("\nSaved to {}.", kind.label().to_lowercase()),
            Some(false) => println!("\nAlready saved."),
            None => {}
        }
    }

    Ok(())
}

fn print_record(record: &Record) {
    match record {
        Record::Word(w) => {
            println!("{}  /{}/  {}", w.word, w.ipa.trim_matches('/'), w.part_of_speech);
            println!();
            println!("{}", w.meaning);
            println!("{}", w.definition);
            if !w.examples.is_empty() {
                println!();
                println!("Examples:");
                for ex in &w.examples {
                    println!("  - {}", ex.english);
                    if !ex.translation.is_empty() {
                        println!("    {}", ex.translation);
                    }
                }
            }
            if !w.synonyms.is_empty() {
                println!("Synonyms: {}", w.synonyms.join(", "));
            }
            if !w.antonyms.is_empty() {
                println!("Antonyms: {}", w.antonyms.join(", "));
            }
            if let Some(mnemonic) = &w.mnemonic {
                println!("Mnemonic: {}", mnemonic);
            }
        }
        Record::Sentence(s) => {
            println!("{}", s.sentence);
            println!();
            println!("{}", s.translation);
            println!("Naturalness: {}/100", s.naturalness);
            if !s.grammar.is_empty() {
                println!();
                println!("Grammar:");
                for point in &s.grammar {
                    println!("  {}: {}", point.segment, point.explanation);
                }
            }
            if !s.usage.is_empty() {
                println!();
                println!("Usage: {}", s.usage);
            }
            if !s.similar.is_empty() {
                println!();
                println!("Similar:");
                for ex in &s.similar {
                    println!("  - {}", ex.english);
                    if !ex.translation.is_empty() {
                        println!("    {}", ex.translation);
                    }
                }
            }
        }
    }
}

fn run_tui(
    config: &Config,
    state: AppState<SqliteStore>,
    preset: Option<(RecordKind, Option<StudyMode>)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = tui::App::new(
        state,
        lookup_service(config),
        speaker(config),
        runtime.handle().clone(),
        config.debounce,
        config.recording_path.clone(),
    );

    if let Some((kind, mode)) = preset {
        app.start_study(kind, mode);
    }

    tui::run(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn parse_init_with_json() {
            let cli = Cli::try_parse_from(["lexicard", "--json", "init"]).unwrap();
            assert!(cli.json);
            assert!(matches!(cli.command, Commands::Init));
        }

        #[test]
        fn parse_word_lookup() {
            let cli = Cli::try_parse_from(["lexicard", "word", "serendipity"]).unwrap();
            match cli.command {
                Commands::Word { text, save } => {
                    assert_eq!(text, "serendipity");
                    assert!(!save);
                }
                _ => panic!("Expected Word command"),
            }
        }

        #[test]
        fn parse_sentence_with_save() {
            let cli =
                Cli::try_parse_from(["lexicard", "sentence", "How have you been?", "-s"]).unwrap();
            match cli.command {
                Commands::Sentence { text, save } => {
                    assert_eq!(text, "How have you been?");
                    assert!(save);
                }
                _ => panic!("Expected Sentence command"),
            }
        }

        #[test]
        fn parse_pronounce_requires_audio() {
            assert!(Cli::try_parse_from(["lexicard", "pronounce", "water"]).is_err());

            let cli = Cli::try_parse_from(["lexicard", "pronounce", "water", "--audio", "a.wav"])
                .unwrap();
            match cli.command {
                Commands::Pronounce { text, audio } => {
                    assert_eq!(text, "water");
                    assert_eq!(audio, PathBuf::from("a.wav"));
                }
                _ => panic!("Expected Pronounce command"),
            }
        }

        #[test]
        fn parse_deck_list_sentences() {
            let cli = Cli::try_parse_from(["lexicard", "deck", "list", "--sentences"]).unwrap();
            match cli.command {
                Commands::Deck(DeckCommands::List { sentences }) => assert!(sentences),
                _ => panic!("Expected Deck List command"),
            }
        }

        #[test]
        fn parse_deck_delete() {
            let cli = Cli::try_parse_from(["lexicard", "deck", "delete", "apple"]).unwrap();
            match cli.command {
                Commands::Deck(DeckCommands::Delete { text, sentence }) => {
                    assert_eq!(text, "apple");
                    assert!(!sentence);
                }
                _ => panic!("Expected Deck Delete command"),
            }
        }

        #[test]
        fn parse_review_command() {
            let cli =
                Cli::try_parse_from(["lexicard", "review", "apple", "--grade", "easy"]).unwrap();
            match cli.command {
                Commands::Review {
                    text,
                    grade,
                    sentence,
                } => {
                    assert_eq!(text, "apple");
                    assert_eq!(grade, "easy");
                    assert!(!sentence);
                }
                _ => panic!("Expected Review command"),
            }
        }

        #[test]
        fn parse_settings_set() {
            let cli = Cli::try_parse_from([
                "lexicard",
                "settings",
                "set",
                "--auto-pronounce",
                "true",
                "--sheet-url",
                "https://example.com/hook",
            ])
            .unwrap();
            match cli.command {
                Commands::Settings(SettingsCommands::Set {
                    sheet_url,
                    auto_pronounce,
                }) => {
                    assert_eq!(sheet_url, Some("https://example.com/hook".to_string()));
                    assert_eq!(auto_pronounce, Some(true));
                }
                _ => panic!("Expected Settings Set command"),
            }
        }

        #[test]
        fn parse_study_with_mode() {
            let cli =
                Cli::try_parse_from(["lexicard", "study", "--sentences", "-m", "quiz"]).unwrap();
            match cli.command {
                Commands::Study { sentences, mode } => {
                    assert!(sentences);
                    assert_eq!(mode, Some("quiz".to_string()));
                }
                _ => panic!("Expected Study command"),
            }
        }

        #[test]
        fn parse_json_flag_global() {
            let cli = Cli::try_parse_from(["lexicard", "stats", "--json"]).unwrap();
            assert!(cli.json);
        }

        #[test]
        fn parse_missing_required_arg_fails() {
            assert!(Cli::try_parse_from(["lexicard", "word"]).is_err());
            assert!(Cli::try_parse_from(["lexicard", "review", "apple"]).is_err());
            assert!(Cli::try_parse_from(["lexicard", "invalid"]).is_err());
        }
    }

    #[test]
    fn kind_for_flag() {
        assert_eq!(kind_for(false), RecordKind::Word);
        assert_eq!(kind_for(true), RecordKind::Sentence);
    }
}
