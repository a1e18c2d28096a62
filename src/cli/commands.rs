//! Subcommand handlers.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

use super::args::{ConfigAction, PlayArgs};
use crate::config::{default_path as get_config_path, Config, ConfigError, DEFAULT_CONFIG_TOML};
use crate::confirm::DwellProgress;
use crate::evaluate::{evaluate_str, Word, WordError};
use crate::frame_loop::{self, FrameLoopError, LoopObserver, LoopOptions, LoopSummary, Pacing};
use crate::frames::{FrameSource, JsonLinesSource, ThreadedSource};
use crate::game::GameStatus;
use crate::gesture::{Gesture, GestureVocabulary};
use crate::session::{Session, SessionEvent, SessionSettings};
use crate::words::{
    FixedWord, RandomWordClient, WordApiError, WordList, WordProvider, WordSourceError,
};

/// Errors surfaced to the user by a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Invalid word: {0}")]
    Word(#[from] WordError),

    #[error("Word list: {0}")]
    WordSource(#[from] WordSourceError),

    #[error("Word API: {0}")]
    WordApi(#[from] WordApiError),

    #[error("{0}")]
    FrameLoop(#[from] FrameLoopError),

    #[error("Failed to open frame stream '{path}': {source}")]
    OpenFrames {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid min_score {0}: must be a finite number")]
    InvalidMinScore(f32),

    #[error("Failed to create async runtime: {0}")]
    Runtime(io::Error),

    #[error("Config file already exists: {0}")]
    ConfigExists(String),

    #[error("Failed to write config file: {0}")]
    WriteConfig(io::Error),
}

/// Merge settings: CLI args > config file > built-in defaults.
pub fn session_settings(args: &PlayArgs, cfg: &Config) -> SessionSettings {
    SessionSettings {
        dwell: Duration::from_millis(args.dwell_ms.unwrap_or(cfg.gestures.dwell_ms)),
        auto_submit: args.auto_submit || cfg.game.auto_submit,
    }
}

/// Score threshold from --min-score or the config file. Non-finite values are
/// rejected; a NaN threshold would drop every gesture.
pub fn resolve_min_score(args: &PlayArgs, cfg: &Config) -> Result<Option<f32>, CommandError> {
    match args.min_score.or(cfg.gestures.min_score) {
        Some(min) if !min.is_finite() => Err(CommandError::InvalidMinScore(min)),
        other => Ok(other),
    }
}

/// Pick the round's target: --target, then config target, then the API (with
/// --online), then the configured or built-in list.
pub fn resolve_target(
    target: Option<&str>,
    online: bool,
    cfg: &Config,
) -> Result<Word, CommandError> {
    if let Some(t) = target.or(cfg.words.target.as_deref()) {
        return Ok(FixedWord(Word::parse(t)?).next_word()?);
    }

    if online {
        match fetch_online_word(cfg) {
            Ok(word) => return Ok(word),
            Err(e) => log::warn!("Falling back to local word list: {}", e),
        }
    }

    let mut list = if cfg.words.list.is_empty() {
        WordList::builtin()
    } else {
        WordList::new(&cfg.words.list)?
    };
    Ok(list.next_word()?)
}

fn fetch_online_word(cfg: &Config) -> Result<Word, CommandError> {
    let client = match cfg.words.api_url.as_ref() {
        Some(url) => RandomWordClient::with_base_url(url.clone())?,
        None => RandomWordClient::new()?,
    };

    let rt = tokio::runtime::Runtime::new().map_err(CommandError::Runtime)?;
    Ok(rt.block_on(client.fetch_word_with_retry())?)
}

fn open_frames(
    path: &Path,
    vocabulary: GestureVocabulary,
    min_score: Option<f32>,
) -> Result<Box<dyn FrameSource>, CommandError> {
    let min_score = min_score.unwrap_or(f32::NEG_INFINITY);

    // Reading happens on a background thread so Ctrl+C is noticed even when
    // the stream is quiet.
    if path == Path::new("-") {
        let source = JsonLinesSource::new(BufReader::new(io::stdin()), vocabulary);
        return Ok(Box::new(ThreadedSource::spawn(source.with_min_score(min_score))));
    }

    let file = File::open(path).map_err(|source| CommandError::OpenFrames {
        path: path.display().to_string(),
        source,
    })?;
    let source = JsonLinesSource::new(BufReader::new(file), vocabulary);
    Ok(Box::new(ThreadedSource::spawn(source.with_min_score(min_score))))
}

/// Play one or more rounds from a frame stream.
pub fn run_play(args: &PlayArgs, cfg: &Config) -> Result<(), CommandError> {
    let target = resolve_target(args.target.as_deref(), args.online, cfg)?;
    let settings = session_settings(args, cfg);
    let min_score = resolve_min_score(args, cfg)?;
    let vocabulary = GestureVocabulary::new(cfg.gestures.confirm_names.iter().cloned());
    let mut source = open_frames(&args.frames, vocabulary, min_score)?;

    log::info!(
        "Starting: dwell {:?}, auto-submit {}, {} round(s)",
        settings.dwell,
        settings.auto_submit,
        args.rounds
    );
    let mut session = Session::new(target, settings);

    if let Err(e) = frame_loop::setup_ctrlc_handler() {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let options = LoopOptions {
        pacing: if args.realtime {
            Pacing::Realtime
        } else {
            Pacing::Immediate
        },
        stop_when_over: !args.keep_going,
    };

    for round in 1..=args.rounds {
        if round > 1 {
            session.new_round(resolve_target(args.target.as_deref(), args.online, cfg)?);
        }
        if args.rounds > 1 {
            println!("== Round {} of {} ==", round, args.rounds);
        }

        let mut view = ConsoleView::default();
        let summary = frame_loop::run_observed(
            source.as_mut(),
            &mut session,
            frame_loop::ctrlc_flag(),
            options,
            &mut view,
        )?;
        print_round(&session, &summary);

        if summary.interrupted || !session.status().is_over() {
            break;
        }
    }

    Ok(())
}

fn print_round(session: &Session, summary: &LoopSummary) {
    println!();
    for row in session.rows() {
        println!("  {}", row);
    }
    match session.status() {
        GameStatus::Won => println!("You won in {} guess(es)!", session.rows().len()),
        GameStatus::Lost => println!("You lost. The word was {}.", session.target()),
        GameStatus::InProgress => {
            if !session.buffer().is_empty() {
                println!("Unsubmitted letters: {}", session.buffer().as_string());
            }
            println!("Round not finished.");
        }
    }
    println!(
        "{} frame(s), {} skipped, {} letter(s), {} guess(es){}",
        summary.frames,
        summary.skipped,
        summary.letters,
        summary.guesses,
        if summary.interrupted { ", interrupted" } else { "" }
    );
}

/// Terminal output for `handle play`: events plus a dwell countdown that is
/// redrawn when the held gesture changes or a whole second ticks over.
#[derive(Debug, Default)]
struct ConsoleView {
    shown: Option<(Gesture, u64)>,
}

impl LoopObserver for ConsoleView {
    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::LetterAccepted { letter, buffer } => {
                println!("Letter {}  [{:_<5}]", letter, buffer);
            }
            SessionEvent::GuessScored { row, status } => {
                println!("Guess  {}  ({:?})", row, status);
            }
        }
    }

    fn on_frame(&mut self, session: &Session, now: Duration) {
        let Some(progress) = session.progress(now) else {
            self.shown = None;
            return;
        };

        let key = (progress.candidate, seconds_left(&progress));
        if self.shown != Some(key) {
            println!("{}", format_countdown(&progress));
            self.shown = Some(key);
        }
    }
}

fn seconds_left(progress: &DwellProgress) -> u64 {
    progress.remaining.as_millis().div_ceil(1000) as u64
}

/// One countdown line, e.g. `  A  [####------] 2s  score 8.5`.
fn format_countdown(progress: &DwellProgress) -> String {
    const WIDTH: usize = 10;
    let filled = ((progress.fraction() * WIDTH as f32).round() as usize).min(WIDTH);
    let score = progress
        .score
        .map(|s| format!("  score {:.1}", s))
        .unwrap_or_default();
    format!(
        "  {}  [{}{}] {}s{}",
        progress.candidate,
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        seconds_left(progress),
        score
    )
}

/// Score one guess and print the feedback row.
pub fn run_evaluate(guess: &str, target: &str) -> Result<(), CommandError> {
    let row = evaluate_str(guess, target)?;
    println!("{}", row);
    for entry in row.feedback() {
        println!("  {}  {:?}", entry.letter, entry.status);
    }
    Ok(())
}

/// Print a target word.
pub fn run_word(online: bool, cfg: &Config) -> Result<(), CommandError> {
    let word = resolve_target(None, online, cfg)?;
    println!("{}", word);
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, cfg: &Config) -> Result<(), CommandError> {
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Dwell: {} ms", cfg.gestures.dwell_ms);
            match cfg.gestures.min_score {
                Some(min) => println!("  Min score: {}", min),
                None => println!("  Min score: none"),
            }
            println!("  Confirm labels: {}", cfg.gestures.confirm_names.join(", "));
            println!(
                "  Auto-submit: {}",
                if cfg.game.auto_submit { "yes" } else { "no" }
            );
            match cfg.words.target.as_deref() {
                Some(t) => println!("  Target: {}", t),
                None if cfg.words.list.is_empty() => println!("  Words: built-in list"),
                None => println!("  Words: {} configured", cfg.words.list.len()),
            }
            println!();

            let config_path = get_config_path();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            let config_path = get_config_path();

            if config_path.exists() {
                return Err(CommandError::ConfigExists(
                    config_path.display().to_string(),
                ));
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).map_err(CommandError::WriteConfig)?;
            }
            std::fs::write(&config_path, DEFAULT_CONFIG_TOML).map_err(CommandError::WriteConfig)?;

            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}
