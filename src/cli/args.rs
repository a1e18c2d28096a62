//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a score threshold; NaN and infinities would filter every gesture.
pub fn parse_min_score(s: &str) -> Result<f32, String> {
    let score: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !score.is_finite() {
        return Err(format!("Minimum score must be a finite number, got {}", s));
    }
    Ok(score)
}

/// Parse a round count (at least 1).
fn parse_rounds(s: &str) -> Result<u32, String> {
    let rounds: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid round count", s))?;
    if rounds == 0 {
        return Err("Rounds must be at least 1".to_string());
    }
    Ok(rounds)
}

/// Play a five-letter word game with hand signs
#[derive(Parser, Debug)]
#[command(name = "handle")]
#[command(version, about = "Five-letter word game played with hand signs", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one round from a stream of classified frames (JSON lines)
    Play(PlayArgs),
    /// Score a single guess against a target word
    Evaluate {
        /// The five-letter guess
        guess: String,
        /// The five-letter target
        target: String,
    },
    /// Print a target word from the configured source
    Word {
        /// Fetch from the random word API
        #[arg(long)]
        online: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PlayArgs {
    /// Frame stream to read ("-" for stdin)
    #[arg(long, short, default_value = "-")]
    pub frames: PathBuf,

    /// Target word (default: from config or word list)
    #[arg(long, short)]
    pub target: Option<String>,

    /// Fetch the target word from the random word API
    #[arg(long)]
    pub online: bool,

    /// Dwell time in milliseconds before a held gesture is accepted
    #[arg(long)]
    pub dwell_ms: Option<u64>,

    /// Ignore gestures scoring below this value
    #[arg(long, value_parser = parse_min_score)]
    pub min_score: Option<f32>,

    /// Submit as soon as five letters are accepted
    #[arg(long)]
    pub auto_submit: bool,

    /// Replay recorded frames at their recorded pace
    #[arg(long)]
    pub realtime: bool,

    /// Keep reading frames after the round ends
    #[arg(long)]
    pub keep_going: bool,

    /// Play this many rounds, with a new target word each round
    #[arg(long, short, default_value_t = 1, value_parser = parse_rounds, conflicts_with = "keep_going")]
    pub rounds: u32,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(args: Args) -> PlayArgs {
        match args.command {
            Command::Play(play) => play,
            other => panic!("Expected Play subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_play_defaults() {
        let args = play(Args::parse_from(["handle", "play"]));
        assert_eq!(args.frames, PathBuf::from("-"));
        assert!(args.target.is_none());
        assert!(!args.online);
        assert!(args.dwell_ms.is_none());
        assert!(args.min_score.is_none());
        assert!(!args.auto_submit);
        assert!(!args.realtime);
        assert!(!args.keep_going);
        assert_eq!(args.rounds, 1);
    }

    #[test]
    fn test_min_score_must_be_finite() {
        for bad in ["NaN", "inf", "-inf", "high"] {
            let result = Args::try_parse_from(["handle", "play", "--min-score", bad]);
            assert!(result.is_err(), "--min-score {} should be rejected", bad);
        }
        assert_eq!(parse_min_score("6.5"), Ok(6.5));
    }

    #[test]
    fn test_rounds() {
        let args = play(Args::parse_from(["handle", "play", "--rounds", "3"]));
        assert_eq!(args.rounds, 3);

        assert!(Args::try_parse_from(["handle", "play", "--rounds", "0"]).is_err());
        assert!(Args::try_parse_from(["handle", "play", "-r", "2", "--keep-going"]).is_err());
    }

    #[test]
    fn test_play_options() {
        let args = play(Args::parse_from([
            "handle",
            "play",
            "--frames",
            "session.jsonl",
            "-t",
            "apple",
            "--dwell-ms",
            "1500",
            "--min-score",
            "6.5",
            "--auto-submit",
            "--realtime",
        ]));
        assert_eq!(args.frames, PathBuf::from("session.jsonl"));
        assert_eq!(args.target, Some("apple".to_string()));
        assert_eq!(args.dwell_ms, Some(1500));
        assert_eq!(args.min_score, Some(6.5));
        assert!(args.auto_submit);
        assert!(args.realtime);
    }

    #[test]
    fn test_evaluate_subcommand() {
        let args = Args::parse_from(["handle", "evaluate", "sassy", "basic"]);
        match args.command {
            Command::Evaluate { guess, target } => {
                assert_eq!(guess, "sassy");
                assert_eq!(target, "basic");
            }
            other => panic!("Expected Evaluate subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_word_subcommand() {
        let args = Args::parse_from(["handle", "word", "--online"]);
        assert!(matches!(args.command, Command::Word { online: true }));
    }

    #[test]
    fn test_global_config_option() {
        let args = Args::parse_from(["handle", "play", "--config", "/tmp/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));

        let args = Args::parse_from(["handle", "-c", "/tmp/test.toml", "word"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn test_config_subcommands() {
        let args = Args::parse_from(["handle", "config", "show"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));

        let args = Args::parse_from(["handle", "config", "init"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
    }
}
