use clap::Parser;

use handle::cli::{self, Args, Command};
use handle::config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    // If --config is specified, require the file to exist.
    // Otherwise, fall back to defaults if the default config is missing or broken.
    let cfg = match args.config.as_deref() {
        Some(path) => match Config::load_from_explicit(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => match Config::load(None) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        },
    };

    let result = match args.command {
        Command::Play(play) => cli::run_play(&play, &cfg),
        Command::Evaluate { guess, target } => cli::run_evaluate(&guess, &target),
        Command::Word { online } => cli::run_word(online, &cfg),
        Command::Config { action } => cli::handle_config_action(action, &cfg),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
