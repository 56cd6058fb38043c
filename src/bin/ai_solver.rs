use checkers_engine::config::{CaptureRule, EngineConfig, Strategy};
use checkers_engine::engine::GameState;
use checkers_engine::solver::{search_best_sequence, ComputerPlayer};
use checkers_engine::wire::{sequence_to_json, state_from_json};
use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Print the move the computer would play", long_about = None)]
struct Args {
    /// Depth limit for the lookahead search
    #[clap(short, long)]
    depth: Option<u32>,

    /// Strategy used to choose the move
    #[clap(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Whether a player who can jump must jump
    #[clap(long, value_enum)]
    capture_rule: Option<CaptureRule>,

    /// Seed for the greedy tie-breaker
    #[clap(long)]
    seed: Option<u64>,

    /// Path to a TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log level written to stderr
    #[clap(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Path to the game state file (JSON wire format)
    state_file: PathBuf,
}

fn read_state_file(path: &Path) -> Result<GameState, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    state_from_json(&content).map_err(|e| format!("Invalid game state in {}: {}", path.display(), e))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(depth) = args.depth {
        config.search.depth = depth;
    }
    if let Some(strategy) = args.strategy {
        config.search.strategy = strategy;
    }
    if let Some(capture_rule) = args.capture_rule {
        config.rules.capture_rule = capture_rule;
    }
    if args.seed.is_some() {
        config.search.seed = args.seed;
    }
    config.validate()?;

    let state = read_state_file(&args.state_file)?;
    info!(
        file = %args.state_file.display(),
        turn = %state.turn(),
        strategy = ?config.search.strategy,
        depth = config.search.depth,
        "loaded game state"
    );

    let chosen = match config.search.strategy {
        Strategy::Lookahead => {
            search_best_sequence(&state, &config.rules, config.search.depth)?.map(|result| {
                info!(score = result.score, nodes = result.nodes, "search complete");
                result.sequence
            })
        }
        Strategy::Greedy => ComputerPlayer::new(config).formulate_turn(&state),
    };

    match chosen {
        Some(sequence) => println!("{}", sequence_to_json(&sequence)?),
        None => println!("null"),
    }
    Ok(())
}
