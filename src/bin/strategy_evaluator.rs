use checkers_engine::config::{CaptureRule, EngineConfig, Rules, Strategy};
use checkers_engine::engine::{Color, GameState};
use checkers_engine::solver::ComputerPlayer;
use clap::Parser;
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Pit the computer strategies against each other", long_about = None)]
struct Args {
    /// Number of games to play
    #[clap(short, long, default_value_t = 20)]
    games: u32,

    /// Seed of the first game; game i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Search depth for the lookahead strategy
    #[clap(short, long)]
    depth: Option<u32>,

    /// Plies after which a game is scored as a draw
    #[clap(long, default_value_t = 200)]
    max_plies: u32,

    /// Whether a player who can jump must jump
    #[clap(long, value_enum)]
    capture_rule: Option<CaptureRule>,

    /// Path to a TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log level written to stderr
    #[clap(long, default_value = "warn")]
    log_level: tracing::Level,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GameResult {
    Won(Color),
    Draw,
}

/// Plays one game between two computer players. A side that cannot produce a
/// move resigns.
fn play_game(
    rules: &Rules,
    red: &mut ComputerPlayer,
    black: &mut ComputerPlayer,
    max_plies: u32,
) -> (GameResult, u32) {
    let mut state = GameState::new();
    for ply in 0..max_plies {
        if let Some(winner) = rules.winner(&state) {
            return (GameResult::Won(winner), ply);
        }
        let mover = state.turn();
        let player = match mover {
            Color::Red => &mut *red,
            Color::Black => &mut *black,
        };
        let Some(sequence) = player.formulate_turn(&state) else {
            debug!(%mover, ply, "side to move resigns");
            return (GameResult::Won(mover.opponent()), ply);
        };
        if let Err(e) = rules.take_turn(&mut state, &sequence, true) {
            warn!(%mover, %sequence, error = %e, "computer produced an illegal move");
            return (GameResult::Won(mover.opponent()), ply);
        }
    }
    match rules.winner(&state) {
        Some(winner) => (GameResult::Won(winner), max_plies),
        None => (GameResult::Draw, max_plies),
    }
}

/// Seed of game `game_idx`. Wraps around instead of overflowing.
fn game_seed(start_seed: u64, game_idx: u32) -> u64 {
    start_seed.wrapping_add(u64::from(game_idx))
}

fn strategy_name(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Lookahead => "Lookahead",
        Strategy::Greedy => "Greedy",
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut base = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(depth) = args.depth {
        base.search.depth = depth;
    }
    if let Some(capture_rule) = args.capture_rule {
        base.rules.capture_rule = capture_rule;
    }
    base.validate()?;

    let strategies = [Strategy::Lookahead, Strategy::Greedy];
    let mut wins: HashMap<Strategy, u32> = HashMap::new();
    let mut draws = 0u32;

    println!(
        "Starting strategy evaluation: {} games, lookahead depth {}...",
        args.games, base.search.depth
    );

    for game_idx in 0..args.games {
        let seed = game_seed(args.start_seed, game_idx);
        // Swap colors every game so neither strategy always moves first.
        let (red_strategy, black_strategy) = if game_idx % 2 == 0 {
            (strategies[0], strategies[1])
        } else {
            (strategies[1], strategies[0])
        };

        let player_config = |strategy: Strategy, seed: u64| {
            let mut config = base;
            config.search.strategy = strategy;
            config.search.seed = Some(seed);
            config
        };
        let mut red = ComputerPlayer::new(player_config(red_strategy, seed));
        let mut black = ComputerPlayer::new(player_config(black_strategy, seed.wrapping_add(1)));

        let (result, plies) = play_game(&base.rules, &mut red, &mut black, args.max_plies);
        let outcome = match result {
            GameResult::Won(Color::Red) => {
                *wins.entry(red_strategy).or_default() += 1;
                format!("{} (red) wins", strategy_name(red_strategy))
            }
            GameResult::Won(Color::Black) => {
                *wins.entry(black_strategy).or_default() += 1;
                format!("{} (black) wins", strategy_name(black_strategy))
            }
            GameResult::Draw => {
                draws += 1;
                "draw".to_string()
            }
        };
        println!(
            "  Game {:<3} (Seed: {:<4}) {:<9} vs {:<9}: {} after {} plies",
            game_idx,
            seed,
            strategy_name(red_strategy),
            strategy_name(black_strategy),
            outcome,
            plies
        );
    }

    println!("\n--- Evaluation Complete ---");
    println!("Games played: {}", args.games);
    for strategy in strategies {
        println!(
            "Strategy {:<10}: Wins = {}",
            strategy_name(strategy),
            wins.get(&strategy).copied().unwrap_or(0)
        );
    }
    println!("Draws: {}", draws);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_seed_wraps_near_max() {
        assert_eq!(game_seed(5, 3), 8);
        assert_eq!(game_seed(u64::MAX, 0), u64::MAX);
        assert_eq!(game_seed(u64::MAX, 1), 0);
        assert_eq!(game_seed(u64::MAX - 1, 3), 1);
    }

    #[test]
    fn test_play_game_ends_in_a_result() {
        let mut config = EngineConfig::default();
        config.search.depth = 1;
        config.search.seed = Some(game_seed(u64::MAX, 0));
        let mut red = ComputerPlayer::new(config);
        config.search.strategy = Strategy::Greedy;
        config.search.seed = Some(game_seed(u64::MAX, 1));
        let mut black = ComputerPlayer::new(config);

        let (result, plies) = play_game(&config.rules, &mut red, &mut black, 10);
        assert!(plies <= 10);
        assert_eq!(result, GameResult::Draw);
    }
}
