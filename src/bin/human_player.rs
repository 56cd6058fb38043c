use checkers_engine::config::{CaptureRule, EngineConfig, Strategy};
use checkers_engine::engine::{Color, GameState, Location};
use checkers_engine::movegen::{generate_all_sequences, sequences_from};
use checkers_engine::solver::ComputerPlayer;
use checkers_engine::utils::parse_move_sequence;
use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play checkers against the computer", long_about = None)]
struct Args {
    /// The side you play. Red moves first.
    #[clap(long, default_value = "red", value_parser = parse_color)]
    color: Color,

    /// Strategy used by the computer
    #[clap(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Search depth for the lookahead strategy
    #[clap(short, long)]
    depth: Option<u32>,

    /// Whether a player who can jump must jump
    #[clap(long, value_enum)]
    capture_rule: Option<CaptureRule>,

    /// Seed for the computer's random choices
    #[clap(long)]
    seed: Option<u64>,

    /// Path to a TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log level written to stderr
    #[clap(long, default_value = "warn")]
    log_level: tracing::Level,
}

fn parse_color(s: &str) -> Result<Color, String> {
    match s.to_ascii_lowercase().as_str() {
        "red" | "r" => Ok(Color::Red),
        "black" | "b" => Ok(Color::Black),
        other => Err(format!("unknown color '{}', expected red or black", other)),
    }
}

fn print_hints(state: &GameState, computer: &ComputerPlayer, origin: Option<Location>) {
    let hints = match origin {
        Some(origin) => sequences_from(state, computer.rules(), origin),
        None => generate_all_sequences(state, computer.rules()),
    };
    if hints.is_empty() {
        println!("No legal moves from there.");
        return;
    }
    for sequence in hints {
        println!("  {}", sequence);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        config.search.strategy = strategy;
    }
    if let Some(depth) = args.depth {
        config.search.depth = depth;
    }
    if let Some(capture_rule) = args.capture_rule {
        config.rules.capture_rule = capture_rule;
    }
    if args.seed.is_some() {
        config.search.seed = args.seed;
    }
    config.validate()?;

    let human = args.color;
    let rules = config.rules;
    let mut computer = ComputerPlayer::new(config);
    let mut state = GameState::new();
    let mut last_move: Vec<Location> = Vec::new();

    println!("Welcome to Checkers! You are playing {}.", human);

    loop {
        println!("---------------------");
        println!(
            "Captures: red {}, black {}",
            state.captures(Color::Red),
            state.captures(Color::Black)
        );
        println!("{}", state.board().to_string_with_highlight(&last_move));

        if let Some(winner) = rules.winner(&state) {
            println!("---------------------");
            if winner == human {
                println!("🎉 You win! 🎉");
            } else {
                println!("The computer wins.");
            }
            break;
        }

        if state.turn() != human {
            match computer.formulate_turn(&state) {
                Some(sequence) => {
                    let outcome = rules.take_turn(&mut state, &sequence, true)?;
                    println!(
                        "Computer plays {} (captured {}).",
                        sequence, outcome.captured
                    );
                    last_move = sequence.locations().to_vec();
                }
                None => {
                    println!("---------------------");
                    println!("The computer resigns. 🎉 You win! 🎉");
                    break;
                }
            }
            continue;
        }

        if generate_all_sequences(&state, &rules).is_empty() {
            println!("---------------------");
            println!("You have no legal moves. The computer wins.");
            break;
        }

        print!("Your move (e.g. '6,1 5,0'), 'h [row,col]' for hints, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            break;
        }
        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if let Some(rest) = trimmed_input.strip_prefix('h') {
            match parse_move_sequence(rest) {
                Ok(points) if points.is_empty() => print_hints(&state, &computer, None),
                Ok(points) if points.len() == 1 => print_hints(&state, &computer, points.source()),
                _ => println!("Use 'h' or 'h row,col'."),
            }
            continue;
        }

        let sequence = match parse_move_sequence(trimmed_input) {
            Ok(sequence) => sequence,
            Err(e) => {
                println!("Invalid input: {}", e);
                continue;
            }
        };

        match rules.take_turn(&mut state, &sequence, true) {
            Ok(outcome) => {
                if outcome.captured > 0 {
                    println!("Captured {}.", outcome.captured);
                }
                if outcome.promoted {
                    println!("Your piece is crowned!");
                }
                last_move = sequence.locations().to_vec();
            }
            Err(e) => println!("Illegal move: {}", e),
        }
    }
    Ok(())
}
