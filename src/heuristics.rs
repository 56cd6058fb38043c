use crate::config::Rules;
use crate::engine::{GameState, MoveSequence};
use crate::movegen::generate_all_sequences;
use rand::seq::SliceRandom;
use rand::Rng;

/// Scores a candidate for the single-ply greedy strategy.
///
/// A jump chain is worth two points per jump. A simple step is worth the
/// number of rows it advances, which is always 1.
///
/// # Examples
/// ```
/// use checkers_engine::engine::{Location, MoveSequence};
/// use checkers_engine::heuristics::greedy_score;
///
/// let step = MoveSequence::new(vec![Location::new(6, 1), Location::new(5, 0)]);
/// let double = MoveSequence::new(vec![
///     Location::new(3, 2),
///     Location::new(5, 4),
///     Location::new(7, 6),
/// ]);
/// assert_eq!(greedy_score(&step), 1);
/// assert_eq!(greedy_score(&double), 4);
/// ```
pub fn greedy_score(sequence: &MoveSequence) -> u32 {
    let jumps = sequence.jump_count() as u32;
    if jumps > 0 {
        return 2 * jumps;
    }
    match (sequence.source(), sequence.destination()) {
        (Some(from), Some(to)) => (to.row - from.row).unsigned_abs(),
        _ => 0,
    }
}

/// Chooses a move with the greedy strategy.
///
/// Every legal sequence is scored with [`greedy_score`]. Among those tied for
/// the highest score, one is picked uniformly at random from `rng`, so a
/// seeded generator makes the choice reproducible.
///
/// # Returns
/// The chosen sequence, or `None` if the side to move has no legal sequence.
pub fn choose_move_greedy<R: Rng + ?Sized>(
    state: &GameState,
    rules: &Rules,
    rng: &mut R,
) -> Option<MoveSequence> {
    let candidates = generate_all_sequences(state, rules);
    let best_score = candidates.iter().map(greedy_score).max()?;

    let best: Vec<&MoveSequence> = candidates
        .iter()
        .filter(|s| greedy_score(s) == best_score)
        .collect();
    best.choose(rng).map(|s| (*s).clone())
}
