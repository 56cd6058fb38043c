//! Legal move enumeration.
//!
//! Sequences are built by recursive backtracking from each piece of the side
//! to move. Every prefix of a jump chain is itself a legal sequence, so the
//! generator records each one as it goes; the engine does not force the
//! longest capture.

use crate::config::{CaptureRule, Rules};
use crate::engine::{Board, GameState, Location, MoveSequence, Piece};

/// The four diagonal directions as (row, col) deltas.
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Enumerates every legal move sequence for the side to move.
///
/// Pieces are visited in row-major order. For each piece its simple steps are
/// listed first, then its jump chains in depth-first order. The result holds
/// no duplicates.
///
/// Under [`CaptureRule::Mandatory`], simple steps are dropped whenever any
/// jump exists, matching what the rule engine accepts.
pub fn generate_all_sequences(state: &GameState, rules: &Rules) -> Vec<MoveSequence> {
    let mut sequences = Vec::new();
    for cell in state.board().cells() {
        if let Some(piece) = cell.occupant() {
            if piece.color == state.turn() {
                collect_from(state.board(), cell.location(), piece, &mut sequences);
            }
        }
    }

    if rules.capture_rule == CaptureRule::Mandatory
        && sequences.iter().any(|s| s.jump_count() > 0)
    {
        sequences.retain(|s| s.jump_count() > 0);
    }
    sequences
}

/// Enumerates the legal sequences starting at `origin`, for move hints.
///
/// Returns an empty list when `origin` does not hold a piece of the side to
/// move. The capture rule is applied across the whole side, so under
/// [`CaptureRule::Mandatory`] a piece with only simple steps gets none while
/// another piece can jump.
pub fn sequences_from(state: &GameState, rules: &Rules, origin: Location) -> Vec<MoveSequence> {
    match state.board().piece_at(origin) {
        Some(piece) if piece.color == state.turn() => {
            let mut sequences = Vec::new();
            collect_from(state.board(), origin, piece, &mut sequences);
            if rules.capture_rule == CaptureRule::Mandatory && has_jump(state) {
                sequences.retain(|s| s.jump_count() > 0);
            }
            sequences
        }
        _ => Vec::new(),
    }
}

/// Returns `true` if any piece of the side to move can make at least one jump.
pub fn has_jump(state: &GameState) -> bool {
    let board = state.board();
    board.cells().any(|cell| match cell.occupant() {
        Some(piece) if piece.color == state.turn() => DIAGONALS
            .iter()
            .any(|&(d_row, d_col)| jump_target(board, piece, cell.location(), d_row, d_col).is_some()),
        _ => false,
    })
}

fn collect_from(board: &Board, origin: Location, piece: Piece, out: &mut Vec<MoveSequence>) {
    for &(d_row, d_col) in &DIAGONALS {
        if !piece.is_king() && d_row != piece.color.forward() {
            continue;
        }
        let target = origin.offset(d_row, d_col);
        if target.is_in_bounds() && board.piece_at(target).is_none() {
            out.push(MoveSequence::new(vec![origin, target]));
        }
    }

    let mut path = vec![origin];
    let mut jumped = Vec::new();
    extend_jumps(board, piece, &mut path, &mut jumped, out);
}

/// Depth-first extension of a jump chain. `path` holds the landing squares so
/// far (source first) and `jumped` the pieces passed over; both are restored
/// before returning. A chain never lands on a square it already visited.
fn extend_jumps(
    board: &Board,
    piece: Piece,
    path: &mut Vec<Location>,
    jumped: &mut Vec<Location>,
    out: &mut Vec<MoveSequence>,
) {
    let from = path[path.len() - 1];
    for &(d_row, d_col) in &DIAGONALS {
        let Some((middle, landing)) = jump_target(board, piece, from, d_row, d_col) else {
            continue;
        };
        if path.contains(&landing) || jumped.contains(&middle) {
            continue;
        }

        path.push(landing);
        jumped.push(middle);
        out.push(MoveSequence::new(path.clone()));
        extend_jumps(board, piece, path, jumped, out);
        jumped.pop();
        path.pop();
    }
}

/// Returns the (jumped, landing) pair if `piece` standing on `from` can jump in
/// direction (`d_row`, `d_col`) on the current board. Men only jump forward.
fn jump_target(
    board: &Board,
    piece: Piece,
    from: Location,
    d_row: i32,
    d_col: i32,
) -> Option<(Location, Location)> {
    if !piece.is_king() && d_row != piece.color.forward() {
        return None;
    }
    let middle = from.offset(d_row, d_col);
    let landing = from.offset(2 * d_row, 2 * d_col);
    if !landing.is_in_bounds() || board.piece_at(landing).is_some() {
        return None;
    }
    match board.piece_at(middle) {
        Some(other) if other.color != piece.color => Some((middle, landing)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Color;
    use crate::utils::state_from_str_array;

    fn seq(points: &[(i32, i32)]) -> MoveSequence {
        MoveSequence::new(points.iter().map(|&(r, c)| Location::new(r, c)).collect())
    }

    #[test]
    fn test_opening_moves() {
        let state = GameState::new();
        let sequences = generate_all_sequences(&state, &Rules::default());
        // Only the red men on row 6 can move: (6,1),(6,3),(6,5),(6,7) have two
        // forward steps each and (6,9) has one.
        assert_eq!(sequences.len(), 9);
        assert!(sequences.iter().all(|s| s.len() == 2 && s[0].row == 6));
        assert!(sequences.contains(&seq(&[(6, 1), (5, 0)])));
        assert!(sequences.contains(&seq(&[(6, 9), (5, 8)])));
        assert!(!has_jump(&state));
    }

    #[test]
    fn test_every_chain_prefix_is_listed() {
        let state = state_from_str_array(
            &[
                "..........",
                "..........",
                "..........",
                "..b.......",
                "...r......",
                "..........",
                ".....r....",
                "..........",
                "..........",
                "..........",
            ],
            Color::Black,
        )
        .unwrap();
        let sequences = generate_all_sequences(&state, &Rules::default());
        assert_eq!(
            sequences,
            vec![
                seq(&[(3, 2), (4, 1)]),
                seq(&[(3, 2), (5, 4)]),
                seq(&[(3, 2), (5, 4), (7, 6)]),
            ]
        );
        assert!(has_jump(&state));
    }

    #[test]
    fn test_mandatory_capture_drops_simple_moves() {
        let state = state_from_str_array(
            &[
                ".b........",
                "..........",
                "..........",
                "..b.......",
                "...r......",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
            ],
            Color::Black,
        )
        .unwrap();
        let rules = Rules {
            capture_rule: CaptureRule::Mandatory,
            ..Rules::default()
        };
        assert_eq!(
            generate_all_sequences(&state, &rules),
            vec![seq(&[(3, 2), (5, 4)])]
        );
        assert!(sequences_from(&state, &rules, Location::new(0, 1)).is_empty());
        assert_eq!(
            sequences_from(&state, &Rules::default(), Location::new(0, 1)).len(),
            2
        );
    }

    #[test]
    fn test_men_never_jump_backward() {
        let state = state_from_str_array(
            &[
                "..........",
                "..........",
                "..........",
                "..........",
                "...r......",
                "....b.....",
                "..........",
                "..........",
                "..........",
                "..........",
            ],
            Color::Red,
        )
        .unwrap();
        assert_eq!(
            generate_all_sequences(&state, &Rules::default()),
            vec![seq(&[(4, 3), (3, 2)]), seq(&[(4, 3), (3, 4)])]
        );
        assert!(!has_jump(&state));

        let mut black_to_move = state.clone();
        black_to_move.turn = Color::Black;
        // The black man at (5,4) also sees the red man behind it.
        assert!(generate_all_sequences(&black_to_move, &Rules::default())
            .iter()
            .all(|s| s.jump_count() == 0));
    }

    #[test]
    fn test_king_moves_every_direction() {
        let state = state_from_str_array(
            &[
                "..........",
                "..........",
                "..........",
                "..........",
                "...R......",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
            ],
            Color::Red,
        )
        .unwrap();
        let sequences = generate_all_sequences(&state, &Rules::default());
        assert_eq!(sequences.len(), 4);
    }

    #[test]
    fn test_king_chain_around_ring() {
        // A red king can jump round a ring of four black men, (2,3) -> (4,5)
        // -> (6,3) -> (4,1), but cannot close the loop onto its own square.
        let state = state_from_str_array(
            &[
                "..........",
                "..........",
                "...R......",
                "..b.b.....",
                "..........",
                "..b.b.....",
                "..........",
                "..........",
                "..........",
                "..........",
            ],
            Color::Red,
        )
        .unwrap();
        let sequences = generate_all_sequences(&state, &Rules::default());
        assert!(sequences.contains(&seq(&[(2, 3), (4, 5), (6, 3), (4, 1)])));
        assert!(sequences.contains(&seq(&[(2, 3), (4, 1), (6, 3), (4, 5)])));
        assert!(sequences.iter().all(|s| s.jump_count() <= 3));
        assert!(sequences.iter().all(|s| !s[1..].contains(&Location::new(2, 3))));
        for sequence in &sequences {
            assert!(Rules::default().validate(&state, sequence).is_ok(), "{}", sequence);
        }
    }

    #[test]
    fn test_chain_never_lands_twice() {
        // Starting at (8,5), the king could circle the ring back to (6,3).
        // The generator stops before re-entering a visited square, although
        // the rule engine accepts the loop since every jump takes a new piece.
        let state = state_from_str_array(
            &[
                "..........",
                "..........",
                "..........",
                "..b.b.....",
                "..........",
                "..b.b.....",
                "..........",
                "....b.....",
                ".....R....",
                "..........",
            ],
            Color::Red,
        )
        .unwrap();
        let looped = seq(&[(8, 5), (6, 3), (4, 1), (2, 3), (4, 5), (6, 3)]);
        let sequences = generate_all_sequences(&state, &Rules::default());
        assert!(!sequences.contains(&looped));
        assert!(sequences.contains(&seq(&[(8, 5), (6, 3), (4, 1), (2, 3), (4, 5)])));
        for sequence in &sequences {
            for (i, a) in sequence.iter().enumerate() {
                assert!(!sequence[i + 1..].contains(a), "revisit in {}", sequence);
            }
        }

        let outcome = Rules::default().validate(&state, &looped).unwrap();
        assert_eq!(outcome.captured, 5);
    }

    #[test]
    fn test_sequences_from_wrong_color_is_empty() {
        let state = GameState::new();
        assert!(sequences_from(&state, &Rules::default(), Location::new(3, 0)).is_empty());
        assert!(sequences_from(&state, &Rules::default(), Location::new(4, 1)).is_empty());
        assert_eq!(
            sequences_from(&state, &Rules::default(), Location::new(6, 1)).len(),
            2
        );
    }

    #[test]
    fn test_generated_sequences_validate() {
        let state = GameState::new();
        let rules = Rules::default();
        for sequence in generate_all_sequences(&state, &rules) {
            assert!(rules.validate(&state, &sequence).is_ok(), "{}", sequence);
        }
    }
}
