use crate::config::{EngineConfig, Rules, SearchConfig, Strategy};
use crate::engine::{GameState, MoveSequence};
use crate::error::SearchError;
use crate::heuristics::choose_move_greedy;
use crate::movegen::generate_all_sequences;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error};

/// Score per net capture gained over the searched line.
const CAPTURE_WEIGHT: i64 = 100;

/// Represents the move chosen by the lookahead search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// The first-ply sequence to play.
    pub sequence: MoveSequence,
    /// The best score reached along any continuation of `sequence`.
    pub score: i64,
    /// Positions visited during the whole search.
    pub nodes: u64,
}

/// Chooses a move by exploring every continuation up to `depth` plies.
///
/// Each reached leaf is scored from the point of view of the side to move at
/// the root as `net_captures * 100 + (depth - plies_used)`, so capturing more
/// wins and, between equal captures, getting there sooner wins. A line stops
/// early when someone has won or the side to move has no sequence. Every
/// first-ply candidate keeps the best score found below it; the first
/// candidate with the overall best score is returned.
///
/// `state` is never modified: each line is played on a clone.
///
/// # Returns
/// * `Ok(Some(SearchResult))` with the chosen sequence.
/// * `Ok(None)` if the side to move has no legal sequence.
/// * `Err(SearchError)` if the rule engine rejected a generated sequence.
pub fn search_best_sequence(
    state: &GameState,
    rules: &Rules,
    depth: u32,
) -> Result<Option<SearchResult>, SearchError> {
    let mut search = Search {
        root: state,
        rules,
        depth,
        nodes: 0,
    };

    let mut best: Option<(MoveSequence, i64)> = None;
    for candidate in generate_all_sequences(state, rules) {
        let mut next = state.clone();
        search.play(&mut next, &candidate)?;
        let score = search.explore(&next, 1)?;
        if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
            best = Some((candidate, score));
        }
    }

    let result = best.map(|(sequence, score)| SearchResult {
        sequence,
        score,
        nodes: search.nodes,
    });
    if let Some(result) = &result {
        debug!(
            sequence = %result.sequence,
            score = result.score,
            nodes = result.nodes,
            depth,
            "lookahead search finished"
        );
    }
    Ok(result)
}

struct Search<'a> {
    root: &'a GameState,
    rules: &'a Rules,
    depth: u32,
    nodes: u64,
}

impl Search<'_> {
    fn explore(&mut self, current: &GameState, plies_used: u32) -> Result<i64, SearchError> {
        self.nodes += 1;

        if plies_used >= self.depth || self.rules.winner(current).is_some() {
            return Ok(self.evaluate(current, plies_used));
        }

        let candidates = generate_all_sequences(current, self.rules);
        if candidates.is_empty() {
            return Ok(self.evaluate(current, plies_used));
        }

        let mut best = i64::MIN;
        for candidate in &candidates {
            let mut next = current.clone();
            self.play(&mut next, candidate)?;
            best = best.max(self.explore(&next, plies_used + 1)?);
        }
        Ok(best)
    }

    fn evaluate(&self, reached: &GameState, plies_used: u32) -> i64 {
        let own = self.root.turn();
        let opponent = own.opponent();
        let gained = |color| i64::from(reached.captures(color)) - i64::from(self.root.captures(color));

        (gained(own) - gained(opponent)) * CAPTURE_WEIGHT
            + (i64::from(self.depth) - i64::from(plies_used))
    }

    fn play(&self, state: &mut GameState, sequence: &MoveSequence) -> Result<(), SearchError> {
        self.rules.apply(state, sequence).map(|_| ()).map_err(|source| {
            error!(
                sequence = %sequence,
                reason = %source,
                "move generator produced a sequence the rule engine rejects"
            );
            SearchError::GeneratorDisagreement {
                sequence: sequence.clone(),
                source,
            }
        })
    }
}

/// The built-in computer opponent.
///
/// Holds the rule set, the search settings and the random source used by the
/// greedy strategy. Every call works on clones of the given state.
///
/// # Examples
/// ```
/// use checkers_engine::config::{EngineConfig, Strategy};
/// use checkers_engine::engine::GameState;
/// use checkers_engine::solver::ComputerPlayer;
///
/// let mut config = EngineConfig::default();
/// config.search.strategy = Strategy::Greedy;
/// config.search.seed = Some(7);
///
/// let mut computer = ComputerPlayer::new(config);
/// let state = GameState::new();
/// let sequence = computer.formulate_turn(&state).expect("opening has moves");
/// assert!(computer.rules().validate(&state, &sequence).is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ComputerPlayer {
    rules: Rules,
    search: SearchConfig,
    rng: SmallRng,
}

impl ComputerPlayer {
    /// Creates a computer player. The greedy tie-breaker is seeded from
    /// `config.search.seed`, or from OS entropy when no seed is set.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.search.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a computer player with a caller-supplied random source.
    pub fn with_rng(config: EngineConfig, rng: SmallRng) -> Self {
        ComputerPlayer {
            rules: config.rules,
            search: config.search,
            rng,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn strategy(&self) -> Strategy {
        self.search.strategy
    }

    /// Chooses the computer's next move.
    ///
    /// # Returns
    /// The sequence to play, or `None` when the computer resigns: it has no
    /// legal sequence, or the search hit an internal inconsistency (already
    /// logged as an error).
    pub fn formulate_turn(&mut self, state: &GameState) -> Option<MoveSequence> {
        match self.search.strategy {
            Strategy::Lookahead => {
                match search_best_sequence(state, &self.rules, self.search.depth) {
                    Ok(result) => result.map(|r| r.sequence),
                    Err(_) => None,
                }
            }
            Strategy::Greedy => choose_move_greedy(state, &self.rules, &mut self.rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaptureRule;
    use crate::engine::{Color, Location};
    use crate::error::MoveError;
    use crate::utils::state_from_str_array;

    fn lookahead(depth: u32) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.search.depth = depth;
        config
    }

    #[test]
    fn test_search_no_moves_returns_none() {
        let state = GameState::empty(Color::Black);
        assert_eq!(search_best_sequence(&state, &Rules::default(), 4), Ok(None));

        let mut computer = ComputerPlayer::new(lookahead(4));
        assert_eq!(computer.formulate_turn(&state), None);
    }

    #[test]
    fn test_search_takes_double_jump() {
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
        let result = search_best_sequence(&state, &Rules::default(), 1)
            .unwrap()
            .unwrap();
        assert_eq!(
            result.sequence.locations(),
            &[
                Location::new(3, 2),
                Location::new(5, 4),
                Location::new(7, 6)
            ]
        );
        // Two captures, depth 1, one ply used.
        assert_eq!(result.score, 200);
    }

    #[test]
    fn test_search_prefers_faster_win() {
        // Black needs one more capture to win. Both the single jump and a
        // quiet move could lead to captures later, but the immediate jump ends
        // the game at ply 1.
        let mut state = state_from_str_array(
            &[
                "..........",
                "..........",
                "..........",
                "..b.......",
                "...r......",
                "..........",
                "..........",
                "..........",
                "..........",
                ".r........",
            ],
            Color::Black,
        )
        .unwrap();
        state.captures.black = Rules::default().win_threshold - 1;
        let result = search_best_sequence(&state, &Rules::default(), 4)
            .unwrap()
            .unwrap();
        assert_eq!(
            result.sequence.locations(),
            &[Location::new(3, 2), Location::new(5, 4)]
        );
        assert_eq!(result.score, 100 + 3);
    }

    #[test]
    fn test_search_does_not_mutate_state() {
        let state = GameState::new();
        let before = state.clone();
        let result = search_best_sequence(&state, &Rules::default(), 3)
            .unwrap()
            .unwrap();
        assert_eq!(state, before);
        assert!(Rules::default().validate(&state, &result.sequence).is_ok());
        assert!(result.nodes > 9);
    }

    #[test]
    fn test_search_tie_keeps_first_candidate() {
        // Nothing can be captured within one ply, so every opening scores the
        // same and the first generated sequence is kept.
        let state = GameState::new();
        let result = search_best_sequence(&state, &Rules::default(), 1)
            .unwrap()
            .unwrap();
        let first = generate_all_sequences(&state, &Rules::default())
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(result.sequence, first);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_formulate_turn_respects_mandatory_capture() {
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
        for strategy in [Strategy::Lookahead, Strategy::Greedy] {
            let mut config = lookahead(2);
            config.rules.capture_rule = CaptureRule::Mandatory;
            config.search.strategy = strategy;
            config.search.seed = Some(3);
            let mut computer = ComputerPlayer::new(config);
            let sequence = computer.formulate_turn(&state).unwrap();
            assert_eq!(sequence.jump_count(), 1);
            assert!(computer.rules().validate(&state, &sequence).is_ok());
        }
    }

    #[test]
    fn test_rejected_sequence_aborts_search_without_touching_state() {
        let root = GameState::new();
        let rules = Rules::default();
        let search = Search {
            root: &root,
            rules: &rules,
            depth: 2,
            nodes: 0,
        };

        let mut scratch = root.clone();
        let bad = MoveSequence::new(vec![Location::new(6, 1), Location::new(4, 1)]);
        let err = search.play(&mut scratch, &bad).unwrap_err();
        assert_eq!(
            err,
            SearchError::GeneratorDisagreement {
                sequence: bad.clone(),
                source: MoveError::NotDiagonal {
                    from: Location::new(6, 1),
                    to: Location::new(4, 1)
                },
            }
        );
        assert_eq!(
            err.to_string(),
            "generated sequence (6,1) -> (4,1) was rejected: step (6,1) -> (4,1) is not diagonal"
        );
        assert_eq!(scratch, root);
    }
}
