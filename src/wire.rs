//! JSON wire format for game states and move sequences.
//!
//! The wire types are plain data. A typed [`GameState`] is only ever built
//! from them through `TryFrom<WireGameState>`, which checks the board shape,
//! every cell's coordinates and tile color, and that occupants stand on dark
//! tiles.

use crate::engine::{
    Board, Captures, Color, GameState, Location, MoveSequence, Piece, TileColor, BOARD_SIZE,
};
use crate::error::WireError;
use serde::{Deserialize, Serialize};

/// The serialized form of a [`GameState`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGameState {
    pub turn: Color,
    pub captures: Captures,
    pub board: Vec<Vec<WireCell>>,
}

/// The serialized form of one board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCell {
    pub row: i32,
    pub col: i32,
    pub tile: TileColor,
    pub occupant: Option<Piece>,
}

impl From<&GameState> for WireGameState {
    fn from(state: &GameState) -> Self {
        let board = state
            .board()
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| WireCell {
                        row: cell.location().row,
                        col: cell.location().col,
                        tile: cell.tile(),
                        occupant: cell.occupant(),
                    })
                    .collect()
            })
            .collect();

        WireGameState {
            turn: state.turn(),
            captures: state.capture_tally(),
            board,
        }
    }
}

impl From<GameState> for WireGameState {
    fn from(state: GameState) -> Self {
        WireGameState::from(&state)
    }
}

impl TryFrom<WireGameState> for GameState {
    type Error = WireError;

    fn try_from(wire: WireGameState) -> Result<Self, Self::Error> {
        if wire.board.len() != BOARD_SIZE {
            return Err(WireError::RowCount {
                expected: BOARD_SIZE,
                found: wire.board.len(),
            });
        }

        let mut board = Board::new_empty();
        for (r, row) in wire.board.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(WireError::ColumnCount {
                    row: r,
                    expected: BOARD_SIZE,
                    found: row.len(),
                });
            }
            for (c, cell) in row.iter().enumerate() {
                let location = Location::new(r as i32, c as i32);
                if cell.row != location.row || cell.col != location.col {
                    return Err(WireError::CoordinateMismatch {
                        row: r,
                        col: c,
                        claimed: Location::new(cell.row, cell.col),
                    });
                }
                if cell.tile != TileColor::of(location) {
                    return Err(WireError::TileMismatch { row: r, col: c });
                }
                if let Some(piece) = cell.occupant {
                    board.place(location, piece)?;
                }
            }
        }

        Ok(GameState::from_parts(board, wire.turn, wire.captures))
    }
}

/// Serializes a game state to its JSON wire form.
pub fn state_to_json(state: &GameState) -> Result<String, WireError> {
    Ok(serde_json::to_string(&WireGameState::from(state))?)
}

/// Parses a JSON wire payload into a game state.
///
/// # Examples
/// ```
/// use checkers_engine::engine::GameState;
/// use checkers_engine::wire::{state_from_json, state_to_json};
///
/// let state = GameState::new();
/// let json = state_to_json(&state).unwrap();
/// assert_eq!(state_from_json(&json).unwrap(), state);
/// ```
pub fn state_from_json(json: &str) -> Result<GameState, WireError> {
    let wire: WireGameState = serde_json::from_str(json)?;
    GameState::try_from(wire)
}

/// Serializes a move sequence as an array of `{row, col}` objects.
pub fn sequence_to_json(sequence: &MoveSequence) -> Result<String, WireError> {
    Ok(serde_json::to_string(sequence)?)
}

/// Parses an array of `{row, col}` objects into a move sequence.
pub fn sequence_from_json(json: &str) -> Result<MoveSequence, WireError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::utils::state_from_str_array;
    use serde_json::{json, Value};

    fn initial_value() -> Value {
        serde_json::to_value(WireGameState::from(&GameState::new())).unwrap()
    }

    #[test]
    fn test_initial_state_shape() {
        let value = initial_value();
        assert_eq!(value["turn"], "red");
        assert_eq!(value["captures"], json!({"red": 0, "black": 0}));
        assert_eq!(value["board"].as_array().unwrap().len(), BOARD_SIZE);
        assert_eq!(
            value["board"][0][0],
            json!({"row": 0, "col": 0, "tile": "light", "occupant": null})
        );
        assert_eq!(
            value["board"][0][1],
            json!({
                "row": 0,
                "col": 1,
                "tile": "black",
                "occupant": {"type": "man", "color": "black"}
            })
        );
        assert_eq!(
            value["board"][9][0]["occupant"],
            json!({"type": "man", "color": "red"})
        );
    }

    #[test]
    fn test_game_state_serde_goes_through_wire_form() {
        let state = GameState::new();
        let direct = serde_json::to_value(&state).unwrap();
        assert_eq!(direct, initial_value());

        let back: GameState = serde_json::from_value(direct).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_mid_game_round_trip() {
        let mut state = state_from_str_array(
            &[
                ".B........",
                "..........",
                "..........",
                "..b.......",
                "...r......",
                "..........",
                ".....R....",
                "..........",
                "..........",
                "..........",
            ],
            Color::Black,
        )
        .unwrap();
        state.captures = Captures { red: 3, black: 7 };

        let json = state_to_json(&state).unwrap();
        assert_eq!(state_from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_white_tile_alias_accepted() {
        let json = state_to_json(&GameState::new())
            .unwrap()
            .replace("\"light\"", "\"white\"");
        assert_eq!(state_from_json(&json).unwrap(), GameState::new());
    }

    #[test]
    fn test_rejects_wrong_row_count() {
        let mut value = initial_value();
        value["board"].as_array_mut().unwrap().pop();
        let result = state_from_json(&value.to_string());
        assert!(matches!(
            result,
            Err(WireError::RowCount {
                expected: BOARD_SIZE,
                found: 9
            })
        ));
    }

    #[test]
    fn test_rejects_wrong_column_count() {
        let mut value = initial_value();
        value["board"][4].as_array_mut().unwrap().pop();
        let result = state_from_json(&value.to_string());
        assert!(matches!(
            result,
            Err(WireError::ColumnCount { row: 4, found: 9, .. })
        ));
    }

    #[test]
    fn test_rejects_coordinate_mismatch() {
        let mut value = initial_value();
        value["board"][2][5]["col"] = json!(6);
        let result = state_from_json(&value.to_string());
        assert!(matches!(
            result,
            Err(WireError::CoordinateMismatch { row: 2, col: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_tile_mismatch() {
        let mut value = initial_value();
        value["board"][5][0]["tile"] = json!("light");
        let result = state_from_json(&value.to_string());
        assert!(matches!(
            result,
            Err(WireError::TileMismatch { row: 5, col: 0 })
        ));
    }

    #[test]
    fn test_rejects_piece_on_light_tile() {
        let mut value = initial_value();
        value["board"][4][4]["occupant"] = json!({"type": "king", "color": "red"});
        let result = state_from_json(&value.to_string());
        assert!(matches!(
            result,
            Err(WireError::Board(BoardError::LightTile { .. }))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            state_from_json("{\"turn\": \"green\"}"),
            Err(WireError::Json(_))
        ));
        assert!(matches!(sequence_from_json("[{\"row\": 1}]"), Err(WireError::Json(_))));
    }

    #[test]
    fn test_sequence_wire_form() {
        let sequence = MoveSequence::new(vec![Location::new(6, 1), Location::new(5, 0)]);
        let json = sequence_to_json(&sequence).unwrap();
        assert_eq!(json, r#"[{"row":6,"col":1},{"row":5,"col":0}]"#);
        assert_eq!(sequence_from_json(&json).unwrap(), sequence);
    }
}
