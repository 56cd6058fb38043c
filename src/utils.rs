use crate::engine::{Board, Color, GameState, Location, MoveSequence, Piece, BOARD_SIZE};
use crate::error::ParseError;

/// Parses an array of string slices into a `Board`.
///
/// Each string slice in the input array represents a row on the board, starting from row 0.
/// If fewer than `BOARD_SIZE` rows are provided, the remaining rows are left empty.
/// Similarly, if a row string is shorter than `BOARD_SIZE` characters, the rest of that
/// row is left empty.
///
/// Valid characters are:
/// - 'r': red man
/// - 'R': red king
/// - 'b': black man
/// - 'B': black king
/// - '.': empty cell
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(ParseError)` if:
///     - The number of rows exceeds `BOARD_SIZE`.
///     - Any row string's character length exceeds `BOARD_SIZE`.
///     - An unrecognized character is encountered.
///     - A piece is drawn on a light tile.
///
/// # Examples
/// ```
/// use checkers_engine::utils::board_from_str_array;
/// use checkers_engine::engine::{Color, Location, Piece};
///
/// let board = board_from_str_array(&[
///     ".b.B", // Row 0
///     "r...", // Row 1
/// ])
/// .unwrap();
/// assert_eq!(board.piece_at(Location::new(0, 1)), Some(Piece::man(Color::Black)));
/// assert_eq!(board.piece_at(Location::new(0, 3)), Some(Piece::king(Color::Black)));
/// assert_eq!(board.piece_at(Location::new(1, 0)), Some(Piece::man(Color::Red)));
///
/// // (0,0) is a light tile.
/// assert!(board_from_str_array(&["r"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseError> {
    if s.len() > BOARD_SIZE {
        return Err(ParseError::TooManyRows {
            max: BOARD_SIZE,
            found: s.len(),
        });
    }

    let mut board = Board::new_empty();

    for (r, row_str) in s.iter().enumerate() {
        let width = row_str.chars().count();
        if width > BOARD_SIZE {
            return Err(ParseError::RowTooLong {
                row: r,
                max: BOARD_SIZE,
                found: width,
            });
        }

        for (c, ch) in row_str.chars().enumerate() {
            let piece = match ch {
                '.' => continue,
                'r' => Piece::man(Color::Red),
                'R' => Piece::king(Color::Red),
                'b' => Piece::man(Color::Black),
                'B' => Piece::king(Color::Black),
                _ => return Err(ParseError::UnrecognizedChar { ch, row: r, col: c }),
            };
            board.place(Location::new(r as i32, c as i32), piece)?;
        }
    }
    Ok(board)
}

/// Parses a board diagram (see [`board_from_str_array`]) into a game with
/// `turn` to move and no captures yet.
pub fn state_from_str_array(s: &[&str], turn: Color) -> Result<GameState, ParseError> {
    let board = board_from_str_array(s)?;
    Ok(GameState::from_parts(board, turn, Default::default()))
}

/// Renders a board as `BOARD_SIZE` rows in the format read by [`board_from_str_array`].
pub fn board_to_str_array(board: &Board) -> Vec<String> {
    board
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.occupant().map_or('.', |p| p.to_char()))
                .collect()
        })
        .collect()
}

/// Parses a typed-in move such as `"6,1 5,0"` or `"3,2 5,4 7,6"`.
///
/// Locations are `row,col` pairs separated by whitespace. No legality check is
/// made here; that is the rule engine's job.
pub fn parse_move_sequence(input: &str) -> Result<MoveSequence, ParseError> {
    input
        .split_whitespace()
        .map(parse_location)
        .collect::<Result<Vec<_>, _>>()
        .map(MoveSequence::new)
}

fn parse_location(token: &str) -> Result<Location, ParseError> {
    let bad = || ParseError::BadLocation(token.to_string());
    let (row, col) = token.split_once(',').ok_or_else(bad)?;
    let row = row.trim().parse::<i32>().map_err(|_| bad())?;
    let col = col.trim().parse::<i32>().map_err(|_| bad())?;
    Ok(Location::new(row, col))
}
