//! Core game engine for ten-by-ten checkers.
//!
//! This module defines the game's fundamental components:
//! - `Color`, `Rank`, `Piece`: who owns a piece and whether it has been crowned.
//! - `Location`, `Cell`, `Board`: the 10x10 grid, its tile colors and occupants.
//! - `GameState`: the board, whose turn it is and the capture tally.
//! - `MoveSequence`: one simple step or a chain of jumps.
//! - The rule engine (`Rules::validate`, `Rules::apply`, `Rules::take_turn`,
//!   `Rules::winner`), the single source of truth for legality.
use crate::config::{CaptureRule, Rules};
use crate::error::{BoardError, MoveError};
use crate::movegen;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use tracing::debug;

/// Defines the size of the game board (width and height).
pub const BOARD_SIZE: usize = 10;

/// Number of rows each side fills at the start of the game.
pub const STARTING_ROWS_PER_SIDE: usize = 4;

/// Number of men each side starts with: half the cells of its starting rows are dark.
pub const STARTING_PIECES_PER_SIDE: u32 = (STARTING_ROWS_PER_SIDE * BOARD_SIZE / 2) as u32;

/// Captures needed to win: every opposing piece.
pub const WIN_THRESHOLD: u32 = STARTING_PIECES_PER_SIDE;

/// The side that moves first in a new game.
pub const STARTING_TURN: Color = Color::Red;

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Both colors, in a fixed order.
    pub const ALL: [Color; 2] = [Color::Red, Color::Black];

    /// Returns the other side.
    ///
    /// # Examples
    /// ```
    /// use checkers_engine::engine::Color;
    /// assert_eq!(Color::Red.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::Red);
    /// ```
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// The row delta of a forward step. Black advances toward increasing rows,
    /// Red toward decreasing rows.
    pub fn forward(self) -> i32 {
        match self {
            Color::Black => 1,
            Color::Red => -1,
        }
    }

    /// The opponent's back row, where this side's men are crowned.
    pub fn promotion_row(self) -> i32 {
        match self {
            Color::Black => BOARD_SIZE as i32 - 1,
            Color::Red => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Whether a piece has been crowned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    /// Unpromoted piece: simple moves go forward only.
    Man,
    /// Promoted piece: moves in every diagonal direction.
    King,
}

/// A checker. On the wire the rank is spelled `type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub rank: Rank,
    pub color: Color,
}

impl Piece {
    pub fn man(color: Color) -> Self {
        Piece {
            rank: Rank::Man,
            color,
        }
    }

    pub fn king(color: Color) -> Self {
        Piece {
            rank: Rank::King,
            color,
        }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    /// Converts the piece to its character representation.
    ///
    /// Lowercase letters are men, uppercase letters are kings.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkers_engine::engine::{Color, Piece};
    /// assert_eq!(Piece::man(Color::Red).to_char(), 'r');
    /// assert_eq!(Piece::king(Color::Black).to_char(), 'B');
    /// ```
    pub fn to_char(&self) -> char {
        match (self.color, self.rank) {
            (Color::Red, Rank::Man) => 'r',
            (Color::Red, Rank::King) => 'R',
            (Color::Black, Rank::Man) => 'b',
            (Color::Black, Rank::King) => 'B',
        }
    }

    /// Returns the ANSI foreground color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self.color {
            Color::Red => "31",
            Color::Black => "34",
        }
    }
}

/// A board coordinate.
///
/// Coordinates are signed so that off-board locations received from a client
/// can be represented and rejected by the rule engine instead of failing to
/// parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub const fn new(row: i32, col: i32) -> Self {
        Location { row, col }
    }

    /// Returns `true` if both coordinates lie in `0..BOARD_SIZE`.
    pub fn is_in_bounds(&self) -> bool {
        let size = BOARD_SIZE as i32;
        (0..size).contains(&self.row) && (0..size).contains(&self.col)
    }

    /// Dark tiles are the ones whose coordinates sum to an odd number.
    pub fn is_dark(&self) -> bool {
        (self.row + self.col).rem_euclid(2) == 1
    }

    /// Returns the location displaced by (`d_row`, `d_col`).
    pub fn offset(&self, d_row: i32, d_col: i32) -> Location {
        Location::new(self.row + d_row, self.col + d_col)
    }

    fn indices(&self) -> Option<(usize, usize)> {
        if self.is_in_bounds() {
            Some((self.row as usize, self.col as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Color of a board tile. On the wire dark tiles are called `"black"`; the
/// older spellings `"white"` and `"dark"` are accepted when reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileColor {
    #[serde(rename = "light", alias = "white")]
    Light,
    #[serde(rename = "black", alias = "dark")]
    Dark,
}

impl TileColor {
    /// The tile color a location must have.
    pub fn of(location: Location) -> TileColor {
        if location.is_dark() {
            TileColor::Dark
        } else {
            TileColor::Light
        }
    }
}

/// One square of the board.
///
/// Invariant: `tile` matches the parity of `location`, and `occupant` is only
/// ever set on dark cells. The fields are private so that only `Board` can
/// change an occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    location: Location,
    tile: TileColor,
    occupant: Option<Piece>,
}

impl Cell {
    fn empty(location: Location) -> Self {
        Cell {
            location,
            tile: TileColor::of(location),
            occupant: None,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn tile(&self) -> TileColor {
        self.tile
    }

    pub fn occupant(&self) -> Option<Piece> {
        self.occupant
    }
}

/// Represents the game board as a 2D grid of `Cell`s.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a board with no pieces on it.
    ///
    /// # Examples
    /// ```
    /// use checkers_engine::engine::{Board, Location};
    /// let board = Board::new_empty();
    /// assert_eq!(board.piece_at(Location::new(0, 1)), None);
    /// ```
    pub fn new_empty() -> Self {
        let mut grid = [[Cell::empty(Location::new(0, 0)); BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = Cell::empty(Location::new(r as i32, c as i32));
            }
        }
        Board { grid }
    }

    /// Creates the standard starting position.
    ///
    /// Dark cells in the first `STARTING_ROWS_PER_SIDE` rows hold black men,
    /// dark cells in the last `STARTING_ROWS_PER_SIDE` rows hold red men, and
    /// the two middle rows are empty.
    pub fn new_standard() -> Self {
        let mut board = Board::new_empty();
        for row in board.grid.iter_mut() {
            for cell in row.iter_mut() {
                if cell.tile != TileColor::Dark {
                    continue;
                }
                let r = cell.location.row as usize;
                if r < STARTING_ROWS_PER_SIDE {
                    cell.occupant = Some(Piece::man(Color::Black));
                } else if r >= BOARD_SIZE - STARTING_ROWS_PER_SIDE {
                    cell.occupant = Some(Piece::man(Color::Red));
                }
            }
        }
        board
    }

    /// Returns the cell at `location`, or `None` if it is off the board.
    pub fn cell(&self, location: Location) -> Option<&Cell> {
        location.indices().map(|(r, c)| &self.grid[r][c])
    }

    /// Returns the piece at `location`. Off-board locations hold no piece.
    pub fn piece_at(&self, location: Location) -> Option<Piece> {
        self.cell(location).and_then(|cell| cell.occupant)
    }

    /// Places `piece` at `location`, replacing any previous occupant.
    ///
    /// # Returns
    /// * `Ok(previous_occupant)` on success.
    /// * `Err(BoardError)` if the location is off the board or on a light tile.
    pub fn place(&mut self, location: Location, piece: Piece) -> Result<Option<Piece>, BoardError> {
        let (r, c) = location
            .indices()
            .ok_or(BoardError::OutOfBounds { location })?;
        let cell = &mut self.grid[r][c];
        if cell.tile != TileColor::Dark {
            return Err(BoardError::LightTile { location });
        }
        Ok(cell.occupant.replace(piece))
    }

    /// Clears `location`, returning whatever stood there.
    pub fn remove(&mut self, location: Location) -> Option<Piece> {
        let (r, c) = location.indices()?;
        self.grid[r][c].occupant.take()
    }

    /// Returns the grid rows, row 0 first.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.grid
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.grid.iter().flat_map(|row| row.iter())
    }

    /// Counts the pieces of `color` still on the board.
    pub fn count_pieces(&self, color: Color) -> u32 {
        self.cells()
            .filter(|cell| cell.occupant.map_or(false, |p| p.color == color))
            .count() as u32
    }

    /// Generates a string representation of the board with highlighted locations.
    ///
    /// The output includes row and column numbers and uses ANSI escape codes for
    /// tile and piece colors. Highlighted locations (for example the squares of a
    /// move being entered) are drawn with a bright background.
    pub fn to_string_with_highlight(&self, highlight: &[Location]) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c_idx in 0..BOARD_SIZE {
            output.push_str(&format!("{:<2}", c_idx));
        }
        output.push('\n');

        for (r_idx, row) in self.grid.iter().enumerate() {
            output.push_str(&format!("{:<2}", r_idx));

            for cell in row {
                let background = if highlight.contains(&cell.location) {
                    "43"
                } else if cell.tile == TileColor::Dark {
                    "40"
                } else {
                    "47"
                };
                match cell.occupant {
                    Some(piece) => output.push_str(&format!(
                        "\x1b[1;{};{}m{} \x1b[m",
                        background,
                        piece.to_ansi_color_code(),
                        piece.to_char()
                    )),
                    None => output.push_str(&format!("\x1b[{}m  \x1b[m", background)),
                }
            }
            if r_idx < BOARD_SIZE - 1 {
                output.push('\n');
            }
        }

        output
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl fmt::Display for Board {
    /// Formats the board for display using `to_string_with_highlight(&[])`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(&[]))
    }
}

/// Capture tally per color. Counts only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Captures {
    pub red: u32,
    pub black: u32,
}

impl Captures {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Red => self.red,
            Color::Black => self.black,
        }
    }

    fn add(&mut self, color: Color, count: u32) {
        match color {
            Color::Red => self.red += count,
            Color::Black => self.black += count,
        }
    }
}

/// An ordered list of locations: one simple step, or a chain of jumps.
///
/// Any list of locations can be represented; the rule engine decides whether
/// it is legal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveSequence(Vec<Location>);

impl MoveSequence {
    pub fn new(locations: Vec<Location>) -> Self {
        MoveSequence(locations)
    }

    pub fn locations(&self) -> &[Location] {
        &self.0
    }

    pub fn source(&self) -> Option<Location> {
        self.0.first().copied()
    }

    pub fn destination(&self) -> Option<Location> {
        self.0.last().copied()
    }

    /// Number of segments that are two-step jumps.
    pub fn jump_count(&self) -> usize {
        self.0
            .windows(2)
            .filter(|pair| (pair[1].row - pair[0].row).abs() == 2)
            .count()
    }
}

impl Deref for MoveSequence {
    type Target = [Location];

    fn deref(&self) -> &[Location] {
        &self.0
    }
}

impl From<Vec<Location>> for MoveSequence {
    fn from(locations: Vec<Location>) -> Self {
        MoveSequence(locations)
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, location) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", location)?;
        }
        Ok(())
    }
}

/// What an accepted move sequence did (or, when only validated, would do).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Opposing pieces removed by the sequence.
    pub captured: u32,
    /// Whether the moving man was crowned.
    pub promoted: bool,
}

/// Manages the state of one game: board, side to move, and captures.
///
/// A `GameState` is only mutated through the rule engine's apply path. It
/// serializes to the JSON wire shape described in [`crate::wire`]; decoding
/// goes through `TryFrom<WireGameState>` so a malformed payload is rejected
/// rather than patched up.
///
/// # Examples
/// ```
/// use checkers_engine::engine::{Color, GameState, Location, MoveSequence};
///
/// let mut game = GameState::new();
/// assert_eq!(game.turn(), Color::Red);
///
/// let opening = MoveSequence::new(vec![Location::new(6, 1), Location::new(5, 0)]);
/// let outcome = game.take_turn(&opening, true).unwrap();
/// assert_eq!(outcome.captured, 0);
/// assert_eq!(game.turn(), Color::Black);
/// assert_eq!(game.winner(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    into = "crate::wire::WireGameState",
    try_from = "crate::wire::WireGameState"
)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) captures: Captures,
}

impl GameState {
    /// Creates a new game in the standard starting position, Red to move.
    pub fn new() -> Self {
        GameState {
            board: Board::new_standard(),
            turn: STARTING_TURN,
            captures: Captures::default(),
        }
    }

    /// Creates a game with an empty board and `turn` to move.
    pub fn empty(turn: Color) -> Self {
        GameState::from_parts(Board::new_empty(), turn, Captures::default())
    }

    /// Assembles a game from an arbitrary position, e.g. a rigged test board
    /// or a decoded wire payload.
    pub fn from_parts(board: Board, turn: Color, captures: Captures) -> Self {
        GameState {
            board,
            turn,
            captures,
        }
    }

    /// Returns an immutable reference to the current game board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the number of opposing pieces `color` has captured.
    pub fn captures(&self, color: Color) -> u32 {
        self.captures.get(color)
    }

    pub fn capture_tally(&self) -> Captures {
        self.captures
    }

    /// Counts the pieces of `color` still on the board.
    pub fn piece_count(&self, color: Color) -> u32 {
        self.board.count_pieces(color)
    }

    /// Validates (`execute == false`) or validates and applies (`execute ==
    /// true`) a move sequence under the default [`Rules`].
    pub fn take_turn(
        &mut self,
        sequence: &[Location],
        execute: bool,
    ) -> Result<TurnOutcome, MoveError> {
        Rules::default().take_turn(self, sequence, execute)
    }

    /// Returns the winner under the default [`Rules`], if any.
    pub fn winner(&self) -> Option<Color> {
        Rules::default().winner(self)
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

/// The result of validation: everything `apply` needs to commit a move.
struct TurnPlan {
    source: Location,
    destination: Location,
    piece: Piece,
    jumped: Vec<Location>,
    promotes: bool,
}

impl TurnPlan {
    fn outcome(&self) -> TurnOutcome {
        TurnOutcome {
            captured: self.jumped.len() as u32,
            promoted: self.promotes,
        }
    }
}

impl Rules {
    /// Checks `sequence` against `state` without changing anything.
    ///
    /// The checks run in a fixed order and the first failure is returned:
    /// 1. at least two locations;
    /// 2. every location on the board;
    /// 3. the source holds a piece of the side to move;
    /// 4. every later location is empty;
    /// 5. each step is diagonal and moves, a one-step move is the whole
    ///    sequence, and a man only ever moves forward, jumps included;
    /// 6. each two-step jump passes over an opponent piece not already jumped;
    /// 7. no step is longer than two;
    /// 8. under [`CaptureRule::Mandatory`], a simple move is refused while a
    ///    jump is available.
    ///
    /// # Returns
    /// * `Ok(TurnOutcome)` describing what applying the sequence would do.
    /// * `Err(MoveError)` naming the first check that failed.
    pub fn validate(&self, state: &GameState, sequence: &[Location]) -> Result<TurnOutcome, MoveError> {
        self.plan(state, sequence).map(|plan| plan.outcome())
    }

    /// Validates `sequence` and commits it.
    ///
    /// On success the piece moves to the final location, jumped pieces are
    /// removed and credited to the mover, a man reaching the far row is
    /// crowned, and the turn passes to the opponent. On failure `state` is
    /// untouched.
    pub fn apply(&self, state: &mut GameState, sequence: &[Location]) -> Result<TurnOutcome, MoveError> {
        let plan = self.plan(state, sequence)?;

        state.board.remove(plan.source);
        for &location in &plan.jumped {
            state.board.remove(location);
        }
        let piece = if plan.promotes {
            Piece::king(plan.piece.color)
        } else {
            plan.piece
        };
        let (r, c) = (plan.destination.row as usize, plan.destination.col as usize);
        state.board.grid[r][c].occupant = Some(piece);

        let outcome = plan.outcome();
        state.captures.add(plan.piece.color, outcome.captured);
        state.turn = state.turn.opponent();

        debug!(
            mover = %plan.piece.color,
            from = %plan.source,
            to = %plan.destination,
            captured = outcome.captured,
            promoted = outcome.promoted,
            "applied turn"
        );
        Ok(outcome)
    }

    /// Pure validation when `execute` is false, validation plus commit when true.
    pub fn take_turn(
        &self,
        state: &mut GameState,
        sequence: &[Location],
        execute: bool,
    ) -> Result<TurnOutcome, MoveError> {
        if execute {
            self.apply(state, sequence)
        } else {
            self.validate(state, sequence)
        }
    }

    /// Returns the color whose captures have reached `win_threshold`, if any.
    pub fn winner(&self, state: &GameState) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| state.captures(color) >= self.win_threshold)
    }

    fn plan(&self, state: &GameState, sequence: &[Location]) -> Result<TurnPlan, MoveError> {
        if sequence.len() < 2 {
            return Err(MoveError::SequenceTooShort {
                len: sequence.len(),
            });
        }

        if let Some(&location) = sequence.iter().find(|l| !l.is_in_bounds()) {
            return Err(MoveError::OutOfBounds { location });
        }

        let source = sequence[0];
        let piece = state
            .board
            .piece_at(source)
            .ok_or(MoveError::NoPieceAtSource { location: source })?;
        if piece.color != state.turn {
            return Err(MoveError::NotYourTurn {
                color: piece.color,
                turn: state.turn,
            });
        }

        if let Some(&location) = sequence[1..]
            .iter()
            .find(|&&l| state.board.piece_at(l).is_some())
        {
            return Err(MoveError::DestinationOccupied { location });
        }

        let mut jumped: Vec<Location> = Vec::new();
        for pair in sequence.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let d_row = to.row - from.row;
            let d_col = to.col - from.col;

            if d_row.abs() != d_col.abs() {
                return Err(MoveError::NotDiagonal { from, to });
            }

            match d_row.abs() {
                0 => return Err(MoveError::NoMovement { at: from }),
                1 => {
                    if sequence.len() != 2 {
                        return Err(MoveError::ChainedSimpleMove { from, to });
                    }
                    if !piece.is_king() && d_row != piece.color.forward() {
                        return Err(MoveError::ManMovedBackward { from, to });
                    }
                }
                2 => {
                    if !piece.is_king() && d_row.signum() != piece.color.forward() {
                        return Err(MoveError::ManMovedBackward { from, to });
                    }
                    let middle = from.offset(d_row / 2, d_col / 2);
                    match state.board.piece_at(middle) {
                        None => return Err(MoveError::NothingToJump { from, to }),
                        Some(other) if other.color == piece.color => {
                            return Err(MoveError::CannotJumpOwnPiece { location: middle })
                        }
                        Some(_) => {}
                    }
                    // Jumped pieces stay on the board until commit, so a second
                    // pass over the same piece has to be caught here.
                    if jumped.contains(&middle) {
                        return Err(MoveError::RepeatedJump { location: middle });
                    }
                    jumped.push(middle);
                }
                _ => return Err(MoveError::StepTooLong { from, to }),
            }
        }

        if jumped.is_empty()
            && self.capture_rule == CaptureRule::Mandatory
            && movegen::has_jump(state)
        {
            return Err(MoveError::CaptureRequired);
        }

        let destination = sequence[sequence.len() - 1];
        let promotes = !piece.is_king() && destination.row == piece.color.promotion_row();

        Ok(TurnPlan {
            source,
            destination,
            piece,
            jumped,
            promotes,
        })
    }
}
