// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! knight-swap: an exhaustive solver for the knight-swap puzzle.
//!
//! The puzzle is played on a small, fixed, cross-shaped board of ten cells. Two white and two
//! black knights start on some of those cells and must trade places using ordinary knight leaps,
//! one piece at a time, never landing on an occupied cell or off the board. This library
//! implements the board and its movement rules, and a breadth-first search which finds every
//! sequence of moves reaching the goal arrangement without ever revisiting an arrangement it has
//! already seen. Presenting the results is left to the user.

#![no_std]

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt::{Display, Formatter};
use core::ops::{Add, Sub};
use core::str::FromStr;
use num_traits::{CheckedAdd, CheckedSub};
use serde::{Deserialize, Serialize};

extern crate alloc;

/// The contents of a single cell.
#[derive(
    Copy, Clone, Debug, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize,
)]
pub enum Piece {
    /// No piece.
    #[default]
    Empty,
    /// A white knight.
    White,
    /// A black knight.
    Black,
}

impl Piece {
    /// The glyph used for this piece in the text form of a [`Layout`].
    pub fn glyph(&self) -> char {
        match self {
            Piece::Empty => '□',
            Piece::White => '♘',
            Piece::Black => '♞',
        }
    }

    /// The piece denoted by `glyph`, accepting both the board glyphs and the ASCII aliases `.`,
    /// `W` and `B`.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '□' | '.' => Some(Piece::Empty),
            '♘' | 'W' => Some(Piece::White),
            '♞' | 'B' => Some(Piece::Black),
            _ => None,
        }
    }

    /// Whether this cell holds no piece.
    pub fn is_empty(&self) -> bool {
        matches!(self, Piece::Empty)
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A coordinate pair. Row 0 is the bottom row; column 0 is the leftmost column. Positions may
/// name coordinates that are not on the board; see [`Position::cell`].
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Position {
    row: u8,
    column: u8,
}

const fn at(row: u8, column: u8) -> Position {
    Position { row, column }
}

/// The number of cells on the board.
pub const CELLS: usize = 10;

/// The cells of the board, in the order a [`Layout`] stores them.
pub const DOMAIN: [Position; CELLS] = [
    at(0, 0),
    at(0, 1),
    at(0, 2),
    at(0, 3),
    at(1, 1),
    at(1, 2),
    at(1, 3),
    at(2, 1),
    at(2, 2),
    at(3, 1),
];

const ROWS: u8 = 4;
const COLUMNS: u8 = 4;

impl Position {
    /// The row of the position.
    pub fn row(&self) -> u8 {
        self.row
    }

    /// The column of the position.
    pub fn column(&self) -> u8 {
        self.column
    }

    /// The index of this position in [`DOMAIN`], or `None` if it is not on the board.
    pub fn cell(&self) -> Option<usize> {
        DOMAIN.iter().position(|cell| cell == self)
    }

    /// The position reached by making the provided leap from this one, or `None` if the
    /// coordinates would leave the representable range. The result is not necessarily on the
    /// board.
    pub fn leap(&self, leap: Leap) -> Option<Self> {
        self.checked_add(&leap.forward)?.checked_sub(&leap.back)
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row + rhs.row,
            column: self.column + rhs.column,
        }
    }
}

impl CheckedAdd for Position {
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(rhs.row)?,
            column: self.column.checked_add(rhs.column)?,
        })
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            row: self.row - rhs.row,
            column: self.column - rhs.column,
        }
    }
}

impl CheckedSub for Position {
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_sub(rhs.row)?,
            column: self.column.checked_sub(rhs.column)?,
        })
    }
}

impl From<(u8, u8)> for Position {
    fn from((row, column): (u8, u8)) -> Self {
        Self { row, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A knight leap, split into the unsigned offsets added to and then subtracted from a position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Leap {
    forward: Position,
    back: Position,
}

const fn magnitude(offset: i8, sign: i8) -> u8 {
    if offset.signum() == sign {
        offset.unsigned_abs()
    } else {
        0
    }
}

impl Leap {
    const fn new(rows: i8, columns: i8) -> Self {
        Self {
            forward: at(magnitude(rows, 1), magnitude(columns, 1)),
            back: at(magnitude(rows, -1), magnitude(columns, -1)),
        }
    }

    /// The signed row offset of the leap.
    pub fn rows(&self) -> i8 {
        self.forward.row as i8 - self.back.row as i8
    }

    /// The signed column offset of the leap.
    pub fn columns(&self) -> i8 {
        self.forward.column as i8 - self.back.column as i8
    }
}

/// The eight leaps available to a knight.
pub const KNIGHT_LEAPS: [Leap; 8] = [
    Leap::new(2, -1),
    Leap::new(2, 1),
    Leap::new(1, -2),
    Leap::new(1, 2),
    Leap::new(-2, -1),
    Leap::new(-2, 1),
    Leap::new(-1, 2),
    Leap::new(-1, -2),
];

/// An error raised when a layout does not cover exactly the cells of the board, or when a board
/// is loaded with a history that does not lead to its layout.
#[derive(Debug)]
pub enum ConfigurationError {
    /// The cell at this position was never assigned.
    MissingCell(Position),
    /// This position was assigned, but it is not on the board.
    ExtraCell(Position),
    /// The cell at this position was assigned more than once.
    DuplicateCell(Position),
    /// The text form held an unrecognised glyph at this position.
    UnknownGlyph(Position, char),
    /// The text form held this many rows instead of four.
    RowCount(usize),
    /// A board was loaded without any history.
    EmptyHistory,
    /// A board was loaded with a history which ends somewhere other than its current layout.
    StaleHistory,
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigurationError::MissingCell(pos) => {
                write!(f, "cell {pos} is missing from the layout")
            }
            ConfigurationError::ExtraCell(pos) => {
                write!(f, "position {pos} is not a cell of the board")
            }
            ConfigurationError::DuplicateCell(pos) => {
                write!(f, "cell {pos} was assigned more than once")
            }
            ConfigurationError::UnknownGlyph(pos, glyph) => {
                write!(f, "unrecognised glyph {glyph:?} at {pos}")
            }
            ConfigurationError::RowCount(rows) => {
                write!(f, "expected {ROWS} rows in the layout, found {rows}")
            }
            ConfigurationError::EmptyHistory => f.write_str("the board has no history"),
            ConfigurationError::StaleHistory => {
                f.write_str("the board's history does not end at its current layout")
            }
        }
    }
}

impl Error for ConfigurationError {}

/// The type of invalid move that was observed in an [`InvalidMoveError`].
#[derive(Debug)]
pub enum InvalidMoveType {
    /// The starting position is not on the board.
    StartOffBoard,
    /// The final position is not on the board.
    EndOffBoard,
    /// The final position already holds the provided piece.
    Occupied(Piece),
    /// There is no piece at the starting position.
    EmptyStart,
}

/// An error which describes an attempted invalid move.
#[derive(Debug)]
pub struct InvalidMoveError {
    start: Position,
    end: Position,
    variant: InvalidMoveType,
}

impl Display for InvalidMoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let (start, end) = (self.start, self.end);
        match &self.variant {
            InvalidMoveType::StartOffBoard => write!(
                f,
                "cannot move from {start} to {end} because {start} is not on the board"
            ),
            InvalidMoveType::EndOffBoard => write!(
                f,
                "cannot move from {start} to {end} because {end} is not on the board"
            ),
            InvalidMoveType::Occupied(piece) => write!(
                f,
                "cannot move from {start} to {end} because {end} is occupied by {piece}"
            ),
            InvalidMoveType::EmptyStart => write!(
                f,
                "cannot move from {start} to {end} because there is no piece at {start}"
            ),
        }
    }
}

impl Error for InvalidMoveError {}

/// An arrangement of pieces over every cell of the board.
#[derive(
    Copy, Clone, Debug, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Deserialize, Serialize,
)]
pub struct Layout {
    cells: [Piece; CELLS],
}

impl Layout {
    /// Black knights on (0, 0) and (0, 2), white knights on (1, 2) and (3, 1).
    pub const DEFAULT_START: Self = Self {
        cells: [
            Piece::Black,
            Piece::Empty,
            Piece::Black,
            Piece::Empty,
            Piece::Empty,
            Piece::White,
            Piece::Empty,
            Piece::Empty,
            Piece::Empty,
            Piece::White,
        ],
    };

    /// [`Layout::DEFAULT_START`] with the colours swapped.
    pub const DEFAULT_GOAL: Self = Self {
        cells: [
            Piece::White,
            Piece::Empty,
            Piece::White,
            Piece::Empty,
            Piece::Empty,
            Piece::Black,
            Piece::Empty,
            Piece::Empty,
            Piece::Empty,
            Piece::Black,
        ],
    };

    /// Build a layout from an assignment of pieces to cells. Every cell of the board must be
    /// assigned exactly once, and nothing else may be assigned.
    pub fn from_cells<P, I>(cells: I) -> Result<Self, ConfigurationError>
    where
        P: Into<Position>,
        I: IntoIterator<Item = (P, Piece)>,
    {
        let mut assigned = [None; CELLS];
        for (position, piece) in cells {
            let position = position.into();
            let idx = position
                .cell()
                .ok_or(ConfigurationError::ExtraCell(position))?;
            if assigned[idx].replace(piece).is_some() {
                return Err(ConfigurationError::DuplicateCell(position));
            }
        }
        let mut layout = Self::default();
        for ((slot, piece), position) in layout.cells.iter_mut().zip(assigned).zip(DOMAIN) {
            *slot = piece.ok_or(ConfigurationError::MissingCell(position))?;
        }
        Ok(layout)
    }

    /// Fetches the piece at the requested position, or `None` if the position is not on the
    /// board.
    pub fn get<P: Into<Position>>(&self, position: P) -> Option<Piece> {
        position.into().cell().map(|idx| self.cells[idx])
    }

    /// Every cell of the board with its contents, in [`DOMAIN`] order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        DOMAIN.into_iter().zip(self.cells.iter().copied())
    }

    /// The positions holding any piece.
    pub fn occupied(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells()
            .filter(|(_, piece)| !piece.is_empty())
            .map(|(position, _)| position)
    }

    /// The positions holding the provided piece.
    pub fn pieces_of(&self, piece: Piece) -> BTreeSet<Position> {
        self.cells()
            .filter(|&(_, held)| held == piece)
            .map(|(position, _)| position)
            .collect()
    }

    /// The text form of this layout, which is equal for two layouts iff they are equal.
    pub fn canonical_key(&self) -> String {
        self.to_string()
    }

    fn check_move(
        &self,
        start: Position,
        end: Position,
    ) -> Result<(usize, usize), InvalidMoveError> {
        let invalid = |variant| InvalidMoveError {
            start,
            end,
            variant,
        };
        let from = start
            .cell()
            .ok_or_else(|| invalid(InvalidMoveType::StartOffBoard))?;
        let to = end
            .cell()
            .ok_or_else(|| invalid(InvalidMoveType::EndOffBoard))?;
        if !self.cells[to].is_empty() {
            return Err(invalid(InvalidMoveType::Occupied(self.cells[to])));
        }
        if self.cells[from].is_empty() {
            return Err(invalid(InvalidMoveType::EmptyStart));
        }
        Ok((from, to))
    }
}

impl TryFrom<BTreeMap<Position, Piece>> for Layout {
    type Error = ConfigurationError;

    fn try_from(cells: BTreeMap<Position, Piece>) -> Result<Self, Self::Error> {
        Self::from_cells(cells)
    }
}

impl FromStr for Layout {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.len() != ROWS as usize {
            return Err(ConfigurationError::RowCount(lines.len()));
        }
        let mut cells = Vec::with_capacity(CELLS);
        for (line, row) in lines.into_iter().zip((0..ROWS).rev()) {
            for (column, glyph) in line.chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let position = at(row, u8::try_from(column).unwrap_or(u8::MAX));
                let piece = Piece::from_glyph(glyph)
                    .ok_or(ConfigurationError::UnknownGlyph(position, glyph))?;
                cells.push((position, piece));
            }
        }
        Self::from_cells(cells)
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for row in (0..ROWS).rev() {
            for column in 0..COLUMNS {
                match self.get((row, column)) {
                    Some(piece) => write!(f, "{piece}")?,
                    None => write!(f, " ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A layout on its way to a goal, along with every layout it has passed through.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(try_from = "BoardRecord")]
pub struct Board {
    layout: Layout,
    goal: Layout,
    history: Vec<Layout>,
}

#[derive(Deserialize)]
struct BoardRecord {
    layout: Layout,
    goal: Layout,
    history: Vec<Layout>,
}

impl TryFrom<BoardRecord> for Board {
    type Error = ConfigurationError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let Some(last) = record.history.last() else {
            return Err(ConfigurationError::EmptyHistory);
        };
        if *last != record.layout {
            return Err(ConfigurationError::StaleHistory);
        }
        Ok(Self {
            layout: record.layout,
            goal: record.goal,
            history: record.history,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Layout::DEFAULT_START, Layout::DEFAULT_GOAL)
    }
}

impl Board {
    /// Create a board at `start` which is finished once it reaches `goal`.
    pub fn new(start: Layout, goal: Layout) -> Self {
        Self {
            layout: start,
            goal,
            history: vec![start],
        }
    }

    /// The current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The layout this board is trying to reach.
    pub fn goal(&self) -> &Layout {
        &self.goal
    }

    /// Every layout this board has held, starting with the initial one and ending with the
    /// current one.
    pub fn history(&self) -> &[Layout] {
        &self.history
    }

    /// The number of moves made so far.
    pub fn moves(&self) -> usize {
        self.history.len() - 1
    }

    /// Whether the current layout is the goal.
    pub fn is_finished(&self) -> bool {
        self.layout == self.goal
    }

    /// The positions currently holding the provided piece.
    pub fn pieces_of(&self, piece: Piece) -> BTreeSet<Position> {
        self.layout.pieces_of(piece)
    }

    /// Move the piece at `start` to `end`, recording the new layout. The board is left untouched
    /// if the move is invalid. No leap shape is enforced here; see [`Board::successors`].
    pub fn move_piece<S, E>(&mut self, start: S, end: E) -> Result<(), InvalidMoveError>
    where
        S: Into<Position>,
        E: Into<Position>,
    {
        let cells = self.layout.check_move(start.into(), end.into())?;
        self.advance(cells);
        Ok(())
    }

    /// As [`Board::move_piece`], reporting only whether the move was made.
    pub fn apply_move<S, E>(&mut self, start: S, end: E) -> bool
    where
        S: Into<Position>,
        E: Into<Position>,
    {
        self.move_piece(start, end).is_ok()
    }

    fn advance(&mut self, (from, to): (usize, usize)) {
        self.layout.cells.swap(from, to);
        self.history.push(self.layout);
    }

    /// One board per legal knight move of any piece, each carrying its own copy of the history.
    pub fn successors(&self) -> Vec<Board> {
        let mut boards = Vec::new();
        for start in self.layout.occupied() {
            for leap in KNIGHT_LEAPS {
                let Some(end) = start.leap(leap) else {
                    continue;
                };
                if let Ok(cells) = self.layout.check_move(start, end) {
                    let mut next = self.clone();
                    next.advance(cells);
                    boards.push(next);
                }
            }
        }
        boards
    }

    /// A displayable view of the whole history, one layout after another.
    pub fn display_history(&self) -> HistoryDisplay<'_> {
        HistoryDisplay(&self.history)
    }
}

/// Displays every layout of a board's history, each preceded by a blank line.
#[derive(Copy, Clone, Debug)]
pub struct HistoryDisplay<'a>(&'a [Layout]);

impl Display for HistoryDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for layout in self.0 {
            writeln!(f)?;
            write!(f, "{layout}")?;
        }
        Ok(())
    }
}

/// Counters collected over a traversal.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct SearchStats {
    /// Number of layers expanded.
    pub layers: usize,
    /// Number of boards expanded, the root included.
    pub expanded: usize,
    /// Number of successor boards generated.
    pub generated: usize,
    /// Successors discarded because their layout had already been visited.
    pub pruned: usize,
    /// Successors discarded because another board of the same layer reached the same layout.
    pub collapsed: usize,
}

/// The outcome of a traversal.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Traversal {
    solutions: Vec<Board>,
    visited: BTreeMap<String, Layout>,
    stats: SearchStats,
}

impl Traversal {
    /// Every board that reached its goal, one per path.
    pub fn solutions(&self) -> &[Board] {
        &self.solutions
    }

    /// Consume this traversal, keeping only the solutions.
    pub fn into_solutions(self) -> Vec<Board> {
        self.solutions
    }

    /// Every layout expanded during the traversal, keyed by [`Layout::canonical_key`]. Goal
    /// layouts are never expanded and so do not appear here.
    pub fn visited(&self) -> &BTreeMap<String, Layout> {
        &self.visited
    }

    /// Counters collected during the traversal.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

#[derive(Default)]
struct Search {
    visited: BTreeMap<String, Layout>,
    solutions: Vec<Board>,
    stats: SearchStats,
}

impl Search {
    /// Record `frontier` as visited and produce the next layer from it.
    fn expand(&mut self, frontier: &[Board]) -> Vec<Board> {
        self.stats.layers += 1;
        self.stats.expanded += frontier.len();
        for board in frontier {
            self.visited.insert(board.layout.canonical_key(), board.layout);
        }

        let mut arrived = 0;
        let mut layer = BTreeMap::new();
        for board in frontier {
            for next in board.successors() {
                self.stats.generated += 1;
                let key = next.layout.canonical_key();
                if self.visited.contains_key(&key) {
                    self.stats.pruned += 1;
                } else if next.is_finished() {
                    self.solutions.push(next);
                } else {
                    // last write wins
                    arrived += 1;
                    layer.insert(key, next);
                }
            }
        }
        self.stats.collapsed += arrived - layer.len();
        layer.into_values().collect()
    }

    fn finish(self) -> Traversal {
        Traversal {
            solutions: self.solutions,
            visited: self.visited,
            stats: self.stats,
        }
    }
}

/// Breadth-first search from `root` for every path to its goal that never revisits a layout.
///
/// Each layer is recorded as visited before it is expanded. Successors whose layout was visited
/// in this or any earlier layer are discarded. Finished successors are collected as solutions
/// and never expanded, so the goal layout may be reached again in later layers. Of the rest, only
/// the last board to reach each layout is kept for the next layer; the histories of the others
/// are dropped.
pub fn traverse(root: Board) -> Traversal {
    let mut search = Search::default();
    let mut frontier = vec![root];
    while !frontier.is_empty() {
        frontier = search.expand(&frontier);
    }
    search.finish()
}
