//! Board model used while reading and mining game records.
//!
//! [`BoardEngine`] is what the parser and the pattern miner talk to; [`Goban`]
//! is the standard implementation. Coordinates follow SGF conventions: column
//! and row count from the upper-left corner.

pub mod coord;
mod goban;
mod handicap;
mod symmetry;

use std::fmt;
use std::str::FromStr;

pub use goban::Goban;
pub use handicap::{handicap_points, handicap_symmetries};
pub use symmetry::Symmetry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// The SGF property letter for a move of this color.
    pub fn letter(self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub col: u8,
    pub row: u8,
}

impl Point {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

/// Where a move was played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Loc {
    Pass,
    Point(Point),
}

impl Loc {
    pub fn point(self) -> Option<Point> {
        match self {
            Self::Pass => None,
            Self::Point(point) => Some(point),
        }
    }

    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

impl From<Point> for Loc {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardSize {
    pub cols: u8,
    pub rows: u8,
}

impl BoardSize {
    /// Largest dimension expressible with SGF coordinates.
    pub const MAX: u8 = 52;

    pub fn new(cols: u32, rows: u32) -> Result<Self, BoardError> {
        let max = u32::from(Self::MAX);
        if cols == 0 || rows == 0 || cols > max || rows > max {
            return Err(BoardError::BadSize { cols, rows });
        }
        Ok(Self { cols: cols as u8, rows: rows as u8 })
    }

    pub const fn square(n: u8) -> Self {
        Self { cols: n, rows: n }
    }

    pub fn is_square(self) -> bool {
        self.cols == self.rows
    }

    pub fn contains(self, point: Point) -> bool {
        point.col < self.cols && point.row < self.rows
    }

    pub fn area(self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }

    pub(crate) fn index(self, point: Point) -> usize {
        usize::from(point.row) * usize::from(self.cols) + usize::from(point.col)
    }

    /// Orthogonal neighbours of `point` that lie on the board.
    pub fn adjacent(self, point: Point) -> impl Iterator<Item = Point> {
        let Point { col, row } = point;
        [
            col.checked_sub(1).map(|c| Point::new(c, row)),
            col.checked_add(1).map(|c| Point::new(c, row)),
            row.checked_sub(1).map(|r| Point::new(col, r)),
            row.checked_add(1).map(|r| Point::new(col, r)),
        ]
        .into_iter()
        .flatten()
        .filter(move |p| self.contains(*p))
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::square(19)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_square() {
            write!(f, "{}", self.cols)
        } else {
            write!(f, "{}:{}", self.cols, self.rows)
        }
    }
}

/// Reads an SZ value, `n` for a square board or `cols:rows`.
impl FromStr for BoardSize {
    type Err = BoardError;

    fn from_str(text: &str) -> Result<Self, BoardError> {
        let number = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| BoardError::SizeSyntax(text.to_owned()))
        };
        match text.split_once(':') {
            Some((cols, rows)) => Self::new(number(cols)?, number(rows)?),
            None => {
                let n = number(text)?;
                Self::new(n, n)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("point {0} is off the {1} board")]
    OffBoard(Point, BoardSize),
    #[error("point {0} is already occupied")]
    Occupied(Point),
    #[error("point {0} is already empty")]
    AlreadyEmpty(Point),
    #[error("board size {cols}:{rows} is outside 1..=52")]
    BadSize { cols: u32, rows: u32 },
    #[error("`{0}` is not a board size")]
    SizeSyntax(String),
}

/// The board operations the parser and the pattern miner rely on.
///
/// Every applied change is undoable, newest first. `depth` counts applied
/// changes (moves and setup stones) so callers can record where a branch
/// started and undo back to it.
pub trait BoardEngine {
    fn size(&self) -> BoardSize;

    /// Clears the board and its history. With `apply == false` moves and setup
    /// stones are only counted, the grid stays empty.
    fn reset(&mut self, size: BoardSize, apply: bool);

    fn depth(&self) -> u32;

    /// Number of moves on the current line.
    fn move_number(&self) -> u32;

    /// Plays a move and returns its number on the current line.
    fn play(&mut self, loc: Loc, color: Color) -> Result<u32, BoardError>;

    /// Adds (`Some`) or removes (`None`) a stone outside of normal play.
    fn setup(&mut self, point: Point, stone: Option<Color>) -> Result<(), BoardError>;

    /// Reverts the newest change. Returns `false` when nothing is left.
    fn undo(&mut self) -> bool;

    fn status(&self, point: Point) -> Option<Color>;

    fn occupied(&self) -> usize;

    fn adjacent(&self, point: Point) -> impl Iterator<Item = Point> {
        self.size().adjacent(point)
    }

    fn rewind(&mut self) {
        while self.undo() {}
    }

    /// The representative of `loc` under the symmetries that keep a
    /// `handicap` stone layout fixed, and the transform that produces it.
    fn canonical(&self, loc: Loc, handicap: u8) -> (Loc, Symmetry) {
        symmetry::canonical(loc, handicap_symmetries(handicap), self.size())
    }

    /// The image of `loc`, or `None` when `loc` is off the board.
    fn transform(&self, loc: Loc, symmetry: Symmetry) -> Option<Loc> {
        symmetry.apply_loc(loc, self.size())
    }
}
