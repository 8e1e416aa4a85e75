use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

pub const BOARD_SIZE: u8 = 8;

/// A player colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "W")]
    White,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Single-letter form used by the board text and puzzle records.
    pub fn as_char(self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Side {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" | "b" => Ok(Self::Black),
            "W" | "w" => Ok(Self::White),
            other => Err(PuzzleError::InvalidSide {
                value: other.to_string(),
            }),
        }
    }
}

/// Contents of one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn as_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Black => 'B',
            Self::White => 'W',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Self::Empty),
            'B' => Some(Self::Black),
            'W' => Some(Self::White),
            _ => None,
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Self::Black,
            Side::White => Self::White,
        }
    }
}

/// A placement on the board.
///
/// Contract:
/// - `row` and `col` are in `0..8`.
/// - `evaluation` is `None` for a candidate and `Some` once searched; the
///   value is the final disc differential from the mover's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: u8,
    pub col: u8,
    pub evaluation: Option<i32>,
}

impl Move {
    pub fn new(row: u8, col: u8) -> Self {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "move ({row}, {col}) is off the board"
        );
        Self {
            row,
            col,
            evaluation: None,
        }
    }

    /// Checked constructor for coordinates coming from outside the crate.
    pub fn try_new(row: u8, col: u8) -> Result<Self, PuzzleError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(PuzzleError::InvalidMove {
                reason: format!("({row}, {col}) is outside the 8x8 board"),
            });
        }
        Ok(Self::new(row, col))
    }

    pub(crate) fn from_index(pos: usize) -> Self {
        Self::new((pos / BOARD_SIZE as usize) as u8, (pos % BOARD_SIZE as usize) as u8)
    }

    pub fn with_evaluation(self, evaluation: i32) -> Self {
        Self {
            evaluation: Some(evaluation),
            ..self
        }
    }

    /// Bit index of the square, `row * 8 + col`.
    pub fn index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// True when both moves name the same square, whatever their evaluations.
    pub fn same_square(&self, other: &Move) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

impl FromStr for Move {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PuzzleError::InvalidMove {
            reason: format!("`{s}` is not algebraic notation (a1..h8)"),
        };

        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(invalid());
        }

        Ok(Self::new(rank as u8 - b'1', file as u8 - b'a'))
    }
}
