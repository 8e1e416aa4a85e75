//! JSON form of a puzzle.
//!
//! ```json
//! {
//!   "board": "........\n...",
//!   "side_to_move": "B",
//!   "legal_moves": [{ "move": "f2", "row": 1, "col": 5, "evaluation": 22 }],
//!   "best_move": { "move": "f2", "row": 1, "col": 5, "evaluation": 22 }
//! }
//! ```
//!
//! Loading goes through [`Puzzle::new`], so a record whose best move is not
//! the unique maximum is rejected rather than accepted as-is.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::PuzzleError;
use crate::puzzle::Puzzle;
use crate::types::{Move, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    #[serde(rename = "move")]
    pub notation: String,
    pub row: u8,
    pub col: u8,
    pub evaluation: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub board: String,
    pub side_to_move: Side,
    pub legal_moves: Vec<MoveRecord>,
    pub best_move: MoveRecord,
}

impl From<&Move> for MoveRecord {
    fn from(mv: &Move) -> Self {
        Self {
            notation: mv.to_string(),
            row: mv.row,
            col: mv.col,
            evaluation: mv.evaluation.unwrap_or_default(),
        }
    }
}

impl TryFrom<&MoveRecord> for Move {
    type Error = PuzzleError;

    fn try_from(record: &MoveRecord) -> Result<Self, Self::Error> {
        let mv = Move::try_new(record.row, record.col)?;
        if mv.to_string() != record.notation.to_ascii_lowercase() {
            return Err(PuzzleError::InvalidMove {
                reason: format!(
                    "`{}` does not match row {} col {}",
                    record.notation, record.row, record.col
                ),
            });
        }
        Ok(mv.with_evaluation(record.evaluation))
    }
}

impl From<&Puzzle> for PuzzleRecord {
    fn from(puzzle: &Puzzle) -> Self {
        Self {
            board: puzzle.board().to_string(),
            side_to_move: puzzle.side_to_move(),
            legal_moves: puzzle.legal_moves().iter().map(MoveRecord::from).collect(),
            best_move: MoveRecord::from(puzzle.best_move()),
        }
    }
}

impl TryFrom<PuzzleRecord> for Puzzle {
    type Error = PuzzleError;

    fn try_from(record: PuzzleRecord) -> Result<Self, Self::Error> {
        let board: Board = record.board.parse()?;
        let legal_moves = record
            .legal_moves
            .iter()
            .map(Move::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let best_move = Move::try_from(&record.best_move)?;

        Puzzle::new(board, record.side_to_move, legal_moves, best_move)
    }
}

/// Serializes puzzles as a pretty-printed JSON array.
pub fn puzzles_to_json(puzzles: &[Puzzle]) -> Result<String, PuzzleError> {
    let records: Vec<PuzzleRecord> = puzzles.iter().map(PuzzleRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses and validates a JSON array of puzzle records.
pub fn puzzles_from_json(json: &str) -> Result<Vec<Puzzle>, PuzzleError> {
    let records: Vec<PuzzleRecord> = serde_json::from_str(json)?;
    records.into_iter().map(Puzzle::try_from).collect()
}
