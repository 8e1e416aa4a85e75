use std::fmt;

use crate::board::Board;
use crate::error::PuzzleError;
use crate::types::{BOARD_SIZE, Move, Side};

/// An endgame position with exactly one right answer.
///
/// Contract (checked by [`Puzzle::new`], never afterwards):
/// - every legal move carries an evaluation and names a distinct square;
/// - `best_move` is listed in `legal_moves` with the same evaluation;
/// - `best_move` scores strictly higher than every other listed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    board: Board,
    side_to_move: Side,
    legal_moves: Vec<Move>,
    best_move: Move,
}

impl Puzzle {
    pub fn new(
        board: Board,
        side_to_move: Side,
        legal_moves: Vec<Move>,
        best_move: Move,
    ) -> Result<Self, PuzzleError> {
        if legal_moves.is_empty() {
            return Err(PuzzleError::NoLegalMoves);
        }
        for mv in legal_moves.iter().chain(std::iter::once(&best_move)) {
            if mv.evaluation.is_none() {
                return Err(PuzzleError::MissingEvaluation {
                    notation: mv.to_string(),
                });
            }
        }

        for (i, mv) in legal_moves.iter().enumerate() {
            if legal_moves[..i].iter().any(|earlier| earlier.same_square(mv)) {
                return Err(PuzzleError::DuplicateMove {
                    notation: mv.to_string(),
                });
            }
        }

        let listed = legal_moves
            .iter()
            .find(|mv| mv.same_square(&best_move))
            .ok_or_else(|| PuzzleError::BestMoveNotListed {
                notation: best_move.to_string(),
            })?;
        if listed.evaluation != best_move.evaluation {
            return Err(PuzzleError::BestMoveMismatch {
                notation: best_move.to_string(),
            });
        }

        let best = best_move.evaluation.unwrap_or(i32::MIN);
        let challenged = legal_moves
            .iter()
            .filter(|mv| !mv.same_square(&best_move))
            .any(|mv| mv.evaluation.unwrap_or(i32::MIN) >= best);
        if challenged {
            return Err(PuzzleError::BestMoveNotUnique {
                notation: best_move.to_string(),
                evaluation: best,
            });
        }

        Ok(Self {
            board,
            side_to_move,
            legal_moves,
            best_move,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn best_move(&self) -> &Move {
        &self.best_move
    }

    /// Evaluation of the best move; always present by construction.
    pub fn best_evaluation(&self) -> i32 {
        self.best_move.evaluation.unwrap_or_default()
    }

    /// Plain listing: side, raw board, best move, and every move in stored order.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Side to move: {}", self.side_to_move),
            "Board:".to_string(),
            self.board.to_string(),
            String::new(),
            format!(
                "Best move: {} (score {:+})",
                self.best_move,
                self.best_evaluation()
            ),
            "All moves:".to_string(),
        ];
        for mv in &self.legal_moves {
            lines.push(format!(
                "  {mv}: {:+}{}",
                mv.evaluation.unwrap_or_default(),
                self.marker(mv, " <-- best")
            ));
        }
        lines.join("\n")
    }

    fn marker(&self, mv: &Move, text: &'static str) -> &'static str {
        if mv.same_square(&self.best_move) { text } else { "" }
    }
}

/// Labelled board followed by the moves best-first.
impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board:")?;
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{}", row + 1)?;
            for col in 0..BOARD_SIZE {
                write!(f, " {}", self.board.cell(row, col).as_char())?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nSide to move: {}", self.side_to_move)?;
        writeln!(
            f,
            "\nBest move for {}: {} (score {:+})",
            self.side_to_move,
            self.best_move,
            self.best_evaluation()
        )?;
        write!(f, "\nAll moves:")?;

        let mut ranked: Vec<&Move> = self.legal_moves.iter().collect();
        ranked.sort_by(|left, right| right.evaluation.cmp(&left.evaluation));
        for mv in ranked {
            write!(
                f,
                "\n  {mv}: {:+}{}",
                mv.evaluation.unwrap_or_default(),
                self.marker(mv, "  <-- best")
            )?;
        }
        Ok(())
    }
}
