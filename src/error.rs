use thiserror::Error;

/// Invalid puzzle data or an invalid generation request.
///
/// Failing to find a puzzle is not an error: generation reports that through
/// `Option` and short batches.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("invalid board: {reason}")]
    InvalidBoard { reason: String },

    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    #[error("invalid side `{value}` (expected B or W)")]
    InvalidSide { value: String },

    #[error("move {notation} has no evaluation")]
    MissingEvaluation { notation: String },

    #[error("puzzle has no legal moves")]
    NoLegalMoves,

    #[error("move {notation} is listed more than once")]
    DuplicateMove { notation: String },

    #[error("best move {notation} is not among the legal moves")]
    BestMoveNotListed { notation: String },

    #[error("best move {notation} disagrees with its legal-move entry")]
    BestMoveMismatch { notation: String },

    #[error("best move {notation} ({evaluation:+}) is not strictly better than every other move")]
    BestMoveNotUnique { notation: String, evaluation: i32 },

    #[error("invalid generator config: {reason}")]
    InvalidConfig { reason: String },

    #[error("malformed puzzle json: {0}")]
    Json(#[from] serde_json::Error),
}
