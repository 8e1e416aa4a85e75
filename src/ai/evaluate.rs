use tracing::debug;

use crate::ai::search::{SEARCH_DEPTH_BUFFER, Searcher};
use crate::board::Board;
use crate::types::{Move, Side};

/// Solves every legal move of `side` to the end of the game.
///
/// Returns the moves best-first with evaluations filled in. Equal evaluations
/// keep row-major order. Empty when `side` has no legal move.
pub fn evaluate_moves(board: &Board, side: Side) -> Vec<Move> {
    evaluate_moves_with(&mut Searcher::new(), board, side)
}

/// Same as [`evaluate_moves`], accumulating work counters in `searcher`.
pub fn evaluate_moves_with(searcher: &mut Searcher, board: &Board, side: Side) -> Vec<Move> {
    let mut evaluated: Vec<Move> = board
        .legal_moves(side)
        .into_iter()
        .map(|mv| {
            let next = board.apply(&mv, side);
            let depth = next.empty_count() + SEARCH_DEPTH_BUFFER;
            // The reply belongs to the opponent, so the first ply minimizes.
            mv.with_evaluation(searcher.solve(&next, side, depth, false))
        })
        .collect();

    // Stable: ties stay in enumeration order.
    evaluated.sort_by(|left, right| right.evaluation.cmp(&left.evaluation));

    debug!(
        side = %side,
        empties = board.empty_count(),
        moves = evaluated.len(),
        nodes = searcher.stats().nodes,
        cutoffs = searcher.stats().cutoffs,
        "evaluated position"
    );

    evaluated
}
