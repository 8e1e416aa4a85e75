use crate::board::Board;
use crate::types::Side;

/// Extra plies on top of the empty-square count so that any run of passes
/// still reaches a terminal position before depth runs out.
pub const SEARCH_DEPTH_BUFFER: u8 = 10;
/// Hard recursion bound: every square empty plus the pass buffer.
pub const MAX_SEARCH_DEPTH: u8 = 64 + SEARCH_DEPTH_BUFFER;

const MIN_SCORE: i32 = i32::MIN;
const MAX_SCORE: i32 = i32::MAX;

/// Work counters for one or more searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub passes: u64,
}

/// Exhaustive minimax with alpha-beta pruning.
///
/// There is no heuristic evaluation: leaves are scored by disc differential,
/// so the result is the exact game outcome whenever the depth reaches the end
/// of the game in every branch.
#[derive(Debug, Default)]
pub struct Searcher {
    stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Full-window search of `board` from `perspective`'s point of view.
    ///
    /// `depth` is clamped to `MAX_SEARCH_DEPTH`, which bounds the recursion.
    pub fn solve(&mut self, board: &Board, perspective: Side, depth: u8, maximizing: bool) -> i32 {
        self.minimax(
            board,
            perspective,
            depth.min(MAX_SEARCH_DEPTH),
            MIN_SCORE,
            MAX_SCORE,
            maximizing,
        )
    }

    /// Caller contract: `depth <= MAX_SEARCH_DEPTH`.
    pub fn minimax(
        &mut self,
        board: &Board,
        perspective: Side,
        depth: u8,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> i32 {
        debug_assert!(depth <= MAX_SEARCH_DEPTH, "search depth {depth} exceeds bound");
        self.stats.nodes += 1;

        if board.is_terminal() || depth == 0 {
            return board.score(perspective);
        }

        let mover = if maximizing {
            perspective
        } else {
            perspective.opponent()
        };
        let moves = board.legal_moves(mover);

        if moves.is_empty() {
            if !board.has_legal_move(mover.opponent()) {
                return board.score(perspective);
            }
            self.stats.passes += 1;
            return self.minimax(board, perspective, depth - 1, alpha, beta, !maximizing);
        }

        let mut alpha = alpha;
        let mut beta = beta;

        if maximizing {
            let mut best = MIN_SCORE;
            for mv in &moves {
                let next = board.apply(mv, mover);
                let score = self.minimax(&next, perspective, depth - 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        } else {
            let mut best = MAX_SCORE;
            for mv in &moves {
                let next = board.apply(mv, mover);
                let score = self.minimax(&next, perspective, depth - 1, alpha, beta, true);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{BLACK_PASSES, FOUR_EMPTY};
    use crate::types::Move;

    fn board(text: &str) -> Board {
        text.parse().expect("fixture must parse")
    }

    #[test]
    fn terminal_board_returns_score_even_with_depth_left() {
        let full = Board::from_bitboards(u64::MAX ^ 0xFF, 0xFF);
        let mut searcher = Searcher::new();

        assert_eq!(searcher.solve(&full, Side::Black, 20, true), 48);
        assert_eq!(searcher.solve(&full, Side::White, 20, false), -48);
        assert_eq!(searcher.stats().nodes, 2);
    }

    #[test]
    fn depth_zero_returns_current_differential() {
        let mut searcher = Searcher::new();

        assert_eq!(searcher.solve(&Board::new(), Side::Black, 0, true), 0);
    }

    #[test]
    fn solves_each_reply_of_four_empty_fixture() {
        let position = board(FOUR_EMPTY);
        let mut searcher = Searcher::new();

        for (notation, expected) in [("f2", 22), ("b1", -12), ("b2", -12)] {
            let mv: Move = notation.parse().unwrap();
            let next = position.apply(&mv, Side::Black);
            let depth = next.empty_count() + SEARCH_DEPTH_BUFFER;

            assert_eq!(searcher.solve(&next, Side::Black, depth, false), expected, "{notation}");
        }
    }

    #[test]
    fn pass_hands_the_turn_over_without_moving() {
        let position = board(BLACK_PASSES);
        assert!(position.legal_moves(Side::Black).is_empty());

        let mut searcher = Searcher::new();
        let depth = position.empty_count() + SEARCH_DEPTH_BUFFER;

        // Black must pass, White then plays its best line worth +40.
        assert_eq!(searcher.solve(&position, Side::Black, depth, true), -40);
        assert!(searcher.stats().passes >= 1);
    }

    #[test]
    fn pruning_does_not_change_the_result() {
        let position = board(FOUR_EMPTY);
        let depth = position.empty_count() + SEARCH_DEPTH_BUFFER;
        let mut searcher = Searcher::new();

        let pruned = searcher.solve(&position, Side::Black, depth, true);
        let narrow = searcher.minimax(&position, Side::Black, depth, 21, 23, true);

        assert_eq!(pruned, 22);
        assert_eq!(narrow, 22);
    }

    #[test]
    fn depth_is_clamped_to_bound() {
        let mut searcher = Searcher::new();
        let full = Board::from_bitboards(u64::MAX, 0);

        assert_eq!(searcher.solve(&full, Side::Black, u8::MAX, true), 64);
    }
}
