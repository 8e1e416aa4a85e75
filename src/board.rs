use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;
use crate::types::{BOARD_SIZE, Cell, Move, Side};

const WIDTH: usize = BOARD_SIZE as usize;
const NUM_SQUARES: usize = WIDTH * WIDTH;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Reversi board state represented by two bitboards.
///
/// Bit `row * 8 + col` is set in `black` or `white` when that side owns the
/// square. The two masks never overlap. `Board` is `Copy`, so every move
/// application yields a new value and leaves the caller's board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn from_bitboards(black: u64, white: u64) -> Self {
        assert_eq!(black & white, 0, "a square cannot hold both colours");
        Self { black, white }
    }

    pub fn cell(&self, row: u8, col: u8) -> Cell {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "cell ({row}, {col}) is off the board"
        );
        let square = bit(row as usize * WIDTH + col as usize);
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns true when `side` may play at `(row, col)`.
    pub fn is_legal(&self, row: u8, col: u8, side: Side) -> bool {
        self.flips(row, col, side) != 0
    }

    /// Returns the mask of discs a placement at `(row, col)` would flip.
    /// Zero when the square is occupied or nothing is bracketed.
    pub fn flips(&self, row: u8, col: u8, side: Side) -> u64 {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "cell ({row}, {col}) is off the board"
        );
        let (me, opp) = self.split(side);
        collect_flips(row as usize * WIDTH + col as usize, me, opp)
    }

    /// Returns legal move mask for the given side.
    pub fn legal_mask(&self, side: Side) -> u64 {
        let (me, opp) = self.split(side);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves for `side` in row-major order, without evaluations.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut mask = self.legal_mask(side);
        let mut out = Vec::with_capacity(mask.count_ones() as usize);
        while mask != 0 {
            out.push(Move::from_index(mask.trailing_zeros() as usize));
            mask &= mask - 1;
        }
        out
    }

    pub fn has_legal_move(&self, side: Side) -> bool {
        self.legal_mask(side) != 0
    }

    /// Places `side`'s disc at `mv` and flips every bracketed run.
    ///
    /// Caller contract: the target square is empty. The returned board is a
    /// new value; `self` is left as it was.
    pub fn apply(&self, mv: &Move, side: Side) -> Board {
        let pos = mv.index();
        debug_assert!(
            ((self.black | self.white) & bit(pos)) == 0,
            "apply() on occupied square {mv}"
        );

        let (me, opp) = self.split(side);
        let flips = collect_flips(pos, me, opp);
        let next_me = me | bit(pos) | flips;
        let next_opp = opp & !flips;

        match side {
            Side::Black => Self {
                black: next_me,
                white: next_opp,
            },
            Side::White => Self {
                black: next_opp,
                white: next_me,
            },
        }
    }

    /// True when neither side has a legal move.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Side::Black) && !self.has_legal_move(Side::White)
    }

    /// Disc count of `side` minus disc count of its opponent.
    pub fn score(&self, side: Side) -> i32 {
        let (me, opp) = self.split(side);
        me.count_ones() as i32 - opp.count_ones() as i32
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    fn split(&self, side: Side) -> (u64, u64) {
        match side {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Eight lines of eight `.`/`B`/`W` characters joined by `\n`, no trailing newline.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..BOARD_SIZE {
                write!(f, "{}", self.cell(row, col).as_char())?;
            }
        }
        Ok(())
    }
}

/// Strict inverse of `Display`: anything but exactly 8 lines of exactly 8
/// known characters is rejected.
impl FromStr for Board {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.split('\n').collect();
        if lines.len() != WIDTH {
            return Err(PuzzleError::InvalidBoard {
                reason: format!("expected {WIDTH} lines, got {}", lines.len()),
            });
        }

        let mut black = 0u64;
        let mut white = 0u64;
        for (row, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != WIDTH {
                return Err(PuzzleError::InvalidBoard {
                    reason: format!(
                        "line {} has {} characters, expected {WIDTH}",
                        row + 1,
                        cells.len()
                    ),
                });
            }
            for (col, c) in cells.into_iter().enumerate() {
                let square = bit(row * WIDTH + col);
                match Cell::from_char(c) {
                    Some(Cell::Black) => black |= square,
                    Some(Cell::White) => white |= square,
                    Some(Cell::Empty) => {}
                    None => {
                        return Err(PuzzleError::InvalidBoard {
                            reason: format!(
                                "unexpected character `{c}` at line {} column {}",
                                row + 1,
                                col + 1
                            ),
                        });
                    }
                }
            }
        }

        Ok(Self { black, white })
    }
}

fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
    if pos >= NUM_SQUARES {
        return 0;
    }

    let move_bit = bit(pos);
    if ((me | opp) & move_bit) != 0 {
        return 0;
    }

    let (row, col) = pos_to_row_col(pos);
    let mut flips = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut line = 0u64;

        while in_bounds(r, c) {
            let square = bit((r as usize) * WIDTH + c as usize);
            if (opp & square) != 0 {
                line |= square;
            } else {
                // Own disc closes the run; empty square ends it unflipped.
                if (me & square) != 0 {
                    flips |= line;
                }
                break;
            }

            r += dr;
            c += dc;
        }
    }

    flips
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / WIDTH) as i32, (pos % WIDTH) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..WIDTH as i32).contains(&row) && (0..WIDTH as i32).contains(&col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn idx(row: usize, col: usize) -> usize {
        row * WIDTH + col
    }

    fn notation(moves: &[Move]) -> Vec<String> {
        moves.iter().map(Move::to_string).collect()
    }

    /// Boards reached by random play, including some late-game ones.
    fn random_positions(seed: u64, count: usize) -> Vec<(Board, Side)> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut out = Vec::new();
        let mut board = Board::new();
        let mut side = Side::Black;

        while out.len() < count {
            out.push((board, side));
            let moves = board.legal_moves(side);
            match moves.choose(&mut rng) {
                Some(mv) => {
                    board = board.apply(mv, side);
                    side = side.opponent();
                }
                None if board.has_legal_move(side.opponent()) => side = side.opponent(),
                None => {
                    board = Board::new();
                    side = Side::Black;
                }
            }
        }
        out
    }

    #[test]
    fn initial_board_has_two_discs_each() {
        let board = Board::new();

        assert_eq!(board.count(), (2, 2));
        assert_eq!(board.empty_count(), 60);
        assert_eq!(board.cell(3, 3), Cell::White);
        assert_eq!(board.cell(3, 4), Cell::Black);
        assert_eq!(board.cell(4, 3), Cell::Black);
        assert_eq!(board.cell(4, 4), Cell::White);
    }

    #[test]
    fn t01_initial_black_legal_moves_are_four_expected_squares() {
        let board = Board::new();

        // d3,c4,f5,e6
        let expected = bit(idx(2, 3)) | bit(idx(3, 2)) | bit(idx(4, 5)) | bit(idx(5, 4));

        assert_eq!(board.legal_mask(Side::Black), expected);
        assert_eq!(
            notation(&board.legal_moves(Side::Black)),
            ["d3", "c4", "f5", "e6"]
        );
    }

    #[test]
    fn initial_white_also_has_four_moves() {
        let board = Board::new();

        assert_eq!(
            notation(&board.legal_moves(Side::White)),
            ["e3", "f4", "c5", "d6"]
        );
    }

    #[test]
    fn apply_flips_opponent_discs_and_updates_counts() {
        let board = Board::new();

        let next = board.apply(&Move::new(2, 3), Side::Black); // d3

        assert_eq!(next.count(), (4, 1));
        assert_eq!(next.empty_count(), 59);
        assert_eq!(next.cell(2, 3), Cell::Black);
        assert_eq!(next.cell(3, 3), Cell::Black);
        assert_eq!(next.cell(3, 4), Cell::Black);
        assert_eq!(next.cell(4, 3), Cell::Black);
        assert_eq!(next.cell(4, 4), Cell::White);
    }

    #[test]
    fn apply_leaves_source_board_unchanged() {
        for (board, side) in random_positions(7, 200) {
            let before = board;
            for mv in board.legal_moves(side) {
                let _ = board.apply(&mv, side);
                assert_eq!(board, before);
            }
        }
    }

    #[test]
    fn occupied_square_is_never_legal() {
        let board = Board::new();

        assert!(!board.is_legal(3, 3, Side::Black));
        assert!(!board.is_legal(3, 4, Side::White));
        assert_eq!(board.flips(3, 3, Side::Black), 0);
    }

    #[test]
    fn run_ending_on_empty_or_edge_flips_nothing() {
        // Row 0: a1 empty, b1..g1 white, h1 empty. Nothing closes the run.
        let white = (1..7).fold(0u64, |acc, c| acc | bit(idx(0, c)));
        let board = Board::from_bitboards(bit(idx(5, 5)), white);

        assert!(!board.is_legal(0, 0, Side::Black));
        assert!(!board.is_legal(0, 7, Side::Black));
    }

    #[test]
    fn every_flipped_disc_lies_on_a_closed_run() {
        for (board, side) in random_positions(11, 300) {
            let (_, opp) = board.split(side);
            for mv in board.legal_moves(side) {
                let flips = board.flips(mv.row, mv.col, side);
                assert_ne!(flips, 0);
                assert_eq!(flips & !opp, 0, "only opponent discs flip");

                // Rebuild the flip set ray by ray and compare.
                let mut expected = 0u64;
                for (dr, dc) in DIRECTIONS {
                    let (mut r, mut c) = (mv.row as i32 + dr, mv.col as i32 + dc);
                    let mut run = 0u64;
                    while in_bounds(r, c)
                        && board.cell(r as u8, c as u8) == Cell::from(side.opponent())
                    {
                        run |= bit(r as usize * WIDTH + c as usize);
                        r += dr;
                        c += dc;
                    }
                    if in_bounds(r, c) && board.cell(r as u8, c as u8) == Cell::from(side) {
                        expected |= run;
                    }
                }
                assert_eq!(flips, expected, "{mv} on\n{board}");

                let next = board.apply(&mv, side);
                assert_eq!(
                    next.score(side),
                    board.score(side) + 1 + 2 * flips.count_ones() as i32
                );
            }
        }
    }

    #[test]
    fn full_board_is_terminal() {
        let board = Board::from_bitboards(u64::MAX ^ 0xFF, 0xFF);

        assert_eq!(board.empty_count(), 0);
        assert!(board.is_terminal());
        assert!(board.legal_moves(Side::Black).is_empty());
        assert!(board.legal_moves(Side::White).is_empty());
    }

    #[test]
    fn initial_board_is_not_terminal() {
        assert!(!Board::new().is_terminal());
    }

    #[test]
    fn score_is_antisymmetric() {
        for (board, _) in random_positions(3, 200) {
            assert_eq!(board.score(Side::Black), -board.score(Side::White));
        }
        let board = Board::from_bitboards(u64::MAX ^ 0xFF, 0xFF);
        assert_eq!(board.score(Side::Black), 48);
        assert_eq!(board.score(Side::White), -48);
    }

    #[test]
    fn text_form_round_trips() {
        let board = Board::new();
        let text = board.to_string();

        assert_eq!(
            text,
            "........\n........\n........\n...WB...\n...BW...\n........\n........\n........"
        );
        assert_eq!(text.parse::<Board>().unwrap(), board);

        for (board, _) in random_positions(5, 50) {
            assert_eq!(board.to_string().parse::<Board>().unwrap(), board);
        }
    }

    #[test]
    fn parse_rejects_malformed_text() {
        let good = Board::new().to_string();

        let short_line = good.replacen("........", ".......", 1);
        let extra_line = format!("{good}\n........");
        let trailing_newline = format!("{good}\n");
        let bad_char = good.replacen('.', "x", 1);

        for text in [short_line, extra_line, trailing_newline, bad_char, String::new()] {
            let err = text.parse::<Board>().unwrap_err();
            assert!(matches!(err, PuzzleError::InvalidBoard { .. }), "{text:?}");
        }
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn cell_out_of_range_panics() {
        let _ = Board::new().cell(8, 0);
    }
}
