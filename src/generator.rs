use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::ai::{Searcher, evaluate_moves_with};
use crate::board::Board;
use crate::error::PuzzleError;
use crate::puzzle::Puzzle;
use crate::types::{Move, Side};

/// A batch may fail this many times per requested puzzle before giving up.
pub const FAILURE_BUDGET_FACTOR: usize = 10;
const MAX_EMPTY_SQUARES: u8 = 60;

/// Parameters of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub min_empty: u8,
    pub max_empty: u8,
    /// Preferred side to move; falls back to the other side when it must pass.
    pub side_to_move: Option<Side>,
    /// Attempts from the opening before one puzzle is given up on.
    pub max_attempts: u32,
    pub min_moves_per_side: u32,
    /// Safety cap on random-walk steps.
    pub max_walk_iterations: u32,
    /// Upper bound of the extra random plies played after the walk.
    pub max_extra_plies: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_empty: 4,
            max_empty: 10,
            side_to_move: None,
            max_attempts: 50,
            min_moves_per_side: 3,
            max_walk_iterations: 1000,
            max_extra_plies: 3,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.min_empty > self.max_empty {
            return Err(PuzzleError::InvalidConfig {
                reason: format!(
                    "min_empty ({}) must not exceed max_empty ({})",
                    self.min_empty, self.max_empty
                ),
            });
        }
        if self.max_empty > MAX_EMPTY_SQUARES {
            return Err(PuzzleError::InvalidConfig {
                reason: format!(
                    "max_empty ({}) cannot exceed {MAX_EMPTY_SQUARES}",
                    self.max_empty
                ),
            });
        }
        if self.max_attempts == 0 {
            return Err(PuzzleError::InvalidConfig {
                reason: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn in_window(&self, board: &Board) -> bool {
        (self.min_empty..=self.max_empty).contains(&board.empty_count())
    }
}

/// Why a single attempt produced no puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The walk jumped below `min_empty` before its constraints were met.
    Overshot,
    /// Both sides ran out of moves during the walk.
    GameEnded,
    /// The walk hit its iteration cap.
    WalkExhausted,
    /// Neither side can move in the candidate position.
    Terminal,
    /// Extra plies left the empty-square window.
    OutsideWindow,
    /// The best evaluation is shared by two or more moves.
    TiedBest,
    /// The solved move list failed puzzle validation.
    Invalid,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Overshot => "overshot the empty-square window",
            Self::GameEnded => "game ended during random play",
            Self::WalkExhausted => "random walk hit its iteration cap",
            Self::Terminal => "no side has a legal move",
            Self::OutsideWindow => "extra plies left the empty-square window",
            Self::TiedBest => "best move is not unique",
            Self::Invalid => "solved moves failed puzzle validation",
        };
        f.write_str(reason)
    }
}

/// Plays uniformly random legal moves from `board` until the position lies in
/// the configured window and both sides have moved `min_moves_per_side` times.
///
/// Black moves first. A side without moves passes.
pub fn random_walk<R: Rng + ?Sized>(
    board: &Board,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Board, Rejection> {
    let mut board = *board;
    let mut side = Side::Black;
    let mut black_moves = 0u32;
    let mut white_moves = 0u32;

    for _ in 0..config.max_walk_iterations {
        let empties = board.empty_count();
        if empties < config.min_empty {
            return Err(Rejection::Overshot);
        }
        if empties <= config.max_empty
            && black_moves >= config.min_moves_per_side
            && white_moves >= config.min_moves_per_side
        {
            return Ok(board);
        }

        let moves = board.legal_moves(side);
        match moves.choose(rng) {
            Some(mv) => {
                board = board.apply(mv, side);
                match side {
                    Side::Black => black_moves += 1,
                    Side::White => white_moves += 1,
                }
            }
            None if !board.has_legal_move(side.opponent()) => return Err(Rejection::GameEnded),
            None => {}
        }
        side = side.opponent();
    }

    Err(Rejection::WalkExhausted)
}

/// Plays between zero and `max_extra_plies` random moves for `side` and its
/// successors, stopping early when the side to play has no move.
///
/// The side to move is then re-derived from the result, and the board must
/// still lie in the empty-square window.
pub fn vary_position<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(Board, Side), Rejection> {
    let mut board = *board;
    let mut side = side;

    let extra = rng.gen_range(0..=config.max_extra_plies);
    for _ in 0..extra {
        let moves = board.legal_moves(side);
        let Some(mv) = moves.choose(rng) else {
            break;
        };
        board = board.apply(mv, side);
        side = side.opponent();
    }

    let side = determine_side_to_move(&board, config.side_to_move).ok_or(Rejection::Terminal)?;
    if !config.in_window(&board) {
        return Err(Rejection::OutsideWindow);
    }
    Ok((board, side))
}

/// Picks the side to move: the preferred side if it can move, else its
/// opponent. Without a preference Black is tried first. `None` when neither
/// side has a legal move.
pub fn determine_side_to_move(board: &Board, preferred: Option<Side>) -> Option<Side> {
    let first = preferred.unwrap_or(Side::Black);
    [first, first.opponent()]
        .into_iter()
        .find(|&side| board.has_legal_move(side))
}

/// True when a best-first list has exactly one top evaluation.
pub fn has_unique_best_move(evaluated: &[Move]) -> bool {
    match evaluated {
        [] => false,
        [_] => true,
        [best, second, ..] => best.evaluation.is_some() && best.evaluation != second.evaluation,
    }
}

/// Builds puzzles from random play.
///
/// The random source is injected so that a seeded generator replays the same
/// sequence of puzzles.
pub struct PuzzleGenerator<R: Rng> {
    config: GeneratorConfig,
    rng: R,
    searcher: Searcher,
}

impl PuzzleGenerator<StdRng> {
    pub fn from_seed(config: GeneratorConfig, seed: u64) -> Result<Self, PuzzleError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: GeneratorConfig) -> Result<Self, PuzzleError> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> PuzzleGenerator<R> {
    pub fn new(config: GeneratorConfig, rng: R) -> Result<Self, PuzzleError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            searcher: Searcher::new(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Work counters accumulated since the start of the current batch.
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Tries up to `max_attempts` fresh games. `None` when every attempt was
    /// rejected.
    pub fn generate_puzzle(&mut self) -> Option<Puzzle> {
        for attempt in 1..=self.config.max_attempts {
            match self.attempt() {
                Ok(puzzle) => {
                    info!(
                        attempt,
                        empties = puzzle.board().empty_count(),
                        side = %puzzle.side_to_move(),
                        best = %puzzle.best_move(),
                        evaluation = puzzle.best_evaluation(),
                        "puzzle accepted"
                    );
                    return Some(puzzle);
                }
                Err(reason) => debug!(attempt, %reason, "attempt rejected"),
            }
        }

        debug!(attempts = self.config.max_attempts, "attempt budget exhausted");
        None
    }

    /// Generates up to `count` puzzles, stopping after
    /// `FAILURE_BUDGET_FACTOR * count` failed puzzles. The result may be
    /// shorter than `count`.
    pub fn generate_batch(&mut self, count: usize) -> Vec<Puzzle> {
        let started = Instant::now();
        self.searcher.reset_stats();
        let max_failures = count.saturating_mul(FAILURE_BUDGET_FACTOR);
        let mut puzzles = Vec::with_capacity(count);
        let mut failures = 0usize;

        while puzzles.len() < count && failures < max_failures {
            match self.generate_puzzle() {
                Some(puzzle) => puzzles.push(puzzle),
                None => failures += 1,
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let stats = self.searcher.stats();
        if puzzles.len() < count {
            warn!(
                produced = puzzles.len(),
                requested = count,
                failures,
                elapsed_ms,
                "failure budget exhausted"
            );
        } else {
            info!(
                produced = puzzles.len(),
                failures,
                elapsed_ms,
                nodes = stats.nodes,
                "batch complete"
            );
        }

        puzzles
    }

    fn attempt(&mut self) -> Result<Puzzle, Rejection> {
        let walked = random_walk(&Board::new(), &self.config, &mut self.rng)?;
        let side = determine_side_to_move(&walked, self.config.side_to_move)
            .ok_or(Rejection::Terminal)?;
        let (board, side) = vary_position(&walked, side, &self.config, &mut self.rng)?;

        let evaluated = evaluate_moves_with(&mut self.searcher, &board, side);
        if evaluated.is_empty() {
            return Err(Rejection::Terminal);
        }
        if !has_unique_best_move(&evaluated) {
            return Err(Rejection::TiedBest);
        }

        let best = evaluated[0];
        Puzzle::new(board, side, evaluated, best).map_err(|err| {
            warn!(%err, "solved position failed puzzle validation");
            Rejection::Invalid
        })
    }
}
