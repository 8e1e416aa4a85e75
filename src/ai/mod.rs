pub mod evaluate;
pub mod search;

pub use evaluate::{evaluate_moves, evaluate_moves_with};
pub use search::{MAX_SEARCH_DEPTH, SEARCH_DEPTH_BUFFER, SearchStats, Searcher};
