//! Othello endgame puzzle generator.
//!
//! Random play from the opening reaches a position with few empty squares,
//! an exhaustive alpha-beta search solves every legal move to the end of the
//! game, and the position is kept only when exactly one move is best.
//!
//! ```
//! use reversi_puzzles::{GeneratorConfig, PuzzleGenerator};
//!
//! let config = GeneratorConfig { min_empty: 4, max_empty: 6, ..GeneratorConfig::default() };
//! let mut generator = PuzzleGenerator::from_seed(config, 42).unwrap();
//! for puzzle in generator.generate_batch(1) {
//!     println!("{puzzle}");
//! }
//! ```

use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod error;
pub mod generator;
pub mod puzzle;
pub mod record;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use ai::{Searcher, evaluate_moves};
pub use board::Board;
pub use error::PuzzleError;
pub use generator::{GeneratorConfig, PuzzleGenerator, determine_side_to_move, has_unique_best_move};
pub use puzzle::Puzzle;
pub use record::{PuzzleRecord, puzzles_from_json, puzzles_to_json};
pub use types::{Cell, Move, Side};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Generates up to `count` puzzles and returns them as an array of puzzle
/// records. `config` is a partial `GeneratorConfig` object; missing fields,
/// or a `null`/`undefined` config, take the defaults.
#[wasm_bindgen(js_name = generatePuzzles)]
pub fn generate_puzzles(count: u32, config: JsValue, seed: u64) -> Result<JsValue, JsValue> {
    if count == 0 {
        return Err(to_js_error(PuzzleError::InvalidConfig {
            reason: "count must be at least 1".to_string(),
        }));
    }
    let config: GeneratorConfig = if config.is_null() || config.is_undefined() {
        GeneratorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    let mut generator = PuzzleGenerator::from_seed(config, seed).map_err(to_js_error)?;
    let records: Vec<PuzzleRecord> = generator
        .generate_batch(count as usize)
        .iter()
        .map(PuzzleRecord::from)
        .collect();

    serde_wasm_bindgen::to_value(&records).map_err(JsValue::from)
}

/// Validates a JSON array of puzzle records and returns it as JS objects.
#[wasm_bindgen(js_name = loadPuzzles)]
pub fn load_puzzles(json: &str) -> Result<JsValue, JsValue> {
    let records: Vec<PuzzleRecord> = puzzles_from_json(json)
        .map_err(to_js_error)?
        .iter()
        .map(PuzzleRecord::from)
        .collect();

    serde_wasm_bindgen::to_value(&records).map_err(JsValue::from)
}

fn to_js_error(err: PuzzleError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
