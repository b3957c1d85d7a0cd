use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub mod board;
pub mod evaluation;
pub mod game;
pub mod moves;
pub mod search;
mod utils;

use board::{file_of, rank_of, PieceType, Side};
use game::GameState;
use moves::Move;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    utils::set_panic_hook();
}

// ============================================================================
// Playing strength & output language
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    Master,
    Grandmaster,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "expert" => Some(Difficulty::Expert),
            "master" => Some(Difficulty::Master),
            "grandmaster" => Some(Difficulty::Grandmaster),
            _ => None,
        }
    }

    /// `(max_depth, time_limit_ms)`: the search stops at whichever fires
    /// first.
    pub fn params(&self) -> (usize, u128) {
        match self {
            Difficulty::Beginner => (3, 800),
            Difficulty::Intermediate => (5, 1500),
            Difficulty::Expert => (7, 2500),
            Difficulty::Master => (10, 4000),
            Difficulty::Grandmaster => (24, 6000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "zh" | "zh-cn" | "chinese" => Language::Chinese,
            _ => Language::English,
        }
    }
}

fn reasoning_string(language: Language, depth: usize, nodes: u64, score: i32) -> String {
    match language {
        Language::English => format!(
            "Searched to depth {} ({}k nodes), evaluation {:+}.",
            depth,
            nodes / 1000,
            score
        ),
        Language::Chinese => {
            format!("搜索深度{}层（{}k节点），局面评估{:+}。", depth, nodes / 1000, score)
        }
    }
}

// ============================================================================
// JS boundary types
// ============================================================================

/// One cell of the 10x9 board snapshot sent by the client.
#[derive(Deserialize)]
struct JsPiece {
    #[serde(rename = "type")]
    piece_type: String,
    side: String,
}

#[derive(Serialize)]
pub struct JsCoord {
    pub r: u8,
    pub c: u8,
}

#[derive(Serialize)]
pub struct JsMove {
    pub from: JsCoord,
    pub to: JsCoord,
}

#[derive(Serialize)]
struct JsBestMove {
    #[serde(rename = "move")]
    mv: JsMove,
    reasoning: String,
    score: i32,
}

fn js_move(m: Move) -> JsMove {
    JsMove {
        from: JsCoord {
            r: rank_of(m.from_sq()),
            c: file_of(m.from_sq()),
        },
        to: JsCoord {
            r: rank_of(m.to_sq()),
            c: file_of(m.to_sq()),
        },
    }
}

/// Flatten a `10x9` snapshot (rows of optional `{type, side}` cells, row 0 =
/// Black's back rank) into piece tuples.
fn parse_snapshot(board: JsValue) -> Result<Vec<(u8, u8, PieceType, Side)>, JsValue> {
    let rows: Vec<Vec<Option<JsPiece>>> = serde_wasm_bindgen::from_value(board)?;
    let mut pieces = Vec::with_capacity(32);
    for (rank, row) in rows.iter().enumerate() {
        for (file, cell) in row.iter().enumerate() {
            if let Some(p) = cell {
                let piece_type = PieceType::from_str(&p.piece_type)
                    .ok_or_else(|| JsValue::from_str(&format!("unknown piece type: {}", p.piece_type)))?;
                let side = Side::from_str(&p.side)
                    .ok_or_else(|| JsValue::from_str(&format!("unknown side: {}", p.side)))?;
                pieces.push((rank as u8, file as u8, piece_type, side));
            }
        }
    }
    Ok(pieces)
}

// ============================================================================
// Engine
// ============================================================================

#[wasm_bindgen]
pub struct Engine {
    game: GameState,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        utils::set_panic_hook();
        Engine {
            game: GameState::new(),
        }
    }

    /// Replace the internal position from a snapshot.
    pub fn load_board(&mut self, board: JsValue, side: &str) -> Result<(), JsValue> {
        let pieces = parse_snapshot(board)?;
        let turn =
            Side::from_str(side).ok_or_else(|| JsValue::from_str(&format!("unknown side: {side}")))?;
        self.game.load_board(&pieces, turn);
        Ok(())
    }

    /// Search the given position and return `{move, reasoning, score}`, or
    /// `null` when the side to move has no legal move (the caller separates
    /// mate from stalemate with `in_check`).
    pub fn get_best_move(
        &mut self,
        board: JsValue,
        side: &str,
        difficulty: &str,
        language: &str,
    ) -> Result<JsValue, JsValue> {
        self.load_board(board, side)?;
        let difficulty = Difficulty::from_str(difficulty)
            .ok_or_else(|| JsValue::from_str(&format!("unknown difficulty: {difficulty}")))?;
        let language = Language::from_str(language);
        let (max_depth, time_limit_ms) = difficulty.params();

        match search::get_best_move(&mut self.game, max_depth, time_limit_ms, false) {
            Some((m, score, stats)) => {
                let result = JsBestMove {
                    mv: js_move(m),
                    reasoning: reasoning_string(language, stats.depth, stats.nodes, score),
                    score,
                };
                serde_wasm_bindgen::to_value(&result).map_err(Into::into)
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Fully legal moves of the current position, for UI move hints. Shares
    /// the engine's generator and legality filter, so hints and search can
    /// never disagree.
    pub fn get_legal_moves(&mut self) -> Result<JsValue, JsValue> {
        let moves: Vec<JsMove> = self
            .game
            .get_legal_moves()
            .iter()
            .map(|&m| js_move(m))
            .collect();
        serde_wasm_bindgen::to_value(&moves).map_err(Into::into)
    }

    /// Is the side to move currently in check?
    pub fn in_check(&self) -> bool {
        self.game.is_in_check()
    }

    /// Clear the transposition table and heuristics and reseed the Zobrist
    /// table, so a new game starts cold and with fresh tie-breaking.
    pub fn reset(&mut self) {
        search::reset_search_state();
        self.game.reseed_zobrist(search::random_seed());
    }

    /// FEN-style display string of the current position. Not parsed back.
    pub fn get_fen(&self) -> String {
        self.game.to_fen()
    }

    /// Legal-tree leaf count; move generator diagnostics.
    pub fn perft(&mut self, depth: usize) -> u64 {
        self.game.perft(depth)
    }
}
