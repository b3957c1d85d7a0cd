use smallvec::SmallVec;
use std::fmt;

use crate::board::{
    crossed_river, file_of, home_half, in_palace, rank_of, Board, Piece, PieceType, Side, Square,
};

// ============================================================================
// Move
// ============================================================================

/// Packed move: `(from << 8) | to`. Zero is reserved as "no move" - square 0
/// to square 0 is never a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    pub const NONE: Move = Move(0);

    #[inline]
    pub fn new(from: Square, to: Square) -> Self {
        Move(((from as u16) << 8) | to as u16)
    }

    #[inline]
    pub fn from_sq(&self) -> Square {
        (self.0 >> 8) as Square
    }

    #[inline]
    pub fn to_sq(&self) -> Square {
        (self.0 & 0xFF) as Square
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Raw packed value; indexes the 65536-entry history table directly.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}->{},{}",
            rank_of(self.from_sq()),
            file_of(self.from_sq()),
            rank_of(self.to_sq()),
            file_of(self.to_sq())
        )
    }
}

/// Per-node move buffer. Most positions generate 30-40 pseudo-legal moves and
/// the theoretical ceiling sits near 90, so the inline capacity keeps the
/// search allocation-free.
pub type MoveList = SmallVec<[Move; 128]>;

// ============================================================================
// Direction tables
// ============================================================================

/// Orthogonal steps on the 16-wide mailbox.
pub const ORTHO_DELTA: [i16; 4] = [-16, -1, 1, 16];

/// Diagonal steps; also the horse legs used by the reverse attack probe.
pub const DIAG_DELTA: [i16; 4] = [-17, -15, 15, 17];

/// Horse destinations grouped so `HORSE_DELTA[i]` shares the orthogonal leg
/// `ORTHO_DELTA[i]`.
pub const HORSE_DELTA: [[i16; 2]; 4] = [[-33, -31], [-18, 14], [-14, 18], [31, 33]];

/// Horse destinations grouped so `HORSE_ATTACK_DELTA[i]` (squares an enemy
/// horse could attack *from*) shares the diagonal leg `DIAG_DELTA[i]`.
pub const HORSE_ATTACK_DELTA: [[i16; 2]; 4] = [[-33, -18], [-31, -14], [14, 31], [18, 33]];

/// One step toward the enemy back rank.
#[inline]
pub const fn forward_delta(side: Side) -> i16 {
    match side {
        Side::Red => -16,
        Side::Black => 16,
    }
}

/// Apply a step, returning `None` when it leaves the 9x10 board.
#[inline]
fn offset(sq: Square, delta: i16) -> Option<Square> {
    let dst = sq as i16 + delta;
    if (0..256).contains(&dst) {
        let dst = dst as Square;
        if crate::board::square_valid(dst) {
            return Some(dst);
        }
    }
    None
}

// ============================================================================
// Pseudo-legal move generation
// ============================================================================

/// Push `from -> to` if the destination is compatible with the filter:
/// any non-friendly square normally, enemy-occupied squares only in
/// captures-only mode. Quiescence relies on that filter being exact.
#[inline]
fn emit(board: &Board, turn: Side, captures_only: bool, from: Square, to: Square, out: &mut MoveList) {
    let target = board.get(to);
    if captures_only {
        if target.is_enemy_of(turn) {
            out.push(Move::new(from, to));
        }
    } else if !target.is_side(turn) {
        out.push(Move::new(from, to));
    }
}

/// Generate pseudo-legal moves for `turn` into `out`. Piece-movement rules
/// (palace, river, elephant eye, horse leg, cannon screen) are enforced here;
/// king safety is the search's job via `GameState::is_move_illegal`.
pub fn generate_moves(board: &Board, turn: Side, captures_only: bool, out: &mut MoveList) {
    out.clear();

    for index in 0..256u16 {
        let from = index as Square;
        let piece = board.get(from);
        if !piece.is_side(turn) {
            continue;
        }

        match piece.piece_type() {
            PieceType::King => {
                for &delta in &ORTHO_DELTA {
                    if let Some(to) = offset(from, delta) {
                        if in_palace(to, turn) {
                            emit(board, turn, captures_only, from, to, out);
                        }
                    }
                }
            }
            PieceType::Advisor => {
                for &delta in &DIAG_DELTA {
                    if let Some(to) = offset(from, delta) {
                        if in_palace(to, turn) {
                            emit(board, turn, captures_only, from, to, out);
                        }
                    }
                }
            }
            PieceType::Elephant => {
                for &delta in &DIAG_DELTA {
                    let eye = match offset(from, delta) {
                        Some(sq) if board.get(sq).is_empty() => sq,
                        _ => continue,
                    };
                    if let Some(to) = offset(eye, delta) {
                        if home_half(to, turn) {
                            emit(board, turn, captures_only, from, to, out);
                        }
                    }
                }
            }
            PieceType::Horse => {
                for i in 0..4 {
                    match offset(from, ORTHO_DELTA[i]) {
                        Some(leg) if board.get(leg).is_empty() => {}
                        _ => continue,
                    }
                    for &delta in &HORSE_DELTA[i] {
                        if let Some(to) = offset(from, delta) {
                            emit(board, turn, captures_only, from, to, out);
                        }
                    }
                }
            }
            PieceType::Rook => {
                for &delta in &ORTHO_DELTA {
                    let mut cur = from;
                    while let Some(to) = offset(cur, delta) {
                        cur = to;
                        let target = board.get(to);
                        if target.is_empty() {
                            if !captures_only {
                                out.push(Move::new(from, to));
                            }
                        } else {
                            if target.is_enemy_of(turn) {
                                out.push(Move::new(from, to));
                            }
                            break;
                        }
                    }
                }
            }
            PieceType::Cannon => {
                for &delta in &ORTHO_DELTA {
                    let mut cur = from;
                    // Quiet phase: slide until the screen.
                    while let Some(to) = offset(cur, delta) {
                        cur = to;
                        if !board.get(to).is_empty() {
                            break;
                        }
                        if !captures_only {
                            out.push(Move::new(from, to));
                        }
                    }
                    // Capture phase: the first piece past the screen.
                    while let Some(to) = offset(cur, delta) {
                        cur = to;
                        let target = board.get(to);
                        if !target.is_empty() {
                            if target.is_enemy_of(turn) {
                                out.push(Move::new(from, to));
                            }
                            break;
                        }
                    }
                }
            }
            PieceType::Pawn => {
                if let Some(to) = offset(from, forward_delta(turn)) {
                    emit(board, turn, captures_only, from, to, out);
                }
                if crossed_river(from, turn) {
                    for delta in [-1i16, 1] {
                        if let Some(to) = offset(from, delta) {
                            emit(board, turn, captures_only, from, to, out);
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Attack detection
// ============================================================================

/// Is the king of `side` standing on `king_sq` attacked? Works by casting
/// reverse rays from the king instead of enumerating enemy moves; this is the
/// hottest routine in the engine (twice per searched move).
pub fn is_king_attacked(board: &Board, king_sq: Square, side: Side) -> bool {
    let enemy = side.opponent();

    // Enemy pawn one step ahead, or beside the king. A pawn standing next to
    // either palace has necessarily crossed the river, so the sideways
    // pattern always applies; pawns never attack backwards.
    let enemy_pawn = Piece::new(PieceType::Pawn, enemy);
    if let Some(sq) = offset(king_sq, forward_delta(side)) {
        if board.get(sq) == enemy_pawn {
            return true;
        }
    }
    for delta in [-1i16, 1] {
        if let Some(sq) = offset(king_sq, delta) {
            if board.get(sq) == enemy_pawn {
                return true;
            }
        }
    }

    // Enemy horses: probe the eight knight squares; a horse only attacks when
    // its own leg toward this king (the diagonal neighbour) is empty.
    let enemy_horse = Piece::new(PieceType::Horse, enemy);
    for i in 0..4 {
        match offset(king_sq, DIAG_DELTA[i]) {
            Some(leg) if board.get(leg).is_empty() => {}
            _ => continue,
        }
        for &delta in &HORSE_ATTACK_DELTA[i] {
            if let Some(sq) = offset(king_sq, delta) {
                if board.get(sq) == enemy_horse {
                    return true;
                }
            }
        }
    }

    // Ray pieces, counting jumps outward. The first piece met attacks as a
    // rook; an enemy king met first is the flying-general rule (the kings can
    // only ever see each other along an open file). The second piece met
    // attacks as a cannon; anything beyond two pieces is screened off.
    let enemy_rook = Piece::new(PieceType::Rook, enemy);
    let enemy_king = Piece::new(PieceType::King, enemy);
    let enemy_cannon = Piece::new(PieceType::Cannon, enemy);
    for &delta in &ORTHO_DELTA {
        let mut cur = king_sq;
        let mut jumped = false;
        while let Some(next) = offset(cur, delta) {
            cur = next;
            let piece = board.get(cur);
            if piece.is_empty() {
                continue;
            }
            if !jumped {
                if piece == enemy_rook || piece == enemy_king {
                    return true;
                }
                jumped = true;
            } else {
                if piece == enemy_cannon {
                    return true;
                }
                break;
            }
        }
    }

    false
}
