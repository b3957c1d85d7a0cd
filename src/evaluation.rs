use crate::board::{file_of, make_square, rank_of, PieceType, Side, Square, FILE_COUNT, RANK_COUNT};
use crate::game::GameState;

/// Material values. The king's value only matters for MVV-LVA ordering - the
/// search never actually trades kings.
#[inline]
pub fn get_piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::King => 10000,
        PieceType::Rook => 950,
        PieceType::Cannon => 450,
        PieceType::Horse => 420,
        PieceType::Advisor => 220,
        PieceType::Elephant => 220,
        PieceType::Pawn => 100,
    }
}

#[inline]
fn central_file(file: u8) -> bool {
    (3..=5).contains(&file)
}

/// Positional adjustment for one piece, from its own side's point of view.
fn positional(piece_type: PieceType, side: Side, sq: Square) -> i32 {
    let rank = rank_of(sq);
    let file = file_of(sq);
    let crossed = crate::board::crossed_river(sq, side);

    match piece_type {
        PieceType::Pawn => {
            // Ranks advanced beyond the starting pawn rank.
            let advanced = match side {
                Side::Red => 6 - rank as i32,
                Side::Black => rank as i32 - 3,
            }
            .max(0);
            let mut bonus = advanced * 2;
            if crossed {
                bonus += 30;
                if central_file(file) {
                    bonus += 20;
                }
            }
            bonus
        }
        PieceType::Horse => {
            let mut bonus = 0;
            if file == 4 {
                bonus += 15;
            }
            if crossed {
                bonus += 30;
            }
            bonus
        }
        PieceType::Cannon => {
            let mut bonus = 0;
            if file == 4 {
                bonus += 25;
            }
            if crossed {
                bonus += 15;
            }
            bonus
        }
        PieceType::Rook => {
            let mut bonus = 0;
            if crossed {
                bonus += 20;
            }
            if central_file(file) {
                bonus += 10;
            }
            bonus
        }
        PieceType::King => {
            // Keep the general at home; wandering forward in the palace is
            // usually a liability.
            let home = match side {
                Side::Red => rank >= 8,
                Side::Black => rank <= 1,
            };
            if home {
                10
            } else {
                -20
            }
        }
        PieceType::Advisor | PieceType::Elephant => 0,
    }
}

/// Static evaluation from the side to move's perspective (positive = good
/// for the mover). Material plus the positional terms above, plus a tiny
/// hash-derived jitter that breaks symmetric ties without disturbing the
/// search.
pub fn evaluate(game: &GameState) -> i32 {
    let mut score = 0i32; // Red-positive until the final flip

    for rank in 0..RANK_COUNT {
        for file in 0..FILE_COUNT {
            let sq = make_square(rank, file);
            let piece = game.board.get(sq);
            if piece.is_empty() {
                continue;
            }
            let value =
                get_piece_value(piece.piece_type()) + positional(piece.piece_type(), piece.side(), sq);
            match piece.side() {
                Side::Red => score += value,
                Side::Black => score -= value,
            }
        }
    }

    score += ((game.hash & 0x1F) as i32) - 16;

    match game.turn {
        Side::Red => score,
        Side::Black => -score,
    }
}
