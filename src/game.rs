use crate::board::{
    make_square, square_valid, Board, Piece, PieceType, Side, Square, FILE_COUNT, RANK_COUNT,
};
use crate::moves::{generate_moves, is_king_attacked, Move, MoveList};
use crate::search::zobrist::ZobristTable;

/// Everything `undo_move` needs beyond the move itself.
pub struct UndoMove {
    pub captured: Piece,
}

/// The engine-internal position: mailbox board, side to move, incrementally
/// maintained Zobrist hash and cached king squares. Make/undo must leave all
/// four bit-identical, across millions of search nodes.
pub struct GameState {
    pub board: Board,
    pub turn: Side,
    pub hash: u64,
    pub red_king: Option<Square>,
    pub black_king: Option<Square>,
    zobrist: Box<ZobristTable>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            turn: Side::Red,
            hash: 0,
            red_king: None,
            black_king: None,
            zobrist: Box::new(ZobristTable::new()),
        }
    }

    /// Replace the position from an external snapshot: `(rank, file, type,
    /// side)` tuples in external coordinates (rank 0 = Black's back rank).
    pub fn load_board(&mut self, pieces: &[(u8, u8, PieceType, Side)], turn: Side) {
        self.board.clear();
        for &(rank, file, piece_type, side) in pieces {
            if rank < RANK_COUNT && file < FILE_COUNT {
                self.board
                    .set_piece(make_square(rank, file), Piece::new(piece_type, side));
            }
        }
        self.turn = turn;
        self.recompute_caches();
    }

    /// The standard opening setup, Red to move.
    pub fn setup_opening_position(&mut self) {
        use PieceType::*;
        self.board.clear();
        let back_rank = [Rook, Horse, Elephant, Advisor, King, Advisor, Elephant, Horse, Rook];
        for (file, &pt) in back_rank.iter().enumerate() {
            let file = file as u8;
            self.board
                .set_piece(make_square(0, file), Piece::new(pt, Side::Black));
            self.board
                .set_piece(make_square(9, file), Piece::new(pt, Side::Red));
        }
        for file in [1u8, 7] {
            self.board
                .set_piece(make_square(2, file), Piece::new(Cannon, Side::Black));
            self.board
                .set_piece(make_square(7, file), Piece::new(Cannon, Side::Red));
        }
        for file in [0u8, 2, 4, 6, 8] {
            self.board
                .set_piece(make_square(3, file), Piece::new(Pawn, Side::Black));
            self.board
                .set_piece(make_square(6, file), Piece::new(Pawn, Side::Red));
        }
        self.turn = Side::Red;
        self.recompute_caches();
    }

    /// Rebuild the king squares and the hash from the board. Call after any
    /// direct board surgery (snapshot load, test setup).
    pub fn recompute_caches(&mut self) {
        self.red_king = self.board.find_king(Side::Red);
        self.black_king = self.board.find_king(Side::Black);
        self.hash = self.recompute_hash();
    }

    /// Full-scan hash, used on load and by the consistency tests. The
    /// incremental hash must always equal this.
    pub fn recompute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for index in 0..256u16 {
            let sq = index as Square;
            if !square_valid(sq) {
                continue;
            }
            let piece = self.board.get(sq);
            if !piece.is_empty() {
                hash ^= self.zobrist.piece_key(sq, piece);
            }
        }
        if self.turn == Side::Black {
            hash ^= self.zobrist.side_key();
        }
        hash
    }

    /// Refill the Zobrist table from `seed` and rebase the current hash onto
    /// it. Changes the engine's preference between evaluation-equal moves.
    pub fn reseed_zobrist(&mut self, seed: u64) {
        self.zobrist.reseed(seed);
        self.hash = self.recompute_hash();
    }

    #[inline]
    pub fn king_square(&self, side: Side) -> Option<Square> {
        match side {
            Side::Red => self.red_king,
            Side::Black => self.black_king,
        }
    }

    pub fn make_move(&mut self, m: Move) -> UndoMove {
        let from = m.from_sq();
        let to = m.to_sq();

        let piece = self.board.remove_piece(from);
        self.hash ^= self.zobrist.piece_key(from, piece);

        let captured = self.board.remove_piece(to);
        if !captured.is_empty() {
            self.hash ^= self.zobrist.piece_key(to, captured);
        }

        self.board.set_piece(to, piece);
        self.hash ^= self.zobrist.piece_key(to, piece);

        if piece.piece_type() == PieceType::King {
            match piece.side() {
                Side::Red => self.red_king = Some(to),
                Side::Black => self.black_king = Some(to),
            }
        }

        self.turn = self.turn.opponent();
        self.hash ^= self.zobrist.side_key();

        UndoMove { captured }
    }

    pub fn undo_move(&mut self, m: Move, undo: UndoMove) {
        let from = m.from_sq();
        let to = m.to_sq();

        self.turn = self.turn.opponent();
        self.hash ^= self.zobrist.side_key();

        let piece = self.board.remove_piece(to);
        self.hash ^= self.zobrist.piece_key(to, piece);

        self.board.set_piece(from, piece);
        self.hash ^= self.zobrist.piece_key(from, piece);

        if !undo.captured.is_empty() {
            self.board.set_piece(to, undo.captured);
            self.hash ^= self.zobrist.piece_key(to, undo.captured);
        }

        if piece.piece_type() == PieceType::King {
            match piece.side() {
                Side::Red => self.red_king = Some(from),
                Side::Black => self.black_king = Some(from),
            }
        }
    }

    /// Pass the turn without moving (null-move pruning).
    pub fn make_null_move(&mut self) {
        self.turn = self.turn.opponent();
        self.hash ^= self.zobrist.side_key();
    }

    pub fn unmake_null_move(&mut self) {
        self.turn = self.turn.opponent();
        self.hash ^= self.zobrist.side_key();
    }

    /// Is `side`'s king attacked right now?
    #[inline]
    pub fn in_check(&self, side: Side) -> bool {
        match self.king_square(side) {
            Some(king_sq) => is_king_attacked(&self.board, king_sq, side),
            None => false,
        }
    }

    /// Is the side to move in check?
    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.in_check(self.turn)
    }

    /// Did the side that just moved leave its own king attacked? Call AFTER
    /// `make_move`; the mover is the opponent of the current turn.
    #[inline]
    pub fn is_move_illegal(&self) -> bool {
        self.in_check(self.turn.opponent())
    }

    /// Fully legal moves for the side to move: pseudo-legal generation
    /// filtered by king safety. This is also what the UI move hints consume,
    /// so hint legality agrees with search legality by construction.
    pub fn get_legal_moves(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        generate_moves(&self.board, self.turn, false, &mut pseudo);

        let mut legal = MoveList::new();
        for &m in &pseudo {
            let undo = self.make_move(m);
            if !self.is_move_illegal() {
                legal.push(m);
            }
            self.undo_move(m, undo);
        }
        legal
    }

    /// Count leaf nodes of the legal move tree to `depth`. Test scaffolding
    /// for the move generator.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut moves = MoveList::new();
        generate_moves(&self.board, self.turn, false, &mut moves);
        let mut nodes = 0u64;
        for &m in &moves {
            let undo = self.make_move(m);
            if !self.is_move_illegal() {
                nodes += if depth == 1 { 1 } else { self.perft(depth - 1) };
            }
            self.undo_move(m, undo);
        }
        nodes
    }

    /// FEN-style display string ("w" = Red to move). Display only.
    pub fn to_fen(&self) -> String {
        let side = match self.turn {
            Side::Red => "w",
            Side::Black => "b",
        };
        format!("{} {}", self.board.fen_placement(), side)
    }
}
