use xiangqi_wasm::board::Side;
use xiangqi_wasm::game::GameState;
use xiangqi_wasm::moves::{generate_moves, MoveList};

/// Deterministic pseudo-random stream for the walk; no RNG dependency needed.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn snapshot(game: &GameState) -> (String, u64, Option<u8>, Option<u8>, Side) {
    (
        game.to_fen(),
        game.hash,
        game.red_king,
        game.black_king,
        game.turn,
    )
}

/// Walk a random legal game from the opening; at every position check that
/// each legal move's make/undo pair restores the board, both king squares,
/// the side to move and the hash bit-exactly.
#[test]
fn make_undo_round_trip_over_random_walk() {
    let mut game = GameState::new();
    game.setup_opening_position();
    let mut rng = Lcg(0xC0FFEE);

    for _ply in 0..120 {
        let before = snapshot(&game);

        let legal = game.get_legal_moves();
        if legal.is_empty() {
            break;
        }

        for &m in &legal {
            let undo = game.make_move(m);
            game.undo_move(m, undo);
            assert_eq!(snapshot(&game), before, "make/undo failed to restore after {m}");
        }

        let m = legal[(rng.next() as usize) % legal.len()];
        game.make_move(m);
    }
}

/// The incremental hash equals the full recompute after every played move,
/// and the side-to-move key is always folded in consistently.
#[test]
fn incremental_hash_stays_consistent() {
    let mut game = GameState::new();
    game.setup_opening_position();
    let mut rng = Lcg(0xDECAF);

    for _ply in 0..120 {
        assert_eq!(game.hash, game.recompute_hash());

        let legal = game.get_legal_moves();
        if legal.is_empty() {
            break;
        }
        let m = legal[(rng.next() as usize) % legal.len()];
        game.make_move(m);
    }
    assert_eq!(game.hash, game.recompute_hash());
}

/// Null move is its own inverse and flips exactly the side key.
#[test]
fn null_move_round_trip_mid_game() {
    let mut game = GameState::new();
    game.setup_opening_position();
    let mut rng = Lcg(7);

    for _ply in 0..40 {
        let before = snapshot(&game);
        game.make_null_move();
        assert_eq!(game.hash, game.recompute_hash());
        game.unmake_null_move();
        assert_eq!(snapshot(&game), before);

        let legal = game.get_legal_moves();
        if legal.is_empty() {
            break;
        }
        let m = legal[(rng.next() as usize) % legal.len()];
        game.make_move(m);
    }
}

/// Captures-only generation is exactly the capture subset of full generation.
#[test]
fn capture_generation_is_exact_subset() {
    let mut game = GameState::new();
    game.setup_opening_position();
    let mut rng = Lcg(0xBEEF);

    for _ply in 0..80 {
        let mut all = MoveList::new();
        let mut captures = MoveList::new();
        generate_moves(&game.board, game.turn, false, &mut all);
        generate_moves(&game.board, game.turn, true, &mut captures);

        for m in &captures {
            assert!(all.contains(m), "capture {m} missing from full generation");
            assert!(
                game.board.get(m.to_sq()).is_enemy_of(game.turn),
                "captures-only emitted non-capture {m}"
            );
        }
        let expected = all
            .iter()
            .filter(|m| !game.board.get(m.to_sq()).is_empty())
            .count();
        assert_eq!(captures.len(), expected);

        let legal = game.get_legal_moves();
        if legal.is_empty() {
            break;
        }
        let m = legal[(rng.next() as usize) % legal.len()];
        game.make_move(m);
    }
}
