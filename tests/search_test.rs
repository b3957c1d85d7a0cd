use xiangqi_wasm::board::{make_square, PieceType, Side};
use xiangqi_wasm::game::GameState;
use xiangqi_wasm::moves::Move;
use xiangqi_wasm::search::{self, MATE_SCORE};

#[test]
fn opening_position_returns_legal_move_quickly() {
    let mut game = GameState::new();
    game.setup_opening_position();

    // Beginner settings: depth 3 within 800 ms.
    let started = std::time::Instant::now();
    let (m, _score, stats) =
        search::get_best_move(&mut game, 3, 800, true).expect("opening has moves");
    assert!(started.elapsed().as_millis() < 3000);

    assert!(game.get_legal_moves().contains(&m));
    assert!(stats.depth >= 1);
    assert!(stats.nodes > 0);
}

#[test]
fn finds_mate_in_one() {
    // Lone black king on (0,3); the red rook mates from (5,3): the king file
    // is sealed by the flying-general rule and (1,3) stays covered.
    let mut game = GameState::new();
    game.load_board(
        &[
            (9, 4, PieceType::King, Side::Red),
            (0, 3, PieceType::King, Side::Black),
            (5, 0, PieceType::Rook, Side::Red),
        ],
        Side::Red,
    );

    let (m, score, _stats) =
        search::get_best_move(&mut game, 4, u128::MAX, true).expect("red has moves");
    assert_eq!(m, Move::new(make_square(5, 0), make_square(5, 3)));
    assert!(score > MATE_SCORE, "mate must be reported, got {score}");
}

#[test]
fn never_plays_into_flying_general() {
    // Black's horse is the last piece between the kings; any horse move
    // would open the file and lose to the flying general.
    let mut game = GameState::new();
    game.load_board(
        &[
            (9, 4, PieceType::King, Side::Red),
            (0, 4, PieceType::King, Side::Black),
            (5, 4, PieceType::Horse, Side::Black),
            (4, 0, PieceType::Pawn, Side::Black),
        ],
        Side::Black,
    );

    let legal = game.get_legal_moves();
    let (m, _score, _stats) =
        search::get_best_move(&mut game, 4, u128::MAX, true).expect("black has moves");
    assert!(legal.contains(&m), "engine played illegal move {m}");
}

#[test]
fn stalemate_returns_no_move() {
    // Black to move: the lone king is not attacked, but all three palace
    // squares it could step to are covered.
    let mut game = GameState::new();
    game.load_board(
        &[
            (9, 3, PieceType::King, Side::Red),
            (5, 3, PieceType::Rook, Side::Red),
            (5, 5, PieceType::Rook, Side::Red),
            (2, 2, PieceType::Horse, Side::Red),
            (0, 4, PieceType::King, Side::Black),
        ],
        Side::Black,
    );

    assert!(!game.is_in_check());
    assert!(game.get_legal_moves().is_empty());
    assert!(search::get_best_move(&mut game, 4, u128::MAX, true).is_none());
}

#[test]
fn checkmate_returns_no_move_and_check_flag() {
    // Same net but with the king actually attacked: mate, not stalemate.
    let mut game = GameState::new();
    game.load_board(
        &[
            (9, 4, PieceType::King, Side::Red),
            (5, 3, PieceType::Rook, Side::Red),
            (5, 5, PieceType::Rook, Side::Red),
            (1, 4, PieceType::Rook, Side::Red),
            (0, 4, PieceType::King, Side::Black),
        ],
        Side::Black,
    );

    assert!(game.is_in_check());
    assert!(search::get_best_move(&mut game, 4, u128::MAX, true).is_none());
}

#[test]
fn deadline_is_respected() {
    let mut game = GameState::new();
    game.setup_opening_position();

    let started = std::time::Instant::now();
    let result = search::get_best_move(&mut game, 24, 300, true);
    let elapsed = started.elapsed().as_millis();

    let (m, _score, _stats) = result.expect("opening has moves");
    assert!(game.get_legal_moves().contains(&m));
    assert!(elapsed < 3000, "search ran {elapsed} ms past a 300 ms deadline");
}

#[test]
fn deeper_search_still_finds_the_hanging_piece() {
    // Black rook is en prise to the red cannon over a screen; any reasonable
    // depth should grab it or do better.
    let mut game = GameState::new();
    game.load_board(
        &[
            (9, 4, PieceType::King, Side::Red),
            (0, 3, PieceType::King, Side::Black),
            (9, 1, PieceType::Cannon, Side::Red),
            (5, 1, PieceType::Pawn, Side::Black),
            (2, 1, PieceType::Rook, Side::Black),
            (3, 8, PieceType::Elephant, Side::Black),
        ],
        Side::Red,
    );

    let (m, score, _stats) =
        search::get_best_move(&mut game, 5, u128::MAX, true).expect("red has moves");
    assert_eq!(m, Move::new(make_square(9, 1), make_square(2, 1)));
    assert!(score > 700, "winning a rook should dominate, got {score}");
}

#[test]
fn reset_clears_persistent_state() {
    let mut game = GameState::new();
    game.setup_opening_position();
    let _ = search::get_best_move(&mut game, 3, u128::MAX, true);
    search::reset_search_state();
    // A fresh search after the reset must still work.
    let result = search::get_best_move(&mut game, 2, u128::MAX, true);
    assert!(result.is_some());
}
