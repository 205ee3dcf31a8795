//! Search
//!
//! Tests that the three tree walks agree, and that they find short forced mates.

use std::sync::mpsc;

use negachess_engine::coretypes::{Color, Color::*, Square::*};
use negachess_engine::fen::Fen;
use negachess_engine::search::{alpha_beta, minimax, negamax, search};
use negachess_engine::*;

const ALGORITHMS: [Algorithm; 3] = [Algorithm::Minimax, Algorithm::Negamax, Algorithm::AlphaBeta];

fn mate_tester(fen_str: &str, start: Square, end: Square, ply: u8, winner: Color) {
    for algorithm in ALGORITHMS {
        let mut state = BoardState::parse_fen(fen_str).unwrap();
        let result = search(&mut state, ply, algorithm);
        let best_move = result.best_move.unwrap();

        assert_eq!((best_move.start(), best_move.end()), (start, end), "{algorithm}");
        assert_eq!(result.leading(), Some(winner));
        assert!(result.score.is_mate());
    }
}

#[test]
fn mate_in_1_back_rank() {
    mate_tester("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", A1, A8, 1, White);
}

#[test]
fn mate_in_1_black_back_rank() {
    mate_tester("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1", A8, A1, 2, Black);
}

#[test]
fn mate_in_1_queen_take_pawn() {
    let fen = "r1bqk2r/2p2pp1/p1pp3p/2b5/2B1P1n1/2N2Q2/PPP2PPP/R1B1R1K1 w kq - 2 11";
    mate_tester(fen, F3, F7, 1, White);
}

#[test]
fn walks_agree_on_score_and_move() {
    let fens = [
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
    ];

    for fen in fens {
        let mut state = BoardState::parse_fen(fen).unwrap();
        let sign = state.side_to_move().sign();

        for ply in 1..=3 {
            let (nega_score, nega_move) = negamax(&mut state, ply);
            let (ab_score, ab_move) = alpha_beta(&mut state, ply);
            let (mini_score, mini_move) = minimax(&mut state, ply);

            assert_eq!(nega_score, ab_score, "{fen} {ply}");
            assert_eq!(nega_score * sign, mini_score, "{fen} {ply}");
            assert_eq!(nega_move, ab_move, "{fen} {ply}");
            assert_eq!(nega_move, mini_move, "{fen} {ply}");
        }
    }
}

#[test]
fn alpha_beta_visits_fewer_nodes() {
    let mut state = BoardState::start_position();
    let negamax_result = search(&mut state, 3, Algorithm::Negamax);
    let alpha_beta_result = search(&mut state, 3, Algorithm::AlphaBeta);

    assert_eq!(negamax_result.score, alpha_beta_result.score);
    assert!(alpha_beta_result.nodes < negamax_result.nodes);
}

#[test]
fn engine_plays_a_game_of_searches() {
    let mut engine = EngineBuilder::new()
        .depth(1)
        .algorithm(Algorithm::AlphaBeta)
        .seed(3)
        .build();

    for _ in 0..6 {
        let before = engine.legal_moves().clone();
        let move_ = engine.play_engine_move().unwrap();
        assert!(before.contains(move_.start(), move_.end()));
    }
    assert_eq!(engine.state().history().len(), 6);

    while engine.undo().is_some() {}
    assert_eq!(engine.state(), &BoardState::start_position());
}

#[test]
fn engine_background_search_then_play() {
    let state = BoardState::parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut engine = EngineBuilder::new().state(state).depth(2).build();
    let (sender, receiver) = mpsc::channel();

    engine.search(sender).unwrap();
    assert!(!engine.ready());
    let result: SearchResult = receiver.recv().unwrap();
    engine.wait();

    let played = engine.play_search_result(&result).unwrap();
    assert_eq!((played.start(), played.end()), (A1, A8));
    assert_eq!(engine.status(), GameStatus::Checkmate);
}
