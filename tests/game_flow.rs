use std::sync::Arc;
use std::thread;

use chess_core::analysis::{AnalysisError, AnalysisSession, Ticket};
use chess_core::{AnalysisResponse, Game, MoveQuality, Score};

/// Stand-in engine: feeds canned output through the ticket's collector.
fn run_engine(ticket: &Ticket, output: &[&str]) -> Option<AnalysisResponse> {
    let mut collector = ticket.collector();
    output.iter().find_map(|line| collector.feed(line))
}

#[test]
fn opening_follows_the_cursor() {
    let mut game = Game::new();
    for san in ["e4", "e5", "Nf3", "Nc6", "Bb5"] {
        game.play_san(san).unwrap();
    }
    let opening = game.opening().unwrap();
    assert_eq!(opening.eco, "C60");
    assert_eq!(opening.name, "Ruy Lopez");

    game.back();
    game.play_san("Bc4").unwrap();
    assert_eq!(game.opening().unwrap().eco, "C50");

    game.to_start();
    assert!(game.opening().is_none());
}

#[test]
fn pgn_round_trip_keeps_variations_and_tags() {
    let pgn = "[Event \"Club night\"]\n\
               [White \"Ada\"]\n\
               [Black \"Bob\"]\n\
               [Result \"1-0\"]\n\
               \n\
               1. e4 {best by test} e5 (1... c5 2. Nf3 (2. c3) d6) 2. Nf3 Nc6 3. Bb5 $1 a6?! 1-0\n";
    let game = Game::from_pgn(pgn).unwrap();
    assert_eq!(game.tags().event, "Club night");
    assert_eq!(game.tags().result, "1-0");
    assert_eq!(game.move_count(), 6);
    assert_eq!(game.tree().len(), 11);

    let movetext = chess_core::pgn::write_movetext(&game);
    assert_eq!(
        movetext,
        "1. e4 e5 (1... c5 2. Nf3 (2. c3) 2... d6) 2. Nf3 Nc6 3. Bb5 a6 1-0"
    );

    let again = Game::from_pgn(&game.to_pgn()).unwrap();
    assert_eq!(again.tags(), game.tags());
    assert_eq!(chess_core::pgn::write_movetext(&again), movetext);
}

#[test]
fn analysis_marks_moves_against_the_recommendation() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
    let session = AnalysisSession::new();
    let root = game.cursor();

    let ticket = session.submit(game.analysis_request());
    let response = run_engine(
        &ticket,
        &[
            "info depth 10 multipv 1 score cp 50 nodes 1000 pv e2e4 e8d7",
            "bestmove e2e4 ponder e8d7",
        ],
    )
    .unwrap();
    let response = session.complete(&ticket, response).unwrap();
    assert_eq!(game.apply_analysis(root, &response).unwrap(), None);
    let best = game.current().best_next().unwrap();
    assert_eq!(best.mv.to_string(), "e2e4");
    assert_eq!(best.score, Score::Centipawns(50));

    // A slower pawn move that the engine scores at -1.50 for White
    let e3 = game.play_uci("e2e3").unwrap();
    let ticket = session.submit(game.analysis_request());
    let response = run_engine(
        &ticket,
        &[
            "info depth 12 multipv 1 score cp 150 pv e8d7 e1d2",
            "bestmove e8d7",
        ],
    )
    .unwrap();
    let response = session.complete(&ticket, response).unwrap();
    assert_eq!(
        game.apply_analysis(e3, &response).unwrap(),
        Some(MoveQuality::Blunder)
    );
    assert_eq!(game.get(e3).unwrap().quality(), Some(MoveQuality::Blunder));

    // The recommended move is always Best
    game.goto(root);
    let e4 = game.play_uci("e2e4").unwrap();
    let ticket = session.submit(game.analysis_request());
    let response = run_engine(
        &ticket,
        &["info depth 8 score cp -40 pv e8e7", "bestmove e8e7"],
    )
    .unwrap();
    let response = session.complete(&ticket, response).unwrap();
    assert_eq!(
        game.apply_analysis(e4, &response).unwrap(),
        Some(MoveQuality::Best)
    );
    assert_eq!(game.variations(e4), vec![e3]);
}

#[test]
fn book_moves_win_over_evaluation() {
    let mut game = Game::new();
    let e4 = game.play_san("e4").unwrap();
    let ticket_response = AnalysisResponse {
        best_move: "e7e5".parse().unwrap(),
        ponder: None,
        variations: Vec::new(),
    };
    assert_eq!(
        game.apply_analysis(e4, &ticket_response).unwrap(),
        Some(MoveQuality::Book)
    );
}

#[test]
fn illegal_best_move_is_rejected() {
    let mut game = Game::new();
    let e4 = game.play_san("e4").unwrap();
    let response = AnalysisResponse {
        best_move: "e2e4".parse().unwrap(),
        ponder: None,
        variations: Vec::new(),
    };
    assert!(matches!(
        game.apply_analysis(e4, &response),
        Err(AnalysisError::InvalidMove(_))
    ));
    assert!(game.get(e4).unwrap().best_next().is_none());
}

#[test]
fn superseded_analysis_is_dropped() {
    let game = Game::new();
    let session = Arc::new(AnalysisSession::new());
    let first = session.submit(game.analysis_request());
    let second = session.submit(game.analysis_request());
    assert!(first.is_cancelled());

    let worker = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            let response = run_engine(&first, &["bestmove e2e4"]).unwrap();
            session.complete(&first, response)
        })
    };
    let stale = worker.join().unwrap();
    assert!(matches!(stale, Err(AnalysisError::Stale { .. })));
    assert!(session.is_current(&second));

    let response = run_engine(&second, &["bestmove d2d4"]).unwrap();
    assert!(session.complete(&second, response).is_ok());
    assert!(session.is_idle());
}
