use std::env;
use std::process::ExitCode;

use chess_core::board::Move;
use chess_core::Game;

fn main() -> ExitCode {
    let mut args = env::args().skip(1).peekable();
    if args.peek().is_none() {
        eprintln!("usage: check_mate_status [--fen <FEN>] <move1> <move2> ...");
        return ExitCode::FAILURE;
    }

    let mut game = if args.peek().map(String::as_str) == Some("--fen") {
        args.next();
        let Some(fen) = args.next() else {
            eprintln!("--fen needs a FEN string");
            return ExitCode::FAILURE;
        };
        match Game::from_fen(&fen) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Game::new()
    };

    // Moves may be given in SAN or long algebraic form
    for text in args {
        let played = match Move::from_uci(&text) {
            Ok(mv) => game.play(mv).map_err(|e| e.to_string()),
            Err(_) => game.play_san(&text).map_err(|e| e.to_string()),
        };
        if let Err(err) = played {
            eprintln!("{text}: {err}");
            return ExitCode::FAILURE;
        }
    }

    let board = game.board();
    let moves = board.legal_move_list();
    println!("side_to_move: {}", board.side_to_move());
    println!("legal_moves: {}", moves.len());
    println!("check: {}", game.current().is_check());
    let status = game.status();
    println!("status: {status:?}");
    println!("game_over: {}", status.is_over());
    if let Some(opening) = game.opening() {
        println!("opening: {} {}", opening.eco, opening.name);
    }
    println!("fen: {}", board.to_fen());
    for mv in moves {
        println!("{mv} {}", board.move_to_san(mv));
    }
    ExitCode::SUCCESS
}
