//! Chess rules and notation.
//!
//! Boards are plain values: applying a move returns a new board and never
//! touches the old one. Legal moves come from per-piece pseudo-legal
//! generation filtered by a king-safety test on a copy of the position.
//!
//! # Example
//! ```
//! use chess_core::board::{create_move, Board, MoveRecord};
//!
//! let root = MoveRecord::initial(Board::new());
//! let mv = root.board().parse_san("e4").unwrap();
//! let next = create_move(&root, mv);
//! assert_eq!(next.san(), "e4");
//! assert_eq!(next.board().en_passant_target(), Some("e3".parse().unwrap()));
//! ```

mod attacks;
mod error;
mod fen;
mod make_move;
mod movegen;
mod position;
mod record;
mod san;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attacks::{is_in_check, is_square_attacked};
pub use error::{FenError, MoveError, PgnError, SanError, SquareError};
pub use fen::STARTING_FEN;
pub use make_move::Transition;
pub use movegen::update_castling_rights;
pub use position::Position;
pub use record::{create_move, try_create_move, GameStatus, MoveRecord};
pub use san::SanMove;
pub use state::Board;
pub use types::{
    square_distance, Bitboard, BitboardIter, CastleSide, CastlingRights, Color, LegalMoves, Move,
    Piece, Square, PROMOTION_PIECES,
};
