//! Core chess types.
//!
//! This module contains the fundamental types used throughout the rules engine:
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - board square with its three coordinate spellings
//! - `Bitboard` - 64-bit square set
//! - `Move` and `LegalMoves` - move requests and per-square legal targets
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingRights};
pub use moves::{LegalMoves, Move};
pub use piece::{Color, Piece, PROMOTION_PIECES};
pub use square::{square_distance, Square};
