//! Standard Algebraic Notation (SAN) support.
//!
//! SAN is the standard human-readable chess notation used in scoresheets,
//! books, and GUIs. Examples: "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#"
//!
//! Decoding runs in two steps: [`SanMove`] tokenizes the text into
//! structured fields, then [`SanMove::resolve`] finds the one legal origin
//! that fits them.
//!
//! # Examples
//! ```
//! use chess_core::board::Board;
//!
//! let board = Board::new();
//! let mv = board.parse_san("e4").unwrap();
//! assert_eq!(board.move_to_san(mv), "e4");
//! ```

use std::str::FromStr;

use super::error::SanError;
use super::make_move::Transition;
use super::movegen::king_home;
use super::{Board, CastleSide, LegalMoves, Move, Piece, Square};

/// A SAN string broken into its grammatical parts.
///
/// `from_rank` is a row counted from the top, like [`Square::rank`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SanMove {
    pub piece: Piece,
    pub from_file: Option<u8>,
    pub from_rank: Option<u8>,
    pub capture: bool,
    pub to: Option<Square>,
    pub promotion: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub check: bool,
    pub mate: bool,
}

impl SanMove {
    fn castling(side: CastleSide, check: bool, mate: bool) -> Self {
        SanMove {
            piece: Piece::King,
            from_file: None,
            from_rank: None,
            capture: false,
            to: None,
            promotion: None,
            castle: Some(side),
            check,
            mate,
        }
    }

    /// Find the unique legal move this notation describes.
    ///
    /// Candidates are the side to move's pieces of the named type, narrowed
    /// first by the partial origin and then by whether they can legally reach
    /// the destination. Zero or several survivors is an error, never a guess.
    pub fn resolve(&self, board: &Board, legal: &LegalMoves, san: &str) -> Result<Move, SanError> {
        let color = board.side_to_move();
        let no_match = || SanError::NoMatchingMove {
            san: san.to_string(),
        };

        if let Some(side) = self.castle {
            let from = king_home(color);
            let to = Square::at(color.back_row(), side.king_target_file());
            if board.piece_at(from) == Some((color, Piece::King)) && legal.contains(from, to) {
                return Ok(Move::new(from, to));
            }
            return Err(no_match());
        }

        let to = self.to.ok_or_else(no_match)?;
        let reaches_last_rank = self.piece == Piece::Pawn && to.rank() == color.promotion_row();
        if self.promotion.is_some() && !reaches_last_rank {
            return Err(no_match());
        }

        let mut origins = board
            .position()
            .pieces()
            .filter(|&(_, c, p)| c == color && p == self.piece)
            .map(|(sq, _, _)| sq)
            .filter(|sq| self.from_file.map_or(true, |f| sq.file() == f))
            .filter(|sq| self.from_rank.map_or(true, |r| sq.rank() == r))
            .filter(|&sq| legal.contains(sq, to));

        let from = origins.next().ok_or_else(no_match)?;
        if origins.next().is_some() {
            return Err(SanError::AmbiguousMove {
                san: san.to_string(),
            });
        }

        Ok(Move {
            from,
            to,
            promotion: self.promotion,
        })
    }
}

impl FromStr for SanMove {
    type Err = SanError;

    fn from_str(san: &str) -> Result<Self, Self::Err> {
        let text = san.trim();
        if text.is_empty() {
            return Err(SanError::Empty);
        }
        let malformed = || SanError::Malformed {
            san: text.to_string(),
        };

        let mate = text.ends_with('#');
        let check = text.ends_with('+') || mate;
        let body = text.trim_end_matches(['+', '#']);

        match body {
            "O-O" | "0-0" => return Ok(SanMove::castling(CastleSide::Kingside, check, mate)),
            "O-O-O" | "0-0-0" => return Ok(SanMove::castling(CastleSide::Queenside, check, mate)),
            _ => {}
        }

        let chars: Vec<char> = body.chars().collect();
        if chars.is_empty() {
            return Err(SanError::Empty);
        }

        let (piece, mut rest) = if chars[0].is_ascii_uppercase() {
            let piece = Piece::from_char(chars[0])
                .filter(|&p| p != Piece::Pawn)
                .ok_or(SanError::InvalidPiece { char: chars[0] })?;
            (piece, &chars[1..])
        } else {
            (Piece::Pawn, &chars[..])
        };

        let mut promotion = None;
        if let Some(eq) = rest.iter().position(|&c| c == '=') {
            let tail = &rest[eq + 1..];
            let promo_char = *tail.first().ok_or_else(malformed)?;
            if tail.len() != 1 {
                return Err(malformed());
            }
            promotion = Some(promotion_piece(promo_char)?);
            rest = &rest[..eq];
        } else if piece == Piece::Pawn && rest.last().is_some_and(|c| c.is_ascii_uppercase()) {
            let promo_char = rest[rest.len() - 1];
            promotion = Some(promotion_piece(promo_char)?);
            rest = &rest[..rest.len() - 1];
        }
        if promotion.is_some() && piece != Piece::Pawn {
            return Err(malformed());
        }

        if rest.len() < 2 {
            return Err(SanError::InvalidSquare {
                notation: rest.iter().collect(),
            });
        }
        let (prefix, dest) = rest.split_at(rest.len() - 2);
        let dest_text: String = dest.iter().collect();
        let to: Square = dest_text.parse().map_err(|_| SanError::InvalidSquare {
            notation: dest_text.clone(),
        })?;

        let mut from_file = None;
        let mut from_rank = None;
        let mut capture = false;
        let mut idx = 0;
        if let Some(&c @ 'a'..='h') = prefix.get(idx) {
            from_file = Some(c as u8 - b'a' + 1);
            idx += 1;
        }
        if let Some(&c @ '1'..='8') = prefix.get(idx) {
            from_rank = Some(9 - (c as u8 - b'0'));
            idx += 1;
        }
        if prefix.get(idx) == Some(&'x') {
            capture = true;
            idx += 1;
        }
        if idx != prefix.len() {
            return Err(malformed());
        }
        if piece == Piece::Pawn && (from_rank.is_some() || (capture && from_file.is_none())) {
            return Err(malformed());
        }

        Ok(SanMove {
            piece,
            from_file,
            from_rank,
            capture,
            to: Some(to),
            promotion,
            castle: None,
            check,
            mate,
        })
    }
}

fn promotion_piece(c: char) -> Result<Piece, SanError> {
    Piece::from_char(c)
        .filter(|p| p.is_promotion_target())
        .ok_or(SanError::InvalidPromotion { char: c })
}

/// Encode a ply in SAN.
///
/// `before` and `legal_before` describe the position the move was played
/// from: disambiguation looks at which other pieces could have reached the
/// same square there.
pub(crate) fn encode_san(
    before: &Board,
    legal_before: &LegalMoves,
    mv: Move,
    transition: &Transition,
    check: bool,
    mate: bool,
) -> String {
    let mut san = String::new();

    if let Some(side) = transition.castle {
        san.push_str(side.san());
    } else {
        match transition.piece.san_letter() {
            Some(letter) => {
                san.push(letter);
                san.push_str(&disambiguation(before, legal_before, mv, transition.piece));
            }
            None if transition.captured.is_some() => san.push(mv.from.file_char()),
            None => {}
        }

        if transition.captured.is_some() {
            san.push('x');
        }
        san.push_str(&mv.to.to_string());

        if let Some(letter) = transition.promotion.and_then(Piece::san_letter) {
            san.push('=');
            san.push(letter);
        }
    }

    if mate {
        san.push('#');
    } else if check {
        san.push('+');
    }
    san
}

/// Smallest origin hint that singles out `mv.from`: nothing, its file, its
/// rank, or the whole square, tried in that order.
fn disambiguation(before: &Board, legal_before: &LegalMoves, mv: Move, piece: Piece) -> String {
    let color = before.side_to_move();
    let rivals: Vec<Square> = before
        .position()
        .pieces()
        .filter(|&(sq, c, p)| c == color && p == piece && sq != mv.from)
        .map(|(sq, _, _)| sq)
        .filter(|&sq| legal_before.contains(sq, mv.to))
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
        mv.from.file_char().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
        mv.from.rank_char().to_string()
    } else {
        mv.from.to_string()
    }
}

impl Board {
    /// Format a legal move in Standard Algebraic Notation.
    ///
    /// Returns notation like "e4", "Nf3", "Bxc6+", "O-O-O", "e8=Q#"
    #[must_use]
    pub fn move_to_san(&self, mv: Move) -> String {
        let legal = self.legal_moves();
        let (after, transition) = self.play(mv);
        let to_move = after.side_to_move();
        let check = after.is_in_check(to_move);
        let mate = check && !after.has_legal_move(to_move);
        encode_san(self, &legal, mv, &transition, check, mate)
    }

    /// Parse a move in Standard Algebraic Notation.
    ///
    /// Accepts notation like "e4", "Nf3", "Bxc6", "O-O", "e8=Q"
    /// with optional check indicators (+, #).
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let parsed: SanMove = san.parse()?;
        parsed.resolve(self, &self.legal_moves(), san.trim())
    }
}
