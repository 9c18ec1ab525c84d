//! Move requests and per-square legal-move maps.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::piece::Piece;
use super::square::Square;
use crate::board::error::MoveError;

/// A requested move: origin, destination and an optional promotion choice.
///
/// Formats as UCI long algebraic notation (`e2e4`, `e7e8q`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_promotion(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            promotion: Some(piece),
        }
    }

    /// Parse a move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
    ///
    /// Only the syntax is checked; legality is up to the caller.
    pub fn from_uci(uci: &str) -> Result<Self, MoveError> {
        if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
            return Err(MoveError::InvalidLength { len: uci.len() });
        }
        let invalid = || MoveError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid())?;

        let promotion = match uci[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece) if piece.is_promotion_target() => Some(piece),
                _ => return Err(MoveError::InvalidPromotion { char: c }),
            },
        };

        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}

/// Legal destinations for every square on the board.
///
/// Empty squares map to the empty set.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LegalMoves([Bitboard; 64]);

impl Default for LegalMoves {
    fn default() -> Self {
        LegalMoves([Bitboard::EMPTY; 64])
    }
}

impl LegalMoves {
    /// Destinations the piece on `from` may legally move to
    #[inline]
    #[must_use]
    pub fn from(&self, from: Square) -> Bitboard {
        self.0[from.index()]
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.0[from.index()].contains(to)
    }

    #[inline]
    pub(crate) fn set(&mut self, from: Square, targets: Bitboard) {
        self.0[from.index()] = targets;
    }

    /// Iterate over `(origin, destinations)` for every square with at least one move
    pub fn iter(&self) -> impl Iterator<Item = (Square, Bitboard)> + '_ {
        Square::all()
            .map(move |sq| (sq, self.0[sq.index()]))
            .filter(|(_, targets)| !targets.is_empty())
    }

    /// Total number of `(origin, destination)` pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.iter().map(|bb| bb.popcount() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|bb| bb.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_round_trip() {
        let mv = Move::from_uci("e7e8q").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!("g1f3".parse::<Move>().unwrap().to_string(), "g1f3");
    }

    #[test]
    fn test_uci_errors() {
        assert!(matches!(
            Move::from_uci("e2"),
            Err(MoveError::InvalidLength { len: 2 })
        ));
        assert!(matches!(
            Move::from_uci("z9e4"),
            Err(MoveError::InvalidSquare { .. })
        ));
        assert!(matches!(
            Move::from_uci("e7e8k"),
            Err(MoveError::InvalidPromotion { char: 'k' })
        ));
    }

    #[test]
    fn test_legal_moves_map_for_empty_square_is_empty() {
        let map = LegalMoves::default();
        let e4: Square = "e4".parse().unwrap();
        assert!(map.from(e4).is_empty());
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }
}
