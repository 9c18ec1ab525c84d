//! Square types and coordinate conversions.
//!
//! A square has three interchangeable spellings:
//! - a linear index `0..64`, where index 0 is a8 and index 63 is h1
//!   (the board is stored top to bottom, the way FEN lists ranks);
//! - a `(rank, file)` pair with both components in `1..=8`, where rank 1 is
//!   the *top* row (algebraic rank 8) and file 1 is the a-file;
//! - an algebraic string such as `"e4"`.
//!
//! All three convert into [`Square`], which stores the index.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// A square on the chess board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a square from its linear index (0 = a8, 63 = h1)
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Create a square from a 1-based `(rank, file)` pair, rank 1 being the top row.
    #[must_use]
    pub const fn from_coords(rank: u8, file: u8) -> Option<Self> {
        if rank >= 1 && rank <= 8 && file >= 1 && file <= 8 {
            Some(Square((rank - 1) * 8 + (file - 1)))
        } else {
            None
        }
    }

    /// Shorthand for squares known to be on the board.
    pub(crate) const fn at(rank: u8, file: u8) -> Self {
        Square((rank - 1) * 8 + (file - 1))
    }

    /// Linear index (0-63, a8=0, h1=63)
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Row counted from the top (1-8, where 1 = algebraic rank 8)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 / 8 + 1
    }

    /// File (1-8, where 1 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> u8 {
        self.0 % 8 + 1
    }

    /// `(rank, file)` pair as described on [`Square::rank`]
    #[inline]
    #[must_use]
    pub const fn coords(self) -> (u8, u8) {
        (self.rank(), self.file())
    }

    /// Algebraic file letter (`'a'..='h'`)
    #[inline]
    #[must_use]
    pub const fn file_char(self) -> char {
        (b'a' + self.file() - 1) as char
    }

    /// Algebraic rank digit (`'1'..='8'`)
    #[inline]
    #[must_use]
    pub const fn rank_char(self) -> char {
        (b'0' + 9 - self.rank()) as char
    }

    /// Square reached by moving `drank` rows and `dfile` files, if on the board.
    #[inline]
    #[must_use]
    pub fn offset(self, drank: i8, dfile: i8) -> Option<Self> {
        let rank = self.rank() as i8 + drank;
        let file = self.file() as i8 + dfile;
        if (1..=8).contains(&rank) && (1..=8).contains(&file) {
            Some(Square::at(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// Iterate over all 64 squares in index order
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }
}

/// Absolute `(rank, file)` distance between two squares.
///
/// Used to spot two-square pawn advances and two-file king moves (castling).
#[inline]
#[must_use]
pub fn square_distance(a: Square, b: Square) -> (u8, u8) {
    (a.rank().abs_diff(b.rank()), a.file().abs_diff(b.file()))
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl TryFrom<usize> for Square {
    type Error = SquareError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Square::from_index(index).ok_or(SquareError::IndexOutOfBounds { index })
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (u8, u8)) -> Result<Self, Self::Error> {
        if !(1..=8).contains(&rank) {
            return Err(SquareError::RankOutOfBounds { rank });
        }
        if !(1..=8).contains(&file) {
            return Err(SquareError::FileOutOfBounds { file });
        }
        Ok(Square::at(rank, file))
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareError::InvalidNotation {
            notation: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = match bytes[0] {
            b'a'..=b'h' => bytes[0] - b'a' + 1,
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            b'1'..=b'8' => 9 - (bytes[1] - b'0'),
            _ => return Err(invalid()),
        };
        Ok(Square::at(rank, file))
    }
}
