//! Piece placement: which piece, if any, stands on each of the 64 squares.

use super::{Color, Piece, Square};

/// Fixed 64-square piece placement, indexed top-to-bottom like FEN.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position([Option<(Color, Piece)>; 64]);

impl Default for Position {
    fn default() -> Self {
        Position::empty()
    }
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Position {
    /// A board with no pieces
    #[must_use]
    pub const fn empty() -> Self {
        Position([None; 64])
    }

    /// The standard initial placement
    #[must_use]
    pub fn starting() -> Self {
        let mut position = Position::empty();
        for (i, piece) in BACK_RANK.iter().enumerate() {
            let file = i as u8 + 1;
            position.set(Square::at(1, file), Some((Color::Black, *piece)));
            position.set(Square::at(2, file), Some((Color::Black, Piece::Pawn)));
            position.set(Square::at(7, file), Some((Color::White, Piece::Pawn)));
            position.set(Square::at(8, file), Some((Color::White, *piece)));
        }
        position
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.0[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.0[sq.index()].is_none()
    }

    #[inline]
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.0[sq.index()].map(|(color, _)| color)
    }

    #[inline]
    pub fn set(&mut self, sq: Square, occupant: Option<(Color, Piece)>) {
        self.0[sq.index()] = occupant;
    }

    /// Remove and return whatever stands on `sq`
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<(Color, Piece)> {
        self.0[sq.index()].take()
    }

    /// Square of `color`'s king.
    ///
    /// Returns the first king found; positions with no king for `color` are
    /// malformed and yield `None`.
    #[must_use]
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, c, p)| c == color && p == Piece::King)
            .map(|(sq, _, _)| sq)
    }

    /// Iterate over occupied squares in index order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Color, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|(c, p)| (sq, c, p)))
    }

    /// True when neither side can possibly deliver mate: bare kings, a single
    /// minor piece, or bishops that all stand on one square color.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut knights = 0;
        let mut bishop_shades = [false; 2];
        for (sq, _, piece) in self.pieces() {
            match piece {
                Piece::King => {}
                Piece::Pawn | Piece::Rook | Piece::Queen => return false,
                Piece::Knight => {
                    minors += 1;
                    knights += 1;
                }
                Piece::Bishop => {
                    minors += 1;
                    bishop_shades[((sq.rank() + sq.file()) % 2) as usize] = true;
                }
            }
        }
        if minors <= 1 {
            return true;
        }
        knights == 0 && !(bishop_shades[0] && bishop_shades[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_layout() {
        let position = Position::starting();
        assert_eq!(position.piece_at(sq("e1")), Some((Color::White, Piece::King)));
        assert_eq!(position.piece_at(sq("d8")), Some((Color::Black, Piece::Queen)));
        assert_eq!(position.piece_at(sq("a2")), Some((Color::White, Piece::Pawn)));
        assert!(position.is_empty(sq("e4")));
        assert_eq!(position.pieces().count(), 32);
    }

    #[test]
    fn test_find_king() {
        let position = Position::starting();
        assert_eq!(position.find_king(Color::Black), Some(sq("e8")));
        assert_eq!(Position::empty().find_king(Color::White), None);
    }

    #[test]
    fn test_insufficient_material() {
        let mut position = Position::empty();
        position.set(sq("e1"), Some((Color::White, Piece::King)));
        position.set(sq("e8"), Some((Color::Black, Piece::King)));
        assert!(position.is_insufficient_material());

        position.set(sq("c1"), Some((Color::White, Piece::Bishop)));
        assert!(position.is_insufficient_material());

        // c1 and f8 are both dark squares
        position.set(sq("f8"), Some((Color::Black, Piece::Bishop)));
        assert!(position.is_insufficient_material());

        position.set(sq("c8"), Some((Color::Black, Piece::Bishop)));
        assert!(!position.is_insufficient_material());

        assert!(!Position::starting().is_insufficient_material());
    }
}
