use super::super::attacks::{DIAGONALS, ORTHOGONALS};
use super::super::{Bitboard, Board, Color, Square};

/// Type of sliding piece for move generation
#[derive(Clone, Copy)]
pub(crate) enum SliderType {
    Bishop,
    Rook,
    Queen,
}

impl SliderType {
    fn directions(self) -> &'static [(i8, i8)] {
        const QUEEN: [(i8, i8); 8] = [
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
        ];
        match self {
            SliderType::Bishop => &DIAGONALS,
            SliderType::Rook => &ORTHOGONALS,
            SliderType::Queen => &QUEEN,
        }
    }
}

impl Board {
    /// Ray-cast destinations: stop before an own piece, stop on an enemy piece.
    pub(crate) fn slider_targets(&self, from: Square, color: Color, slider: SliderType) -> Bitboard {
        let mut targets = Bitboard::EMPTY;
        for &(dr, df) in slider.directions() {
            let mut current = from;
            while let Some(next) = current.offset(dr, df) {
                match self.position.color_at(next) {
                    None => targets.insert(next),
                    Some(c) if c == color => break,
                    Some(_) => {
                        targets.insert(next);
                        break;
                    }
                }
                current = next;
            }
        }
        targets
    }
}
