use super::super::{Bitboard, Board, Color, Piece, Square};

impl Board {
    /// Pseudo-legal pawn destinations: pushes, captures and en passant.
    pub(crate) fn pawn_targets(&self, from: Square, color: Color) -> Bitboard {
        let mut targets = Bitboard::EMPTY;
        let dir = color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if self.position.is_empty(one) {
                targets.insert(one);
                if from.rank() == color.pawn_start_row() {
                    if let Some(two) = one.offset(dir, 0) {
                        if self.position.is_empty(two) {
                            targets.insert(two);
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(diagonal) = from.offset(dir, df) else {
                continue;
            };
            match self.position.piece_at(diagonal) {
                Some((target_color, _)) if target_color != color => targets.insert(diagonal),
                Some(_) => {}
                None if self.is_en_passant_capture(from, diagonal, color) => {
                    targets.insert(diagonal)
                }
                None => {}
            }
        }

        targets
    }

    /// True if a pawn of `color` on `from` moving diagonally onto `to` takes en passant.
    ///
    /// Requires `to` to be the recorded en-passant target, the mover to be on
    /// move, and an enemy pawn beside `from` on the target's file.
    pub(crate) fn is_en_passant_capture(&self, from: Square, to: Square, color: Color) -> bool {
        if self.en_passant_target != Some(to) || self.side_to_move != color {
            return false;
        }
        if from.file() == to.file() {
            return false;
        }
        let passed = Square::at(from.rank(), to.file());
        self.position.piece_at(passed) == Some((color.opponent(), Piece::Pawn))
    }
}
