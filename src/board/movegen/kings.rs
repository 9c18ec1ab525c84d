use super::super::attacks::is_square_attacked;
use super::super::{
    Bitboard, Board, CastleSide, CastlingRights, Color, Piece, Position, Square,
};

const KING_HOME_FILE: u8 = 5;

/// Home square of `color`'s king
pub(crate) fn king_home(color: Color) -> Square {
    Square::at(color.back_row(), KING_HOME_FILE)
}

/// Home square of the rook that castles towards `side`
pub(crate) fn rook_home(color: Color, side: CastleSide) -> Square {
    Square::at(color.back_row(), side.rook_file())
}

impl Board {
    /// Castling destinations for a king of `color` standing on `from`.
    ///
    /// Needs the right, an empty path between king and rook (on the queenside
    /// that includes the knight square the king never crosses) and no attacked
    /// square on the king's path, its start and destination included.
    pub(crate) fn castling_targets(&self, from: Square, color: Color) -> Bitboard {
        let mut targets = Bitboard::EMPTY;
        if from != king_home(color) {
            return targets;
        }
        let enemy = color.opponent();
        let row = color.back_row();

        for side in CastleSide::BOTH {
            if !self.castling_rights.has(color, side) {
                continue;
            }
            if self.position.piece_at(rook_home(color, side)) != Some((color, Piece::Rook)) {
                continue;
            }

            let rook_file = side.rook_file();
            let (low, high) = if rook_file < KING_HOME_FILE {
                (rook_file + 1, KING_HOME_FILE - 1)
            } else {
                (KING_HOME_FILE + 1, rook_file - 1)
            };
            if !(low..=high).all(|file| self.position.is_empty(Square::at(row, file))) {
                continue;
            }

            let king_to = side.king_target_file();
            let (path_low, path_high) = if king_to < KING_HOME_FILE {
                (king_to, KING_HOME_FILE)
            } else {
                (KING_HOME_FILE, king_to)
            };
            let path_safe = (path_low..=path_high)
                .all(|file| !is_square_attacked(&self.position, enemy, Square::at(row, file)));
            if path_safe {
                targets.insert(Square::at(row, king_to));
            }
        }
        targets
    }
}

/// Castling rights that survive in `position`.
///
/// Rights are derived from occupancy: a right is kept only while the king
/// and the matching rook still stand on their home squares. The result is
/// intersected with `previous`, so rights never come back once lost.
#[must_use]
pub fn update_castling_rights(position: &Position, previous: CastlingRights) -> CastlingRights {
    let mut rights = previous;
    for color in Color::BOTH {
        let king_home_held = position.piece_at(king_home(color)) == Some((color, Piece::King));
        for side in CastleSide::BOTH {
            let rook_home_held =
                position.piece_at(rook_home(color, side)) == Some((color, Piece::Rook));
            if !(king_home_held && rook_home_held) {
                rights.remove(color, side);
            }
        }
    }
    rights
}
