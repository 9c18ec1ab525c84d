//! Square-attacked test and the movement offsets shared with move generation.

use super::{Color, Piece, Position, Square};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub(crate) const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Returns true if any piece of `by` attacks `target`.
///
/// Each attacker kind is tested independently and the first hit returns, so
/// this answers "is it attacked", never "by how many".
#[must_use]
pub fn is_square_attacked(position: &Position, by: Color, target: Square) -> bool {
    let holds = |sq: Option<Square>, piece: Piece| {
        sq.and_then(|sq| position.piece_at(sq)) == Some((by, piece))
    };

    // A pawn attacks one row ahead of itself, so look one row behind the target.
    let back = -by.pawn_direction();
    if holds(target.offset(back, -1), Piece::Pawn) || holds(target.offset(back, 1), Piece::Pawn) {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, df)| holds(target.offset(dr, df), Piece::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, df)| holds(target.offset(dr, df), Piece::King))
    {
        return true;
    }

    let slider_hit = |directions: &[(i8, i8)], piece: Piece| {
        directions.iter().any(|&(dr, df)| {
            match first_occupied(position, target, dr, df) {
                Some(sq) => {
                    let occupant = position.piece_at(sq);
                    occupant == Some((by, piece)) || occupant == Some((by, Piece::Queen))
                }
                None => false,
            }
        })
    };

    slider_hit(&DIAGONALS, Piece::Bishop) || slider_hit(&ORTHOGONALS, Piece::Rook)
}

/// First occupied square walking from `from` (exclusive) in one direction.
fn first_occupied(position: &Position, from: Square, dr: i8, df: i8) -> Option<Square> {
    let mut current = from;
    while let Some(next) = current.offset(dr, df) {
        if !position.is_empty(next) {
            return Some(next);
        }
        current = next;
    }
    None
}

/// Returns true if `color`'s king is attacked. A side without a king is never in check.
#[must_use]
pub fn is_in_check(position: &Position, color: Color) -> bool {
    position
        .find_king(color)
        .is_some_and(|king| is_square_attacked(position, color.opponent(), king))
}
