use super::super::attacks::{KING_OFFSETS, KNIGHT_OFFSETS};
use super::super::{Bitboard, Board, Color, Square};

impl Board {
    /// Single-step destinations from a fixed offset table (knight or king steps).
    pub(crate) fn leaper_targets(&self, from: Square, color: Color, offsets: &[(i8, i8)]) -> Bitboard {
        offsets
            .iter()
            .filter_map(|&(dr, df)| from.offset(dr, df))
            .filter(|&to| self.position.color_at(to) != Some(color))
            .collect()
    }

    pub(crate) fn knight_targets(&self, from: Square, color: Color) -> Bitboard {
        self.leaper_targets(from, color, &KNIGHT_OFFSETS)
    }

    pub(crate) fn king_step_targets(&self, from: Square, color: Color) -> Bitboard {
        self.leaper_targets(from, color, &KING_OFFSETS)
    }
}
