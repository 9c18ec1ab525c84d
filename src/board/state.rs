use super::{CastlingRights, Color, Piece, Position, Square};

/// Full game state as described by a FEN record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) position: Position,
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Board {
    pub fn new() -> Self {
        Board {
            position: Position::starting(),
            castling_rights: CastlingRights::all(),
            ..Board::empty()
        }
    }

    pub(crate) fn empty() -> Self {
        Board {
            position: Position::empty(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Square passed over by the last two-square pawn advance, if any
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.position.piece_at(sq)
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
