//! Pseudo-legal generation per piece type and king-safety filtering.

mod kings;
mod knights;
mod pawns;
mod sliders;

pub use kings::update_castling_rights;
pub(crate) use kings::{king_home, rook_home};

use self::sliders::SliderType;
use super::attacks::is_in_check;
use super::{Bitboard, Board, Color, LegalMoves, Move, Piece, Square, PROMOTION_PIECES};

impl Board {
    /// Destinations the piece on `from` reaches by its movement rules alone,
    /// without regard to its own king. Empty squares yield an empty set.
    #[must_use]
    pub fn pseudo_legal_targets(&self, from: Square) -> Bitboard {
        let Some((color, piece)) = self.position.piece_at(from) else {
            return Bitboard::EMPTY;
        };
        match piece {
            Piece::Pawn => self.pawn_targets(from, color),
            Piece::Knight => self.knight_targets(from, color),
            Piece::Bishop => self.slider_targets(from, color, SliderType::Bishop),
            Piece::Rook => self.slider_targets(from, color, SliderType::Rook),
            Piece::Queen => self.slider_targets(from, color, SliderType::Queen),
            Piece::King => {
                let steps = self.king_step_targets(from, color);
                Bitboard(steps.0 | self.castling_targets(from, color).0)
            }
        }
    }

    /// Legal destinations for the piece on `from`.
    ///
    /// Every pseudo-legal destination is tried on a copy of the position and
    /// kept only if the mover's king is not attacked afterwards.
    #[must_use]
    pub fn legal_targets(&self, from: Square) -> Bitboard {
        let Some((color, _)) = self.position.piece_at(from) else {
            return Bitboard::EMPTY;
        };
        self.pseudo_legal_targets(from)
            .iter()
            .filter(|&to| self.leaves_king_safe(from, to, color))
            .collect()
    }

    /// Legal destinations for every occupied square, for both colors.
    #[must_use]
    pub fn legal_moves(&self) -> LegalMoves {
        let mut map = LegalMoves::default();
        for (from, _, _) in self.position.pieces() {
            map.set(from, self.legal_targets(from));
        }
        map
    }

    /// True if `color` has at least one legal move
    #[must_use]
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.position
            .pieces()
            .filter(|&(_, c, _)| c == color)
            .any(|(from, _, _)| !self.legal_targets(from).is_empty())
    }

    /// True if `color`'s king is attacked
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.position, color)
    }

    /// Legal moves of the side to move, with one entry per promotion choice.
    #[must_use]
    pub fn legal_move_list(&self) -> Vec<Move> {
        let color = self.side_to_move;
        let mut moves = Vec::new();
        for (from, c, piece) in self.position.pieces() {
            if c != color {
                continue;
            }
            for to in self.legal_targets(from) {
                if piece == Piece::Pawn && to.rank() == color.promotion_row() {
                    moves.extend(
                        PROMOTION_PIECES
                            .iter()
                            .map(|&promo| Move::with_promotion(from, to, promo)),
                    );
                } else {
                    moves.push(Move::new(from, to));
                }
            }
        }
        moves
    }

    fn leaves_king_safe(&self, from: Square, to: Square, color: Color) -> bool {
        let mut position = self.position;
        let mover = position.take(from);
        if mover.map(|(_, p)| p) == Some(Piece::Pawn) && self.is_en_passant_capture(from, to, color) {
            position.take(Square::at(from.rank(), to.file()));
        }
        position.set(to, mover);
        !is_in_check(&position, color)
    }

    /// Count leaf nodes of the legal move tree to `depth` plies.
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_move_list();
        if depth == 1 {
            return moves.len() as u64;
        }

        moves
            .iter()
            .map(|&mv| self.play(mv).0.perft(depth - 1))
            .sum()
    }
}
