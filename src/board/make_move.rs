use super::movegen::{rook_home, update_castling_rights};
use super::{square_distance, Board, CastleSide, Color, Move, Piece, Square};

/// What a single ply did, beyond the resulting board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub color: Color,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
    /// Piece the pawn became; `None` on a promotion square means the choice is pending
    pub promotion: Option<Piece>,
    pub needs_promotion: bool,
}

impl Board {
    /// Apply `mv` and return the resulting board with a summary of the ply.
    ///
    /// The move is assumed legal. A pawn reaching the last rank without a
    /// promotion choice stays a pawn and the transition reports
    /// `needs_promotion`.
    ///
    /// # Panics
    /// Panics if `mv.from` is empty.
    #[must_use]
    pub fn play(&self, mv: Move) -> (Board, Transition) {
        let (color, piece) = self
            .position
            .piece_at(mv.from)
            .expect("play: origin square is empty");
        let mut next = *self;
        let position = &mut next.position;

        let en_passant = piece == Piece::Pawn && self.is_en_passant_capture(mv.from, mv.to, color);
        let mut captured = position.take(mv.to).map(|(_, p)| p);
        if en_passant {
            captured = position
                .take(Square::at(mv.from.rank(), mv.to.file()))
                .map(|(_, p)| p);
        }

        let (_, file_delta) = square_distance(mv.from, mv.to);
        let castle = if piece == Piece::King && file_delta == 2 {
            let side = if mv.to.file() > mv.from.file() {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rook = position.take(rook_home(color, side));
            position.set(Square::at(mv.from.rank(), side.rook_target_file()), rook);
            Some(side)
        } else {
            None
        };

        let reaches_last_rank = piece == Piece::Pawn && mv.to.rank() == color.promotion_row();
        let promotion = mv.promotion.filter(|p| reaches_last_rank && p.is_promotion_target());
        position.take(mv.from);
        position.set(mv.to, Some((color, promotion.unwrap_or(piece))));

        next.en_passant_target = match square_distance(mv.from, mv.to) {
            (2, 0) if piece == Piece::Pawn => mv.from.offset(color.pawn_direction(), 0),
            _ => None,
        };
        next.halfmove_clock = if piece == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if color == Color::Black {
            next.fullmove_number = next.fullmove_number.saturating_add(1);
        }
        next.castling_rights = update_castling_rights(&next.position, self.castling_rights);
        next.side_to_move = color.opponent();

        let transition = Transition {
            color,
            piece,
            captured,
            castle,
            en_passant,
            promotion,
            needs_promotion: reaches_last_rank && promotion.is_none(),
        };
        (next, transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    #[test]
    fn test_double_push_sets_passed_square() {
        let (board, t) = Board::new().play(mv("e2e4"));
        assert_eq!(board.en_passant_target(), Some("e3".parse().unwrap()));
        assert_eq!(t.piece, Piece::Pawn);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.side_to_move(), Color::Black);

        let (board, _) = board.play(mv("g8f6"));
        assert_eq!(board.en_passant_target(), None);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 2);
    }

    #[test]
    fn test_en_passant_removes_passed_pawn() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let (after, t) = board.play(mv("e5d6"));
        assert!(t.en_passant);
        assert_eq!(t.captured, Some(Piece::Pawn));
        assert!(after.piece_at("d5".parse().unwrap()).is_none());
        assert_eq!(
            after.piece_at("d6".parse().unwrap()),
            Some((Color::White, Piece::Pawn))
        );
    }

    #[test]
    fn test_castling_moves_rook_and_drops_rights() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let (after, t) = board.play(mv("e1g1"));
        assert_eq!(t.castle, Some(CastleSide::Kingside));
        assert_eq!(
            after.piece_at("f1".parse().unwrap()),
            Some((Color::White, Piece::Rook))
        );
        assert!(after.piece_at("h1".parse().unwrap()).is_none());
        assert_eq!(after.castling_rights().to_string(), "kq");

        let (after, t) = after.play(mv("e8c8"));
        assert_eq!(t.castle, Some(CastleSide::Queenside));
        assert_eq!(
            after.piece_at("d8".parse().unwrap()),
            Some((Color::Black, Piece::Rook))
        );
        assert_eq!(after.castling_rights().to_string(), "-");
    }

    #[test]
    fn test_promotion_pending_and_chosen() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
        let (after, t) = board.play(mv("a7a8"));
        assert!(t.needs_promotion);
        assert_eq!(
            after.piece_at("a8".parse().unwrap()),
            Some((Color::White, Piece::Pawn))
        );

        let (after, t) = board.play(mv("a7a8n"));
        assert!(!t.needs_promotion);
        assert_eq!(t.promotion, Some(Piece::Knight));
        assert_eq!(
            after.piece_at("a8".parse().unwrap()),
            Some((Color::White, Piece::Knight))
        );
    }
}
