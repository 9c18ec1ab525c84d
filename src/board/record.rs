//! Immutable per-ply snapshots produced by the move transition engine.

use log::{debug, trace};

use super::error::MoveError;
use super::make_move::Transition;
use super::san::encode_san;
use super::{Board, CastleSide, Color, FenError, LegalMoves, Move, Piece, Square};
use crate::analysis::BestMove;
use crate::quality::MoveQuality;

/// Outcome of the position held by a record, from the side to move's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
}

impl GameStatus {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Snapshot of the game after one ply.
///
/// The root of a game holds a record with no move. Everything except the
/// quality mark and the best-next-move annotation is fixed at construction.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    board: Board,
    fen: String,
    played: Option<(Move, Transition)>,
    check: bool,
    checkmate: bool,
    legal_moves: LegalMoves,
    san: String,
    quality: Option<MoveQuality>,
    best_next: Option<BestMove>,
}

impl MoveRecord {
    /// Record for a position reached without a move, such as the start of a
    /// game or of a puzzle.
    #[must_use]
    pub fn initial(board: Board) -> Self {
        let to_move = board.side_to_move();
        let legal_moves = board.legal_moves();
        let check = board.is_in_check(to_move);
        let checkmate = check && !board.has_legal_move(to_move);
        MoveRecord {
            fen: board.to_fen(),
            board,
            played: None,
            check,
            checkmate,
            legal_moves,
            san: String::new(),
            quality: None,
            best_next: None,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::initial(Board::try_from_fen(fen)?))
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn fen(&self) -> &str {
        &self.fen
    }

    /// The move that produced this record, `None` at the root
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.played.map(|(mv, _)| mv)
    }

    #[must_use]
    pub fn from(&self) -> Option<Square> {
        self.last_move().map(|mv| mv.from)
    }

    #[must_use]
    pub fn to(&self) -> Option<Square> {
        self.last_move().map(|mv| mv.to)
    }

    /// Color that made the move
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.played.map(|(_, t)| t.color)
    }

    /// Piece type that moved, as it was before any promotion
    #[must_use]
    pub fn piece(&self) -> Option<Piece> {
        self.played.map(|(_, t)| t.piece)
    }

    #[must_use]
    pub fn captured(&self) -> Option<Piece> {
        self.played.and_then(|(_, t)| t.captured)
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }

    #[must_use]
    pub fn is_en_passant(&self) -> bool {
        self.played.is_some_and(|(_, t)| t.en_passant)
    }

    #[must_use]
    pub fn castle(&self) -> Option<CastleSide> {
        self.played.and_then(|(_, t)| t.castle)
    }

    #[must_use]
    pub fn promotion(&self) -> Option<Piece> {
        self.played.and_then(|(_, t)| t.promotion)
    }

    /// True while a pawn stands on its last rank waiting for a promotion choice.
    #[must_use]
    pub fn needs_promotion(&self) -> bool {
        self.played.is_some_and(|(_, t)| t.needs_promotion)
    }

    /// True if the side to move is in check
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.check
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Legal destinations for every occupied square of the resulting position.
    #[must_use]
    pub fn legal_moves(&self) -> &LegalMoves {
        &self.legal_moves
    }

    /// Algebraic notation of the move, empty at the root
    #[must_use]
    pub fn san(&self) -> &str {
        &self.san
    }

    #[must_use]
    pub fn quality(&self) -> Option<MoveQuality> {
        self.quality
    }

    #[must_use]
    pub fn best_next(&self) -> Option<&BestMove> {
        self.best_next.as_ref()
    }

    pub fn set_quality(&mut self, quality: MoveQuality) {
        self.quality = Some(quality);
    }

    /// Attach the analysis engine's recommendation for the position after
    /// this ply.
    pub fn attach_best_move(&mut self, best: BestMove) {
        trace!("best move {} attached after {}", best.mv, self.fen);
        self.best_next = Some(best);
    }

    /// Whether the side to move may play `mv` here.
    ///
    /// A promotion choice is optional for a pawn reaching its last rank and
    /// rejected anywhere else.
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        let to_move = self.board.side_to_move();
        let Some((color, piece)) = self.board.piece_at(mv.from) else {
            return false;
        };
        if color != to_move || !self.legal_moves.contains(mv.from, mv.to) {
            return false;
        }
        match mv.promotion {
            None => true,
            Some(promo) => {
                piece == Piece::Pawn
                    && mv.to.rank() == color.promotion_row()
                    && promo.is_promotion_target()
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        let to_move = self.board.side_to_move();
        let stuck = !self.board.has_legal_move(to_move);
        if stuck && self.check {
            GameStatus::Checkmate
        } else if stuck {
            GameStatus::Stalemate
        } else if self.board.is_fifty_move_draw() {
            GameStatus::FiftyMoveRule
        } else if self.board.position().is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else {
            GameStatus::Ongoing
        }
    }

    /// Pick the promotion piece for a pending promotion by replaying the
    /// move from `prev` with the choice filled in.
    pub fn complete_promotion(&self, prev: &MoveRecord, piece: Piece) -> Result<MoveRecord, MoveError> {
        let Some((mv, _)) = self.played.filter(|(_, t)| t.needs_promotion) else {
            return Err(MoveError::InvalidPromotion {
                char: piece.to_char(),
            });
        };
        if !piece.is_promotion_target() {
            return Err(MoveError::InvalidPromotion {
                char: piece.to_char(),
            });
        }
        try_create_move(prev, Move::with_promotion(mv.from, mv.to, piece))
    }
}

/// Apply `mv` to the position held by `prev` and build the next record.
///
/// The move is assumed legal; use [`try_create_move`] for untrusted input.
///
/// # Panics
/// Panics if `mv.from` is empty in `prev`.
#[must_use]
pub fn create_move(prev: &MoveRecord, mv: Move) -> MoveRecord {
    let before = &prev.board;
    let (board, transition) = before.play(mv);
    let to_move = board.side_to_move();

    let legal_moves = board.legal_moves();
    let check = board.is_in_check(to_move);
    let checkmate = check && !board.has_legal_move(to_move);
    let san = encode_san(before, &prev.legal_moves, mv, &transition, check, checkmate);
    let fen = board.to_fen();
    debug!("{} played {san} -> {fen}", transition.color);

    MoveRecord {
        board,
        fen,
        played: Some((mv, transition)),
        check,
        checkmate,
        legal_moves,
        san,
        quality: None,
        best_next: None,
    }
}

/// Checked form of [`create_move`].
pub fn try_create_move(prev: &MoveRecord, mv: Move) -> Result<MoveRecord, MoveError> {
    if !prev.is_legal(mv) {
        return Err(MoveError::IllegalMove {
            notation: mv.to_string(),
        });
    }
    Ok(create_move(prev, mv))
}
