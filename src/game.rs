//! A game as a tree of move records with a cursor.
//!
//! The root holds the starting position. Playing a move from the cursor
//! either follows an existing child with the same move or appends a new one,
//! which becomes a variation when the cursor already had children.

use log::{debug, warn};

use crate::analysis::{AnalysisError, AnalysisRequest, AnalysisResponse};
use crate::board::{
    try_create_move, Board, FenError, GameStatus, Move, MoveError, MoveRecord, Piece,
    SanError, Square, STARTING_FEN,
};
use crate::opening::{is_book_line, match_opening, Opening};
use crate::pgn::PgnTags;
use crate::quality::{MoveQuality, QualityThresholds};
use crate::tree::{HistoryTree, NodeKey};

#[derive(Clone, Debug)]
pub struct Game {
    tree: HistoryTree<MoveRecord>,
    cursor: NodeKey,
    tags: PgnTags,
    thresholds: QualityThresholds,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Game from the standard starting position
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    #[must_use]
    pub fn from_board(board: Board) -> Self {
        let tree = HistoryTree::new(MoveRecord::initial(board));
        let cursor = tree.root();
        Game {
            tree,
            cursor,
            tags: PgnTags::default(),
            thresholds: QualityThresholds::default(),
        }
    }

    /// Game starting from `fen`, with the FEN recorded in the tags.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let board = Board::try_from_fen(fen)?;
        let mut game = Self::from_board(board);
        if game.root_record().fen() != STARTING_FEN {
            game.tags.fen = Some(game.root_record().fen().to_string());
        }
        Ok(game)
    }

    #[must_use]
    pub fn tree(&self) -> &HistoryTree<MoveRecord> {
        &self.tree
    }

    #[must_use]
    pub fn tags(&self) -> &PgnTags {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut PgnTags {
        &mut self.tags
    }

    #[must_use]
    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: QualityThresholds) {
        self.thresholds = thresholds;
    }

    #[must_use]
    pub fn cursor(&self) -> NodeKey {
        self.cursor
    }

    fn record(&self, key: NodeKey) -> &MoveRecord {
        // The cursor and every key handed out by the game stay live until
        // pruned, and pruning moves the cursor out of the removed subtree.
        match self.tree.get(key) {
            Some(record) => record,
            None => self.root_record(),
        }
    }

    fn root_record(&self) -> &MoveRecord {
        let root = self.tree.root();
        self.tree
            .get(root)
            .unwrap_or_else(|| unreachable!("history tree lost its root"))
    }

    /// Record at the cursor
    #[must_use]
    pub fn current(&self) -> &MoveRecord {
        self.record(self.cursor)
    }

    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&MoveRecord> {
        self.tree.get(key)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.current().board()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.current().status()
    }

    /// Play `mv` from the cursor and move the cursor onto it.
    ///
    /// Replaying a move that already exists below the cursor reuses that node.
    /// Nothing can be played after a promotion whose piece is still open.
    pub fn play(&mut self, mv: Move) -> Result<NodeKey, MoveError> {
        let parent = self.cursor;
        if self.current().needs_promotion() {
            return Err(MoveError::PromotionPending {
                notation: self.current().san().to_string(),
            });
        }
        let existing = self
            .tree
            .children(parent)
            .iter()
            .copied()
            .find(|&child| self.record(child).last_move() == Some(mv));
        if let Some(child) = existing {
            self.cursor = child;
            return Ok(child);
        }

        let record = try_create_move(self.record(parent), mv)?;
        let siblings = self.tree.children(parent).len();
        let key = self
            .tree
            .insert(parent, record)
            .ok_or_else(|| MoveError::IllegalMove {
                notation: mv.to_string(),
            })?;
        if siblings > 0 {
            debug!("variation {key} created at {parent} with {mv}");
        }
        self.cursor = key;
        Ok(key)
    }

    /// Play a move given by origin and destination squares
    pub fn play_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<NodeKey, MoveError> {
        self.play(Move { from, to, promotion })
    }

    pub fn play_san(&mut self, san: &str) -> Result<NodeKey, SanError> {
        let mv = self.board().parse_san(san)?;
        self.play(mv).map_err(|source| SanError::Rejected {
            san: san.to_string(),
            source,
        })
    }

    /// Play a move in long algebraic form, e.g. `e2e4` or `e7e8q`
    pub fn play_uci(&mut self, uci: &str) -> Result<NodeKey, MoveError> {
        self.play(Move::from_uci(uci)?)
    }

    /// Fill in the promotion piece for the pending promotion at the cursor.
    ///
    /// Refused once moves have been added after it, since they were played
    /// from the unpromoted board.
    pub fn complete_promotion(&mut self, piece: Piece) -> Result<(), MoveError> {
        if !self.tree.children(self.cursor).is_empty() {
            return Err(MoveError::PromotionHasContinuation {
                notation: self.current().san().to_string(),
            });
        }
        let parent = self
            .tree
            .parent(self.cursor)
            .ok_or(MoveError::InvalidPromotion {
                char: piece.to_char(),
            })?;
        let completed = self.current().complete_promotion(self.record(parent), piece)?;
        if let Some(slot) = self.tree.get_mut(self.cursor) {
            *slot = completed;
        }
        Ok(())
    }

    /// Move the cursor to its parent. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        match self.tree.parent(self.cursor) {
            Some(parent) => {
                self.cursor = parent;
                true
            }
            None => false,
        }
    }

    /// Follow the main line one ply. Returns `false` at a leaf.
    pub fn forward(&mut self) -> bool {
        match self.tree.children(self.cursor).first() {
            Some(&child) => {
                self.cursor = child;
                true
            }
            None => false,
        }
    }

    pub fn goto(&mut self, key: NodeKey) -> bool {
        let live = self.tree.contains(key);
        if live {
            self.cursor = key;
        }
        live
    }

    pub fn to_start(&mut self) {
        self.cursor = self.tree.root();
    }

    /// Follow the main line from the cursor to its end
    pub fn to_end(&mut self) {
        if let Some(last) = self.tree.leftmost(self.cursor).last() {
            self.cursor = last;
        }
    }

    /// Alternatives to the move at `key`, i.e. its siblings
    #[must_use]
    pub fn variations(&self, key: NodeKey) -> Vec<NodeKey> {
        self.tree
            .parent(key)
            .map(|parent| {
                self.tree
                    .children(parent)
                    .iter()
                    .copied()
                    .filter(|&k| k != key)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Make the move at `key` the main continuation of its parent.
    pub fn promote_variation(&mut self, key: NodeKey) -> bool {
        let promoted = self.tree.promote(key);
        if promoted {
            debug!("variation {key} promoted to main line");
        }
        promoted
    }

    /// Remove the move at `key` with everything after it.
    ///
    /// A cursor inside the removed subtree moves to `key`'s parent. The root
    /// cannot be pruned.
    pub fn prune(&mut self, key: NodeKey) -> Option<MoveRecord> {
        let parent = self.tree.parent(key)?;
        let cursor_inside = self.cursor == key || self.tree.ancestors(self.cursor).any(|k| k == key);
        let removed = self.tree.remove(key)?;
        if cursor_inside {
            self.cursor = parent;
        }
        debug!("pruned {key} ({})", removed.san());
        Some(removed)
    }

    /// Keys of the main line from the root, root excluded
    #[must_use]
    pub fn main_line(&self) -> Vec<NodeKey> {
        self.tree.leftmost(self.tree.root()).skip(1).collect()
    }

    /// Number of plies in the main line
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.main_line().len()
    }

    /// Keys from the first move down to `key`
    #[must_use]
    pub fn line_to(&self, key: NodeKey) -> Vec<NodeKey> {
        self.tree.path_to(key).into_iter().skip(1).collect()
    }

    /// SAN of every move from the first one down to `key`
    #[must_use]
    pub fn san_line(&self, key: NodeKey) -> Vec<&str> {
        self.line_to(key)
            .into_iter()
            .map(|k| self.record(k).san())
            .collect()
    }

    fn starts_from_initial_position(&self) -> bool {
        self.root_record().fen() == STARTING_FEN
    }

    /// Opening reached at the cursor
    #[must_use]
    pub fn opening(&self) -> Option<&'static Opening> {
        if !self.starts_from_initial_position() {
            return None;
        }
        match_opening(&self.san_line(self.cursor))
    }

    /// Request analysis of the position at the cursor.
    #[must_use]
    pub fn analysis_request(&self) -> AnalysisRequest {
        AnalysisRequest::new(self.board())
    }

    /// Attach a completed analysis of the position at `key`.
    ///
    /// The best move is stored on the record at `key`, and the move that led
    /// to `key` is marked against its parent's recommendation. A best move
    /// that is illegal in the analysed position is rejected without touching
    /// the game.
    pub fn apply_analysis(
        &mut self,
        key: NodeKey,
        response: &AnalysisResponse,
    ) -> Result<Option<MoveQuality>, AnalysisError> {
        let record = self.tree.get(key).ok_or(AnalysisError::UnknownNode { key })?;
        if !record.is_legal(response.best_move) {
            warn!(
                "engine best move {} is illegal in {}",
                response.best_move,
                record.fen()
            );
            return Err(AnalysisError::InvalidMove(MoveError::IllegalMove {
                notation: response.best_move.to_string(),
            }));
        }

        let quality = self.classify(key, response);
        if let Some(record) = self.tree.get_mut(key) {
            if let Some(best) = response.best() {
                record.attach_best_move(best);
            }
            if let Some(quality) = quality {
                record.set_quality(quality);
            }
        }
        Ok(quality)
    }

    fn classify(&self, key: NodeKey, response: &AnalysisResponse) -> Option<MoveQuality> {
        let parent = self.tree.parent(key)?;
        let played = self.record(key).last_move()?;
        let in_book = self.starts_from_initial_position() && is_book_line(&self.san_line(key));
        self.thresholds.classify(
            in_book,
            self.record(parent).best_next(),
            played,
            response.top().map(|v| v.score),
        )
    }
}
