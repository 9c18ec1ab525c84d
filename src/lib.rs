pub mod analysis;
pub mod board;
pub mod game;
pub mod opening;
pub mod pgn;
pub mod quality;
pub mod sync;
pub mod tree;

pub use analysis::{AnalysisRequest, AnalysisResponse, AnalysisSession, BestMove, Score};
pub use board::{create_move, Board, Color, GameStatus, Move, MoveRecord, Piece, Square};
pub use game::Game;
pub use opening::{match_opening, Opening};
pub use pgn::PgnTags;
pub use quality::{MoveQuality, QualityThresholds};
pub use tree::{HistoryTree, NodeKey};
