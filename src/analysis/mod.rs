//! Data exchanged with an external UCI analysis engine.
//!
//! The crate never runs the engine. It builds the command lines for a
//! request, parses the engine's `info`/`bestmove` output into an
//! [`AnalysisResponse`], and tracks which request is current through an
//! [`AnalysisSession`] so stale completions are dropped.

use std::fmt;

use crate::board::{Color, FenError, Move, MoveError};
use crate::tree::NodeKey;

mod info;
mod request;
mod session;

pub use info::{parse_bestmove, parse_info, InfoCollector};
pub use request::{AnalysisRequest, SearchLimit, MAX_MULTI_PV, MAX_SKILL};
pub use session::{AnalysisSession, Ticket};

/// Value added to a mate distance so forced mates outrank any material score.
pub const MATE_SCORE_PAWNS: f64 = 100.0;

/// Error type for analysis requests and engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Request position is not a valid FEN
    InvalidFen(FenError),
    /// Line does not start with the expected keyword
    UnexpectedLine { line: String },
    /// A keyword is missing its value
    MissingValue { keyword: &'static str },
    /// A numeric field does not parse
    InvalidNumber { token: String },
    /// A move token is not in long algebraic form
    InvalidMove(MoveError),
    /// The engine reported no move at all
    NoBestMove,
    /// The completion belongs to a request that was superseded or cancelled
    Stale { id: u64 },
    /// The analysed node is not in the game tree
    UnknownNode { key: NodeKey },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidFen(err) => write!(f, "Invalid analysis position: {err}"),
            AnalysisError::UnexpectedLine { line } => {
                write!(f, "Unexpected engine output '{line}'")
            }
            AnalysisError::MissingValue { keyword } => {
                write!(f, "Missing value after '{keyword}'")
            }
            AnalysisError::InvalidNumber { token } => {
                write!(f, "Invalid number '{token}' in engine output")
            }
            AnalysisError::InvalidMove(err) => write!(f, "Invalid engine move: {err}"),
            AnalysisError::NoBestMove => write!(f, "Engine returned no best move"),
            AnalysisError::Stale { id } => write!(f, "Analysis request {id} is no longer current"),
            AnalysisError::UnknownNode { key } => write!(f, "No move {key} in the game tree"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<FenError> for AnalysisError {
    fn from(err: FenError) -> Self {
        AnalysisError::InvalidFen(err)
    }
}

impl From<MoveError> for AnalysisError {
    fn from(err: MoveError) -> Self {
        AnalysisError::InvalidMove(err)
    }
}

/// Engine evaluation from White's point of view.
///
/// `Mate(n)` with `n > 0` means White mates in `n`; `n < 0` means Black does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

impl Score {
    /// Convert a score reported for `side_to_move` into White's point of view.
    #[must_use]
    pub fn from_side(score: Score, side_to_move: Color) -> Score {
        match side_to_move {
            Color::White => score,
            Color::Black => score.flipped(),
        }
    }

    #[must_use]
    pub fn flipped(self) -> Score {
        match self {
            Score::Centipawns(cp) => Score::Centipawns(-cp),
            Score::Mate(n) => Score::Mate(-n),
        }
    }

    /// Score in pawns. Forced mates map to a large finite value
    /// (`MATE_SCORE_PAWNS + n`) so they stay comparable with material scores.
    #[must_use]
    pub fn pawns(self) -> f64 {
        match self {
            Score::Centipawns(cp) => f64::from(cp) / 100.0,
            Score::Mate(n) => f64::from(n.signum()) * (MATE_SCORE_PAWNS + f64::from(n.abs())),
        }
    }

    #[must_use]
    pub fn mate_distance(self) -> Option<i32> {
        match self {
            Score::Mate(n) => Some(n),
            Score::Centipawns(_) => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Score::Centipawns(cp) => write!(f, "{:+.2}", f64::from(cp) / 100.0),
            Score::Mate(n) if n < 0 => write!(f, "-M{}", -n),
            Score::Mate(n) => write!(f, "M{n}"),
        }
    }
}

/// The engine's recommended move for a position, with its evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestMove {
    pub mv: Move,
    pub score: Score,
}

impl BestMove {
    #[must_use]
    pub fn mate_distance(&self) -> Option<i32> {
        self.score.mate_distance()
    }
}

/// One ranked principal variation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variation {
    /// 1-based rank (`multipv`)
    pub rank: u32,
    pub depth: u32,
    pub score: Score,
    pub moves: Vec<Move>,
}

/// Completed analysis of one position.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisResponse {
    pub best_move: Move,
    pub ponder: Option<Move>,
    /// Sorted by rank, best first
    pub variations: Vec<Variation>,
}

impl AnalysisResponse {
    #[must_use]
    pub fn top(&self) -> Option<&Variation> {
        self.variations.first()
    }

    /// Best move paired with the top variation's score.
    #[must_use]
    pub fn best(&self) -> Option<BestMove> {
        self.top().map(|v| BestMove {
            mv: self.best_move,
            score: v.score,
        })
    }

    #[must_use]
    pub fn mate_distance(&self) -> Option<i32> {
        self.top().and_then(|v| v.score.mate_distance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_from_side() {
        let score = Score::Centipawns(35);
        assert_eq!(Score::from_side(score, Color::White), Score::Centipawns(35));
        assert_eq!(Score::from_side(score, Color::Black), Score::Centipawns(-35));
        assert_eq!(Score::from_side(Score::Mate(2), Color::Black), Score::Mate(-2));
    }

    #[test]
    fn test_mate_outranks_material() {
        assert!(Score::Mate(5).pawns() > Score::Centipawns(3000).pawns());
        assert!(Score::Mate(-5).pawns() < Score::Centipawns(-3000).pawns());
        assert_eq!(Score::Mate(3).pawns(), 103.0);
        assert_eq!(Score::Mate(-3).pawns(), -103.0);
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::Centipawns(30).to_string(), "+0.30");
        assert_eq!(Score::Centipawns(-125).to_string(), "-1.25");
        assert_eq!(Score::Mate(4).to_string(), "M4");
        assert_eq!(Score::Mate(-2).to_string(), "-M2");
    }

    #[test]
    fn test_response_best_uses_top_variation() {
        let e2e4 = Move::from_uci("e2e4").unwrap();
        let response = AnalysisResponse {
            best_move: e2e4,
            ponder: None,
            variations: vec![Variation {
                rank: 1,
                depth: 12,
                score: Score::Mate(3),
                moves: vec![e2e4],
            }],
        };
        let best = response.best().unwrap();
        assert_eq!(best.mv, e2e4);
        assert_eq!(best.mate_distance(), Some(3));
        assert_eq!(response.mate_distance(), Some(3));
    }
}
