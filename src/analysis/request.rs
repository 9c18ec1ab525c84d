use std::time::Duration;

use crate::board::{Board, Color, FenError};

/// Upper bound of the UCI `MultiPV` option
pub const MAX_MULTI_PV: u32 = 64;
/// Upper bound of the UCI `Skill Level` option
pub const MAX_SKILL: u8 = 20;

/// How long the engine may search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchLimit {
    Depth(u32),
    MoveTime(Duration),
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit::Depth(18)
    }
}

/// Everything the engine needs to analyse one position.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisRequest {
    fen: String,
    side_to_move: Color,
    pub limit: SearchLimit,
    multi_pv: u32,
    skill: Option<u8>,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(board: &Board) -> Self {
        AnalysisRequest {
            fen: board.to_fen(),
            side_to_move: board.side_to_move(),
            limit: SearchLimit::default(),
            multi_pv: 1,
            skill: None,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::new(&Board::try_from_fen(fen)?))
    }

    #[must_use]
    pub fn with_limit(mut self, limit: SearchLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Number of ranked variations to request, clamped to `1..=MAX_MULTI_PV`.
    #[must_use]
    pub fn with_multi_pv(mut self, lines: u32) -> Self {
        self.multi_pv = lines.clamp(1, MAX_MULTI_PV);
        self
    }

    /// Engine strength knob, clamped to `0..=MAX_SKILL`.
    #[must_use]
    pub fn with_skill(mut self, skill: u8) -> Self {
        self.skill = Some(skill.min(MAX_SKILL));
        self
    }

    #[must_use]
    pub fn fen(&self) -> &str {
        &self.fen
    }

    /// Side the engine's scores are relative to
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn multi_pv(&self) -> u32 {
        self.multi_pv
    }

    #[must_use]
    pub fn skill(&self) -> Option<u8> {
        self.skill
    }

    /// UCI command lines that start this analysis, in sending order.
    #[must_use]
    pub fn to_uci_commands(&self) -> Vec<String> {
        let mut lines = vec![format!("setoption name MultiPV value {}", self.multi_pv)];
        if let Some(skill) = self.skill {
            lines.push(format!("setoption name Skill Level value {skill}"));
        }
        lines.push(format!("position fen {}", self.fen));
        lines.push(match self.limit {
            SearchLimit::Depth(depth) => format!("go depth {depth}"),
            SearchLimit::MoveTime(time) => format!("go movetime {}", time.as_millis()),
        });
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_for_depth_search() {
        let request = AnalysisRequest::new(&Board::new()).with_limit(SearchLimit::Depth(12));
        assert_eq!(
            request.to_uci_commands(),
            vec![
                "setoption name MultiPV value 1".to_string(),
                "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
                "go depth 12".to_string(),
            ]
        );
    }

    #[test]
    fn test_commands_for_timed_search_with_skill() {
        let request = AnalysisRequest::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 0 1")
            .unwrap()
            .with_limit(SearchLimit::MoveTime(Duration::from_millis(1500)))
            .with_multi_pv(3)
            .with_skill(7);
        let lines = request.to_uci_commands();
        assert_eq!(lines[0], "setoption name MultiPV value 3");
        assert_eq!(lines[1], "setoption name Skill Level value 7");
        assert_eq!(lines[3], "go movetime 1500");
        assert_eq!(request.side_to_move(), Color::Black);
    }

    #[test]
    fn test_knobs_are_clamped() {
        let request = AnalysisRequest::new(&Board::new())
            .with_multi_pv(0)
            .with_skill(99);
        assert_eq!(request.multi_pv(), 1);
        assert_eq!(request.skill(), Some(MAX_SKILL));
        assert_eq!(
            AnalysisRequest::new(&Board::new()).with_multi_pv(500).multi_pv(),
            MAX_MULTI_PV
        );
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        assert!(AnalysisRequest::from_fen("not a fen").is_err());
    }
}
