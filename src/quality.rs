//! Move quality marks derived from engine evaluations.

use std::fmt;

use crate::analysis::{BestMove, Score};
use crate::board::Move;

/// Quality mark for a played move, best to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveQuality {
    Book,
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveQuality {
    /// Conventional annotation glyph, if the mark has one
    #[must_use]
    pub const fn glyph(self) -> Option<&'static str> {
        match self {
            MoveQuality::Best => Some("!!"),
            MoveQuality::Excellent => Some("!"),
            MoveQuality::Inaccuracy => Some("?!"),
            MoveQuality::Mistake => Some("?"),
            MoveQuality::Blunder => Some("??"),
            MoveQuality::Book | MoveQuality::Good => None,
        }
    }
}

impl fmt::Display for MoveQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveQuality::Book => "book",
            MoveQuality::Best => "best",
            MoveQuality::Excellent => "excellent",
            MoveQuality::Good => "good",
            MoveQuality::Inaccuracy => "inaccuracy",
            MoveQuality::Mistake => "mistake",
            MoveQuality::Blunder => "blunder",
        };
        f.write_str(name)
    }
}

/// Upper bounds (exclusive, in pawns) of the evaluation-loss buckets.
///
/// Deserializing goes through the same ordering check as [`QualityThresholds::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QualityThresholds {
    excellent: f64,
    good: f64,
    inaccuracy: f64,
    mistake: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        QualityThresholds {
            excellent: 0.7,
            good: 1.0,
            inaccuracy: 1.5,
            mistake: 2.0,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QualityThresholds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Bounds {
            excellent: f64,
            good: f64,
            inaccuracy: f64,
            mistake: f64,
        }

        let b = Bounds::deserialize(deserializer)?;
        QualityThresholds::new(b.excellent, b.good, b.inaccuracy, b.mistake).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "thresholds must satisfy 0 < excellent < good < inaccuracy < mistake, got {} {} {} {}",
                b.excellent, b.good, b.inaccuracy, b.mistake
            ))
        })
    }
}

impl QualityThresholds {
    /// Returns `None` unless `0 < excellent < good < inaccuracy < mistake`.
    #[must_use]
    pub fn new(excellent: f64, good: f64, inaccuracy: f64, mistake: f64) -> Option<Self> {
        let ordered = 0.0 < excellent && excellent < good && good < inaccuracy && inaccuracy < mistake;
        (ordered && mistake.is_finite()).then_some(QualityThresholds {
            excellent,
            good,
            inaccuracy,
            mistake,
        })
    }

    /// Bucket an absolute evaluation change measured in pawns.
    #[must_use]
    pub fn bucket(&self, delta: f64) -> MoveQuality {
        let delta = delta.abs();
        if delta < self.excellent {
            MoveQuality::Excellent
        } else if delta < self.good {
            MoveQuality::Good
        } else if delta < self.inaccuracy {
            MoveQuality::Inaccuracy
        } else if delta < self.mistake {
            MoveQuality::Mistake
        } else {
            MoveQuality::Blunder
        }
    }

    /// Classify `played` against the previous position's recommendation.
    ///
    /// `in_book` wins over everything. Otherwise the move is `Best` when it
    /// matches the recommendation, and bucketed by the change between the
    /// recommended evaluation and `current_top` (the top line after the move)
    /// when it does not. Returns `None` when the evaluations needed for that
    /// comparison are missing.
    #[must_use]
    pub fn classify(
        &self,
        in_book: bool,
        previous_best: Option<&BestMove>,
        played: Move,
        current_top: Option<Score>,
    ) -> Option<MoveQuality> {
        if in_book {
            return Some(MoveQuality::Book);
        }
        let best = previous_best?;
        if best.mv == played {
            return Some(MoveQuality::Best);
        }
        let current = current_top?;
        Some(self.bucket(best.score.pawns() - current.pawns()))
    }
}
