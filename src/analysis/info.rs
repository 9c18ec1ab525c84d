use std::collections::BTreeMap;

use log::{trace, warn};

use super::{AnalysisError, AnalysisResponse, Score, Variation};
use crate::board::{Color, Move};

fn number<T: std::str::FromStr>(
    tokens: &mut std::slice::Iter<'_, &str>,
    keyword: &'static str,
) -> Result<T, AnalysisError> {
    let token = tokens.next().ok_or(AnalysisError::MissingValue { keyword })?;
    token.parse().map_err(|_| AnalysisError::InvalidNumber {
        token: (*token).to_string(),
    })
}

/// Parse one `info` line into a variation scored from White's point of view.
///
/// Lines that carry no scored principal variation (`currmove` updates,
/// `info string`, a `mate 0` report on a finished game) yield `Ok(None)`.
pub fn parse_info(line: &str, side_to_move: Color) -> Result<Option<Variation>, AnalysisError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.first() != Some(&"info") {
        return Err(AnalysisError::UnexpectedLine {
            line: line.trim().to_string(),
        });
    }

    let mut depth = 0;
    let mut rank = 1;
    let mut score = None;
    let mut moves = Vec::new();

    let mut tokens = parts[1..].iter();
    while let Some(&keyword) = tokens.next() {
        match keyword {
            "depth" => depth = number(&mut tokens, "depth")?,
            "multipv" => rank = number(&mut tokens, "multipv")?,
            "score" => {
                let kind = tokens.next().ok_or(AnalysisError::MissingValue { keyword: "score" })?;
                score = Some(match *kind {
                    "cp" => Score::Centipawns(number(&mut tokens, "cp")?),
                    "mate" => match number(&mut tokens, "mate")? {
                        0 => return Ok(None),
                        n => Score::Mate(n),
                    },
                    other => {
                        return Err(AnalysisError::UnexpectedLine {
                            line: format!("score {other}"),
                        })
                    }
                });
            }
            "seldepth" | "time" | "nodes" | "nps" | "hashfull" | "tbhits" | "cpuload"
            | "currmovenumber" => {
                number::<u64>(&mut tokens, "info field")?;
            }
            "wdl" => {
                for _ in 0..3 {
                    number::<u32>(&mut tokens, "wdl")?;
                }
            }
            "currmove" => {
                tokens.next();
            }
            "string" => return Ok(None),
            "pv" => {
                for token in tokens.by_ref() {
                    moves.push(Move::from_uci(token)?);
                }
            }
            // lowerbound, upperbound and fields added by newer engines
            _ => {}
        }
    }

    match score {
        Some(score) if !moves.is_empty() && rank >= 1 => Ok(Some(Variation {
            rank,
            depth,
            score: Score::from_side(score, side_to_move),
            moves,
        })),
        _ => Ok(None),
    }
}

/// Parse `bestmove <move> [ponder <move>]`.
pub fn parse_bestmove(line: &str) -> Result<(Move, Option<Move>), AnalysisError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["bestmove", "(none)", ..] | ["bestmove", "0000", ..] => Err(AnalysisError::NoBestMove),
        ["bestmove", best] => Ok((Move::from_uci(best)?, None)),
        ["bestmove", best, "ponder", ponder] => {
            Ok((Move::from_uci(best)?, Some(Move::from_uci(ponder)?)))
        }
        ["bestmove"] => Err(AnalysisError::MissingValue {
            keyword: "bestmove",
        }),
        _ => Err(AnalysisError::UnexpectedLine {
            line: line.trim().to_string(),
        }),
    }
}

/// Accumulates engine output for one request until `bestmove` arrives.
///
/// Malformed lines are logged and skipped, so a bad update never replaces a
/// good one.
#[derive(Debug)]
pub struct InfoCollector {
    side_to_move: Color,
    variations: BTreeMap<u32, Variation>,
}

impl InfoCollector {
    #[must_use]
    pub fn new(side_to_move: Color) -> Self {
        InfoCollector {
            side_to_move,
            variations: BTreeMap::new(),
        }
    }

    /// Feed one line of engine output. Returns the response once the engine
    /// reports its best move.
    pub fn feed(&mut self, line: &str) -> Option<AnalysisResponse> {
        let keyword = line.split_whitespace().next()?;
        match keyword {
            "info" => match parse_info(line, self.side_to_move) {
                Ok(Some(variation)) => self.record(variation),
                Ok(None) => {}
                Err(err) => warn!("ignoring engine line '{}': {err}", line.trim()),
            },
            "bestmove" => match parse_bestmove(line) {
                Ok((best_move, ponder)) => {
                    let variations = std::mem::take(&mut self.variations).into_values().collect();
                    return Some(AnalysisResponse {
                        best_move,
                        ponder,
                        variations,
                    });
                }
                Err(err) => warn!("ignoring engine line '{}': {err}", line.trim()),
            },
            _ => trace!("skipping engine line '{}'", line.trim()),
        }
        None
    }

    fn record(&mut self, variation: Variation) {
        // A deeper first line starts a new iteration; lower ranks from the
        // previous depth are dropped until they are reported again.
        if variation.rank == 1 {
            let depth = variation.depth;
            self.variations.retain(|_, v| v.depth >= depth);
        }
        self.variations.insert(variation.rank, variation);
    }
}
