//! Opening identification against a static ECO table.
//!
//! The table is embedded at compile time and parsed on first use. Lines are
//! matched token by token in SAN, so move numbers and check markers in the
//! played text do not matter.

use log::warn;
use once_cell::sync::Lazy;

const ECO_TABLE: &str = include_str!("eco.tsv");

static OPENINGS: Lazy<Vec<Opening>> = Lazy::new(|| {
    ECO_TABLE
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = Opening::parse_row(line);
            if parsed.is_none() {
                warn!("skipping malformed opening row '{line}'");
            }
            parsed
        })
        .collect()
});

/// One named opening line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Opening {
    pub eco: &'static str,
    pub name: &'static str,
    moves: Vec<&'static str>,
}

impl Opening {
    fn parse_row(row: &'static str) -> Option<Opening> {
        let mut fields = row.split('\t');
        let eco = fields.next()?.trim();
        let name = fields.next()?.trim();
        let moves: Vec<&'static str> = san_tokens(fields.next()?).collect();
        if eco.is_empty() || name.is_empty() || moves.is_empty() || fields.next().is_some() {
            return None;
        }
        Some(Opening { eco, name, moves })
    }

    /// The line's moves in SAN, without move numbers
    #[must_use]
    pub fn moves(&self) -> &[&'static str] {
        &self.moves
    }

    /// The line as numbered movetext, e.g. `1. e4 e5 2. Nf3`
    #[must_use]
    pub fn movetext(&self) -> String {
        let mut text = String::new();
        for (ply, san) in self.moves.iter().enumerate() {
            if !text.is_empty() {
                text.push(' ');
            }
            if ply % 2 == 0 {
                text.push_str(&format!("{}. ", ply / 2 + 1));
            }
            text.push_str(san);
        }
        text
    }
}

/// Every opening in the table, in table order.
#[must_use]
pub fn openings() -> &'static [Opening] {
    &OPENINGS
}

/// Split movetext into SAN tokens, dropping move numbers such as `3.` or
/// `3...` whether or not they are attached to the move.
pub fn san_tokens(movetext: &str) -> impl Iterator<Item = &str> {
    movetext
        .split_whitespace()
        .map(|token| token.rfind('.').map_or(token, |dot| &token[dot + 1..]))
        .filter(|token| !token.is_empty())
}

fn same_move(played: &str, book: &str) -> bool {
    played.trim_end_matches(['+', '#', '!', '?']) == book
}

fn follows<S: AsRef<str>>(played: &[S], book: &[&str]) -> bool {
    played.len() <= book.len()
        && played
            .iter()
            .zip(book)
            .all(|(p, b)| same_move(p.as_ref(), b))
}

/// Longest table line that the played moves start with.
///
/// Ties go to the line listed first. `None` when no line matches.
#[must_use]
pub fn match_opening<S: AsRef<str>>(played: &[S]) -> Option<&'static Opening> {
    longest_match(openings(), played)
}

fn longest_match<'a, S: AsRef<str>>(table: &'a [Opening], played: &[S]) -> Option<&'a Opening> {
    let mut best: Option<&'a Opening> = None;
    for opening in table {
        let len = opening.moves.len();
        let is_prefix = len <= played.len() && follows(&played[..len], &opening.moves);
        if is_prefix && best.map_or(true, |b| len > b.moves.len()) {
            best = Some(opening);
        }
    }
    best
}

/// [`match_opening`] for numbered movetext such as `1. e4 e5 2. Nf3`.
#[must_use]
pub fn match_movetext(movetext: &str) -> Option<&'static Opening> {
    let played: Vec<&str> = san_tokens(movetext).collect();
    match_opening(&played)
}

/// True while the played moves are still on some table line.
#[must_use]
pub fn is_book_line<S: AsRef<str>>(played: &[S]) -> bool {
    !played.is_empty() && openings().iter().any(|o| follows(played, &o.moves))
}
