//! Portable Game Notation: tag block and movetext.
//!
//! Export writes the whole tree, siblings of a main-line move becoming
//! parenthesised variations right after it. Import accepts nested variations
//! and skips comments, numeric annotation glyphs and `!`/`?` suffixes.

use std::fmt::Write as _;

use log::debug;

use crate::board::{Color, PgnError, STARTING_FEN};
use crate::game::Game;
use crate::tree::NodeKey;

/// The seven standard tags plus the fields used for puzzles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PgnTags {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
    /// Starting position when it is not the standard one
    pub fen: Option<String>,
    /// Move number the movetext starts at, for puzzles
    pub first_move: Option<u32>,
    pub solution: Option<String>,
}

impl Default for PgnTags {
    fn default() -> Self {
        PgnTags {
            event: "?".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "?".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
            result: "*".to_string(),
            fen: None,
            first_move: None,
            solution: None,
        }
    }
}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

/// Split one `[Name "Value"]` line into its name and unescaped value.
fn parse_tag_line(line: &str) -> Result<(String, String), PgnError> {
    let malformed = || PgnError::MalformedTag {
        line: line.to_string(),
    };
    let inner = line
        .trim()
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(malformed)?
        .trim();
    let (name, rest) = inner.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let value = rest
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(malformed)?;
    Ok((name.to_string(), unescape(value)))
}

impl PgnTags {
    /// Parse a tag block. Unknown names are ignored and known names match
    /// case-insensitively.
    pub fn parse(block: &str) -> Result<Self, PgnError> {
        let mut tags = PgnTags::default();
        for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (name, value) = parse_tag_line(line)?;
            match name.to_ascii_lowercase().as_str() {
                "event" => tags.event = value,
                "site" => tags.site = value,
                "date" => tags.date = value,
                "round" => tags.round = value,
                "white" => tags.white = value,
                "black" => tags.black = value,
                "result" => tags.result = value,
                "fen" => tags.fen = Some(value),
                "firstmove" => {
                    tags.first_move = Some(value.trim().parse().map_err(|_| {
                        PgnError::MalformedTag {
                            line: line.to_string(),
                        }
                    })?);
                }
                "solution" => tags.solution = Some(value),
                _ => debug!("ignoring PGN tag {name}"),
            }
        }
        Ok(tags)
    }

    /// Tag block in canonical order, one tag per line.
    #[must_use]
    pub fn to_block(&self) -> String {
        let mut out = String::new();
        let mut tag = |name: &str, value: &str| {
            let _ = writeln!(out, "[{name} \"{}\"]", escape(value));
        };
        tag("Event", &self.event);
        tag("Site", &self.site);
        tag("Date", &self.date);
        tag("Round", &self.round);
        tag("White", &self.white);
        tag("Black", &self.black);
        tag("Result", &self.result);
        if let Some(fen) = &self.fen {
            tag("SetUp", "1");
            tag("FEN", fen);
        }
        if let Some(first_move) = self.first_move {
            tag("FirstMove", &first_move.to_string());
        }
        if let Some(solution) = &self.solution {
            tag("Solution", solution);
        }
        out
    }
}

/// Split PGN text into its tag block and movetext.
fn split_sections(text: &str) -> (String, String) {
    let mut tags = String::new();
    let mut movetext = String::new();
    let mut in_tags = true;
    for line in text.lines() {
        let trimmed = line.trim();
        if in_tags && trimmed.starts_with('[') {
            tags.push_str(trimmed);
            tags.push('\n');
        } else if in_tags && trimmed.is_empty() {
            continue;
        } else {
            in_tags = false;
            movetext.push_str(line);
            movetext.push('\n');
        }
    }
    (tags, movetext)
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Move(&'a str),
    Open,
    Close,
    Result(&'a str),
}

fn tokenize(movetext: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = movetext.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                while i < bytes.len() && bytes[i] != b'}' {
                    i += 1;
                }
                i += 1;
            }
            b';' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'(' | b')' | b'{' | b';')
                {
                    i += 1;
                }
                let word = &movetext[start..i];
                if RESULTS.contains(&word) {
                    tokens.push(Token::Result(word));
                    continue;
                }
                if word.starts_with('$') {
                    continue;
                }
                let san = word
                    .rfind('.')
                    .map_or(word, |dot| &word[dot + 1..])
                    .trim_end_matches(['!', '?']);
                if !san.is_empty() {
                    tokens.push(Token::Move(san));
                }
            }
        }
    }
    tokens
}

/// Read a single game, variations included. The cursor is left at the end
/// of the main line.
pub fn read_game(text: &str) -> Result<Game, PgnError> {
    let (tag_block, movetext) = split_sections(text);
    let tags = PgnTags::parse(&tag_block)?;
    let mut game = Game::from_fen(tags.fen.as_deref().unwrap_or(STARTING_FEN))?;
    let result = tags.result.clone();
    *game.tags_mut() = tags;

    // (cursor to return to, last move at that level)
    let mut stack: Vec<(NodeKey, Option<NodeKey>)> = Vec::new();
    let mut last: Option<NodeKey> = None;
    let mut ply = 0;

    for token in tokenize(&movetext) {
        match token {
            Token::Move(san) => {
                ply += 1;
                let key = game.play_san(san).map_err(|source| PgnError::InvalidMove {
                    ply,
                    san: san.to_string(),
                    source,
                })?;
                last = Some(key);
            }
            Token::Open => {
                let branch = last.ok_or(PgnError::OrphanVariation)?;
                let parent = game.tree().parent(branch).ok_or(PgnError::OrphanVariation)?;
                stack.push((game.cursor(), last));
                game.goto(parent);
                last = None;
            }
            Token::Close => {
                let (cursor, outer_last) = stack.pop().ok_or(PgnError::UnbalancedVariation)?;
                game.goto(cursor);
                last = outer_last;
            }
            Token::Result(token) => {
                if result == "*" && token != "*" {
                    game.tags_mut().result = token.to_string();
                }
            }
        }
    }
    if !stack.is_empty() {
        return Err(PgnError::UnbalancedVariation);
    }

    game.to_start();
    game.to_end();
    Ok(game)
}

fn push_move(game: &Game, key: NodeKey, force_number: bool, out: &mut Vec<String>) {
    let Some(record) = game.get(key) else {
        return;
    };
    let fullmove = record.board().fullmove_number();
    match record.color() {
        Some(Color::White) => out.push(format!("{fullmove}.")),
        Some(Color::Black) if force_number => out.push(format!("{}...", fullmove.saturating_sub(1))),
        _ => {}
    }
    out.push(record.san().to_string());
}

fn push_line(game: &Game, from: NodeKey, mut force_number: bool, out: &mut Vec<String>) {
    let mut parent = from;
    while let Some((&main, alternatives)) = game.tree().children(parent).split_first() {
        push_move(game, main, force_number, out);
        force_number = false;
        for &alt in alternatives {
            out.push("(".to_string());
            push_move(game, alt, true, out);
            push_line(game, alt, false, out);
            out.push(")".to_string());
            force_number = true;
        }
        parent = main;
    }
}

/// Movetext of the whole tree followed by the result token.
#[must_use]
pub fn write_movetext(game: &Game) -> String {
    let mut tokens = Vec::new();
    push_line(game, game.tree().root(), true, &mut tokens);
    tokens.push(game.tags().result.clone());
    tokens.join(" ").replace("( ", "(").replace(" )", ")")
}

/// Full PGN: tag block, blank line, movetext.
#[must_use]
pub fn write_game(game: &Game) -> String {
    format!("{}\n{}\n", game.tags().to_block(), write_movetext(game))
}

impl Game {
    pub fn from_pgn(text: &str) -> Result<Game, PgnError> {
        read_game(text)
    }

    #[must_use]
    pub fn to_pgn(&self) -> String {
        write_game(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SanError;

    #[test]
    fn test_tags_parse_case_insensitive_and_ignore_unknown() {
        let block = "[event \"Casual\"]\n[WHITE \"Anderssen\"]\n[ECO \"C51\"]\n[Black \"Dufresne\"]";
        let tags = PgnTags::parse(block).unwrap();
        assert_eq!(tags.event, "Casual");
        assert_eq!(tags.white, "Anderssen");
        assert_eq!(tags.black, "Dufresne");
        assert_eq!(tags.result, "*");
    }

    #[test]
    fn test_tags_round_trip_with_escapes() {
        let mut tags = PgnTags::default();
        tags.event = "The \"Immortal\" Game".to_string();
        tags.fen = Some("4k3/8/8/8/8/8/8/4K2R w K - 0 1".to_string());
        tags.first_move = Some(12);
        tags.solution = Some("Rh8+".to_string());
        let block = tags.to_block();
        assert!(block.contains("[SetUp \"1\"]"));
        assert_eq!(PgnTags::parse(&block).unwrap(), tags);
    }

    #[test]
    fn test_malformed_tag() {
        assert!(matches!(
            PgnTags::parse("[Event Casual]"),
            Err(PgnError::MalformedTag { .. })
        ));
        assert!(PgnTags::parse("[FirstMove \"twelve\"]").is_err());
    }

    #[test]
    fn test_tokenizer_skips_annotations() {
        let tokens = tokenize("1. e4 {best by test} e5?! $1 2.Nf3 ; rest of line\n(2. f4) 1-0");
        assert_eq!(
            tokens,
            vec![
                Token::Move("e4"),
                Token::Move("e5"),
                Token::Move("Nf3"),
                Token::Open,
                Token::Move("f4"),
                Token::Close,
                Token::Result("1-0"),
            ]
        );
    }

    #[test]
    fn test_export_numbers_and_variations() {
        let mut game = Game::new();
        game.play_san("e4").unwrap();
        game.play_san("e5").unwrap();
        game.play_san("Nf3").unwrap();
        game.back();
        game.play_san("f4").unwrap();
        game.back();
        game.back();
        game.play_san("c5").unwrap();

        assert_eq!(
            write_movetext(&game),
            "1. e4 e5 (1... c5) 2. Nf3 (2. f4) *"
        );
    }

    #[test]
    fn test_export_black_to_move_start() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4p3/K7 b - - 0 40").unwrap();
        game.play_san("Kd7").unwrap();
        game.play_san("Kb2").unwrap();
        assert_eq!(write_movetext(&game), "40... Kd7 41. Kb2 *");
    }

    #[test]
    fn test_import_nested_variations() {
        let text = "[Event \"Test\"]\n[Result \"1-0\"]\n\n\
                    1. e4 e5 (1... c5 2. Nf3 (2. c3 d5) 2... d6) 2. Nf3 Nc6 3. Bb5 1-0\n";
        let game = read_game(text).unwrap();
        assert_eq!(game.tags().event, "Test");
        assert_eq!(game.tags().result, "1-0");
        assert_eq!(game.move_count(), 5);
        assert_eq!(game.current().san(), "Bb5");
        assert_eq!(game.tree().len(), 11);
        assert_eq!(
            write_movetext(&game),
            "1. e4 e5 (1... c5 2. Nf3 (2. c3 d5) 2... d6) 2. Nf3 Nc6 3. Bb5 1-0"
        );
    }

    #[test]
    fn test_import_with_fen_tag() {
        let text = "[FEN \"4k3/8/8/8/8/8/8/4K2R w K - 0 1\"]\n[SetUp \"1\"]\n\n1. Rh8+ Kd7 *";
        let game = read_game(text).unwrap();
        assert_eq!(game.move_count(), 2);
        assert_eq!(game.san_line(game.cursor()), vec!["Rh8+", "Kd7"]);
    }

    #[test]
    fn test_import_errors() {
        let err = read_game("1. e4 e5 2. Ke3").unwrap_err();
        assert!(matches!(
            err,
            PgnError::InvalidMove { ply: 3, source: SanError::NoMatchingMove { .. }, .. }
        ));
        assert_eq!(read_game("1. e4 (1. d4").unwrap_err(), PgnError::UnbalancedVariation);
        assert_eq!(read_game("1. e4 e5)").unwrap_err(), PgnError::UnbalancedVariation);
        assert_eq!(read_game("(1. d4) 1. e4").unwrap_err(), PgnError::OrphanVariation);
        assert!(matches!(
            read_game("[FEN \"8/8 w\"]\n\n*").unwrap_err(),
            PgnError::InvalidFen(_)
        ));
    }

    #[test]
    fn test_round_trip_through_text() {
        let mut game = Game::new();
        for san in ["d4", "d5", "c4", "dxc4", "e3", "b5", "a4", "c6"] {
            game.play_san(san).unwrap();
        }
        game.tags_mut().white = "Alice".to_string();
        let text = game.to_pgn();
        let again = Game::from_pgn(&text).unwrap();
        assert_eq!(again.tags().white, "Alice");
        assert_eq!(again.to_pgn(), text);
    }
}
