//! Error types for chess board operations.

use std::fmt;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewParts { found: usize },
    /// Piece placement does not describe exactly 8 ranks
    WrongRankCount { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// A rank does not add up to exactly 8 files
    BadRankLength { rank: usize, files: usize },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Halfmove clock or fullmove number is not a number
    InvalidCounter { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN piece placement must have 8 ranks, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::BadRankLength { rank, files } => {
                write!(f, "Rank {rank} spans {files} files, expected 8")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidCounter { found } => {
                write!(f, "Invalid move counter '{found}' in FEN")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// UCI move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
    /// The previous move still waits for its promotion piece
    PromotionPending { notation: String },
    /// A promotion cannot be changed once moves follow it
    PromotionHasContinuation { notation: String },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
            MoveError::PromotionPending { notation } => {
                write!(f, "Promotion piece for '{notation}' not chosen yet")
            }
            MoveError::PromotionHasContinuation { notation } => {
                write!(f, "Promotion '{notation}' already has continuations")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Linear index out of bounds (must be 0-63)
    IndexOutOfBounds { index: usize },
    /// Rank out of bounds (must be 1-8)
    RankOutOfBounds { rank: u8 },
    /// File out of bounds (must be 1-8)
    FileOutOfBounds { file: u8 },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::IndexOutOfBounds { index } => {
                write!(f, "Square index {index} out of bounds (must be 0-63)")
            }
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 1-8)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 1-8)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for SAN (Standard Algebraic Notation) parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Empty SAN string
    Empty,
    /// Invalid piece character
    InvalidPiece { char: char },
    /// Invalid or missing destination square in SAN
    InvalidSquare { notation: String },
    /// Characters that do not fit the SAN grammar
    Malformed { san: String },
    /// Ambiguous move (multiple pieces can reach the target)
    AmbiguousMove { san: String },
    /// No matching legal move found
    NoMatchingMove { san: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// The move resolved but the game refused it
    Rejected { san: String, source: MoveError },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "Empty SAN string"),
            SanError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in SAN")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "Invalid square in SAN '{notation}'")
            }
            SanError::Malformed { san } => {
                write!(f, "Malformed SAN '{san}'")
            }
            SanError::AmbiguousMove { san } => {
                write!(f, "Ambiguous move '{san}'")
            }
            SanError::NoMatchingMove { san } => {
                write!(f, "No legal move matches '{san}'")
            }
            SanError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            SanError::Rejected { san, source } => {
                write!(f, "Move '{san}' rejected: {source}")
            }
        }
    }
}

impl std::error::Error for SanError {}

/// Error type for PGN reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// A tag line is not of the form `[Name "Value"]`
    MalformedTag { line: String },
    /// The `FEN` tag holds an invalid position
    InvalidFen(FenError),
    /// A move in the movetext could not be resolved
    InvalidMove { ply: usize, san: String, source: SanError },
    /// Parentheses in the movetext do not balance
    UnbalancedVariation,
    /// A variation opens before any move it could branch from
    OrphanVariation,
}

impl fmt::Display for PgnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgnError::MalformedTag { line } => write!(f, "Malformed PGN tag '{line}'"),
            PgnError::InvalidFen(err) => write!(f, "Invalid FEN tag: {err}"),
            PgnError::InvalidMove { ply, san, source } => {
                write!(f, "Invalid move '{san}' at ply {ply}: {source}")
            }
            PgnError::UnbalancedVariation => write!(f, "Unbalanced parentheses in movetext"),
            PgnError::OrphanVariation => {
                write!(f, "Variation opened before any move in movetext")
            }
        }
    }
}

impl std::error::Error for PgnError {}

impl From<FenError> for PgnError {
    fn from(err: FenError) -> Self {
        PgnError::InvalidFen(err)
    }
}
