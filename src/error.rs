/*
    Errors returned by the engine. Nothing in the library panics on bad
    grammars or bad input, every failure comes back as one of these.
*/

use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

/// A grammar that cannot be used as written.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GrammarError {
    #[error("Nonterminal `{head}` has no productions")]
    NoProductions { head: String },
    #[error("Grammar has no nonterminals")]
    NoStartSymbol,
    #[error("Empty production (write `ε` for the empty alternative)")]
    EmptyProduction,
    #[error("Empty literal in `{text}`")]
    EmptyLiteral { text: String },
    #[error("Nonterminal `{head}` is defined more than once")]
    DuplicateHead { head: String },
    #[error("Cannot eliminate left recursion in `{head} → {production}`, too few symbols")]
    BareLeftRecursion { head: String, production: String },
    #[error("Every production of `{head}` is left-recursive, so it can never ground out")]
    Ungroundable { head: String },
    #[error("Unterminated `{delimiter}` in `{text}`")]
    Unterminated { delimiter: char, text: String },
    #[error("Invalid pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Input text that no terminal of the grammar accepts.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown sequence `{text}` at {position}")]
pub struct LexicalError {
    pub text: String,
    pub position: usize
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SyntaxError {
    // Every alternative of `nonterminal` failed at `position`
    #[error("Syntax error in `{nonterminal}` at {position}, unable to parse `{remaining}`")]
    NoMatch { nonterminal: String, position: usize, remaining: String },
    // The start symbol matched but input was left over
    #[error("Unexpected trailing input `{remaining}` at {position}")]
    TrailingInput { position: usize, remaining: String },
}

impl SyntaxError {
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::NoMatch { position, .. } => *position,
            SyntaxError::TrailingInput { position, .. } => *position,
        }
    }

    pub fn remaining(&self) -> &str {
        match self {
            SyntaxError::NoMatch { remaining, .. } => remaining,
            SyntaxError::TrailingInput { remaining, .. } => remaining,
        }
    }
}

/// Everything that can go wrong between raw text and a finished tree.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("`{nonterminal}` reenters itself at {position} without consuming input, the grammar is left-recursive")]
    LeftRecursion { nonterminal: String, position: usize },
    #[error("Nesting deeper than {depth} while parsing `{nonterminal}`")]
    DepthExceeded { nonterminal: String, depth: usize },
}

pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
pub type ParseResult<T> = std::result::Result<T, ParseError>;
