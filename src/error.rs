//! Error types for grammar construction and parsing.
//!
//! Grammar errors are surfaced once, at `Grammar::build` time, and abort the
//! caller. Parse errors are rare: not-in-language is `Ok(None)`, never an
//! `Err`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule references a function name that was never declared, a
    /// placeholder's argument name is not one of the function's formals, or
    /// a rule's actual-variable list disagrees in length with the
    /// function's formal-argument list.
    MalformedGrammar(String),
    /// An atom in a function's result vector is neither a declared terminal
    /// nor shaped like `Name(index)`.
    MalformedPlaceholder(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MalformedGrammar(msg) => write!(f, "malformed grammar: {msg}"),
            GrammarError::MalformedPlaceholder(msg) => write!(f, "malformed placeholder: {msg}"),
        }
    }
}

impl std::error::Error for GrammarError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The token stream could not be interpreted (currently unreachable
    /// through the public string tokenizer, which turns an empty string
    /// into an empty `Vec`, not an error; reserved for callers that build
    /// the token vector by hand).
    InvalidInput(String),
    /// The per-token sweep backstop (see `ParseLimits`) tripped before a
    /// fixed point was reached. Distinguishes a pathological grammar from
    /// ordinary non-membership.
    SweepLimitExceeded { token_index: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            ParseError::SweepLimitExceeded { token_index } => {
                write!(f, "sweep limit exceeded at token index {token_index}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
