//! Regex front end for cursor-nfa
//!
//! This library turns a pattern, parsed into HIR by `regex-syntax`, into a
//! grammar of cursor-nfa nodes and from there into an automaton. Anchors and
//! other assertions become epsilon transitions guarded by the cursor
//! position, so the automaton answers whole-input membership directly.


pub mod nodes;
pub mod compiler;
pub mod regex;

pub use nodes::{Alternation, Assertion, ClassNode, Concat, Repetition};
pub use compiler::Compiler;
pub use regex::Regex;

/// The result of compiling a pattern
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The pattern could not be parsed
    Parse(regex_syntax::Error),
    /// The pattern is too complex to compile
    TooComplex(String),
    /// Unsupported regex feature
    UnsupportedFeature(String),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(err) => write!(f, "failed to parse pattern: {}", err),
            CompileError::TooComplex(why) => write!(f, "pattern is too complex: {}", why),
            CompileError::UnsupportedFeature(feature) => write!(f, "unsupported feature: {}", feature),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex_syntax::Error> for CompileError {
    fn from(err: regex_syntax::Error) -> Self {
        CompileError::Parse(err)
    }
}
