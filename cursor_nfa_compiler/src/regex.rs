use crate::{Compiler, CompileResult};
use cursor_nfa::{CodePoints, NFA};
use regex_syntax::ParserBuilder;

/// A compiled pattern that answers whole-input membership
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    nfa: NFA,
}

impl Regex {
    /// Parse and compile `pattern` with the default compiler settings
    pub fn new(pattern: &str) -> CompileResult<Regex> {
        Self::with_compiler(pattern, &Compiler::new())
    }

    /// Parse `pattern` and compile it with `compiler`
    pub fn with_compiler(pattern: &str, compiler: &Compiler) -> CompileResult<Regex> {
        let hir = ParserBuilder::new().build().parse(pattern)?;
        let nfa = compiler.compile(&hir)?;
        Ok(Regex { pattern: pattern.to_string(), nfa })
    }

    /// Check if the entire input matches
    pub fn is_match(&self, haystack: &str) -> bool {
        self.nfa.is_match(&mut CodePoints::from(haystack))
    }

    /// Check if the entire input, given as UTF-16 code units, matches
    pub fn is_match_utf16(&self, haystack: &[u16]) -> bool {
        self.nfa.is_match(&mut CodePoints::from_utf16(haystack))
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }
}
