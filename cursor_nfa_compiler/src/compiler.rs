use crate::{
    nodes::{Alternation, Assertion, ClassNode, Concat, Repetition},
    CompileError, CompileResult,
};
use cursor_nfa::{EmptyNode, Grammar, NodeId, NFA};
use regex_syntax::hir::{Class, Hir, HirKind, Look};

/// The default upper bound on the number of states in a compiled automaton
const DEFAULT_SIZE_LIMIT: usize = 10_000;

/// Compiler that lowers regex-syntax HIR into a grammar and builds its NFA
#[derive(Debug, Clone)]
pub struct Compiler {
    unanchored: bool,
    size_limit: usize,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self {
            unanchored: false,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }

    /// When set, the pattern may match anywhere inside the input instead of
    /// having to span all of it.
    pub fn unanchored(&mut self, yes: bool) -> &mut Self {
        self.unanchored = yes;
        self
    }

    /// The largest number of states a compiled automaton may have.
    pub fn size_limit(&mut self, states: usize) -> &mut Self {
        self.size_limit = states;
        self
    }

    /// Compile HIR to an automaton
    pub fn compile(&self, hir: &Hir) -> CompileResult<NFA> {
        let estimate = self.estimate(hir);
        if estimate > self.size_limit as u64 {
            return Err(CompileError::TooComplex(format!(
                "needs about {} states, limit is {}",
                estimate, self.size_limit
            )));
        }

        let mut grammar = Grammar::new();
        let mut root = self.lower(hir, &mut grammar)?;
        if self.unanchored {
            let any = grammar.push(ClassNode::any());
            let skip = grammar.push(Repetition { body: any, min: 0, max: None });
            root = grammar.push(Concat::new(vec![skip, root, skip]));
        }
        Ok(grammar.compile(root))
    }

    /// Add the nodes for `hir` to `grammar` and return the root node
    pub fn lower(&self, hir: &Hir, grammar: &mut Grammar) -> CompileResult<NodeId> {
        match hir.kind() {
            HirKind::Empty => Ok(grammar.push(EmptyNode)),
            HirKind::Literal(literal) => Ok(self.lower_literal(&literal.0, grammar)),
            HirKind::Class(class) => Ok(grammar.push(self.lower_class(class))),
            HirKind::Look(look) => {
                let assertion = Assertion::from_look(*look).ok_or_else(|| {
                    CompileError::UnsupportedFeature(format!("look-around {:?}", look))
                })?;
                if assertion.is_unicode_word() && regex_syntax::try_is_word_character('a').is_err() {
                    return Err(CompileError::UnsupportedFeature(format!(
                        "{:?} needs the unicode feature",
                        look
                    )));
                }
                Ok(grammar.push(assertion))
            }
            HirKind::Repetition(rep) => {
                let body = self.lower(&rep.sub, grammar)?;
                Ok(grammar.push(Repetition { body, min: rep.min, max: rep.max }))
            }
            HirKind::Capture(capture) => self.lower(&capture.sub, grammar),
            HirKind::Concat(subs) => {
                let children = subs
                    .iter()
                    .map(|sub| self.lower(sub, grammar))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(grammar.push(Concat::new(children)))
            }
            HirKind::Alternation(subs) => {
                let children = subs
                    .iter()
                    .map(|sub| self.lower(sub, grammar))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(grammar.push(Alternation::new(children)))
            }
        }
    }

    /// Lower a literal to one class node per code point
    fn lower_literal(&self, bytes: &[u8], grammar: &mut Grammar) -> NodeId {
        let nodes: Vec<ClassNode> = match std::str::from_utf8(bytes) {
            Ok(s) => s.chars().map(ClassNode::char).collect(),
            // Byte-oriented patterns match each byte as its own code point
            Err(_) => bytes.iter().map(|&byte| ClassNode::char(char::from(byte))).collect(),
        };
        let mut ids: Vec<NodeId> = nodes.into_iter().map(|node| grammar.push(node)).collect();
        if ids.len() == 1 {
            return ids.remove(0);
        }
        grammar.push(Concat::new(ids))
    }

    fn lower_class(&self, class: &Class) -> ClassNode {
        let ranges = match class {
            Class::Unicode(class) => class
                .iter()
                .map(|range| (u32::from(range.start()), u32::from(range.end())))
                .collect(),
            Class::Bytes(class) => class
                .iter()
                .map(|range| (u32::from(range.start()), u32::from(range.end())))
                .collect(),
        };
        ClassNode::new(ranges)
    }

    /// An upper bound on the states `compile` allocates for `hir`, not
    /// counting the two fixed ones.
    fn estimate(&self, hir: &Hir) -> u64 {
        let inner = self.estimate_hir(hir);
        if self.unanchored {
            // Two skip loops and the two joins around the pattern.
            inner.saturating_add(6)
        } else {
            inner
        }
    }

    fn estimate_hir(&self, hir: &Hir) -> u64 {
        match hir.kind() {
            HirKind::Empty | HirKind::Class(_) | HirKind::Look(_) => 0,
            HirKind::Literal(literal) => {
                let len = std::str::from_utf8(&literal.0)
                    .map(|s| s.chars().count())
                    .unwrap_or(literal.0.len());
                len.saturating_sub(1) as u64
            }
            HirKind::Capture(capture) => self.estimate_hir(&capture.sub),
            HirKind::Concat(subs) => subs
                .iter()
                .map(|sub| self.estimate_hir(sub))
                .fold(subs.len().saturating_sub(1) as u64, u64::saturating_add),
            HirKind::Alternation(subs) => {
                subs.iter().map(|sub| self.estimate_hir(sub)).fold(0, u64::saturating_add)
            }
            HirKind::Repetition(rep) => {
                let copy = self.estimate_hir(&rep.sub).saturating_add(1);
                let copies = match rep.max {
                    Some(max) => u64::from(max),
                    None => u64::from(rep.min).saturating_add(2),
                };
                copy.saturating_mul(copies)
            }
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assertion {
    /// Translate a regex-syntax look-around, if it has a counterpart here.
    pub fn from_look(look: Look) -> Option<Assertion> {
        let assertion = match look {
            Look::Start => Assertion::Start,
            Look::End => Assertion::End,
            Look::StartLF => Assertion::StartLine { crlf: false },
            Look::EndLF => Assertion::EndLine { crlf: false },
            Look::StartCRLF => Assertion::StartLine { crlf: true },
            Look::EndCRLF => Assertion::EndLine { crlf: true },
            Look::WordAscii => Assertion::WordBoundary { unicode: false, negate: false },
            Look::WordAsciiNegate => Assertion::WordBoundary { unicode: false, negate: true },
            Look::WordUnicode => Assertion::WordBoundary { unicode: true, negate: false },
            Look::WordUnicodeNegate => Assertion::WordBoundary { unicode: true, negate: true },
            Look::WordStartAscii => Assertion::WordStart { unicode: false },
            Look::WordEndAscii => Assertion::WordEnd { unicode: false },
            Look::WordStartUnicode => Assertion::WordStart { unicode: true },
            Look::WordEndUnicode => Assertion::WordEnd { unicode: true },
            Look::WordStartHalfAscii => Assertion::WordStartHalf { unicode: false },
            Look::WordEndHalfAscii => Assertion::WordEndHalf { unicode: false },
            Look::WordStartHalfUnicode => Assertion::WordStartHalf { unicode: true },
            Look::WordEndHalfUnicode => Assertion::WordEndHalf { unicode: true },
            #[allow(unreachable_patterns)]
            _ => return None,
        };
        Some(assertion)
    }
}
