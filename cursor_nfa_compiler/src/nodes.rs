//! Concrete grammar nodes produced by the compiler.
//!
//! Every node here emits only edges that leave `s0` or enter `s1` through
//! states it allocated itself; none adds an edge into `s0` or out of `s1`.
//! That lets siblings of an [`Alternation`] share both endpoints safely.

use std::fmt;

use cursor_nfa::{
    ranges_predicate, AlphaTransition, Builder, CodePointPredicate, ContainerNode,
    CursorIntSequence, Grammar, GrammarNode, NodeId, StateId,
};

/// Children matched one after the other
#[derive(Debug, Clone, Default)]
pub struct Concat {
    children: Vec<NodeId>,
}

impl Concat {
    pub fn new(children: Vec<NodeId>) -> Self {
        Concat { children }
    }
}

impl GrammarNode for Concat {
    fn build_nfa(&self, grammar: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        let Some((&last, init)) = self.children.split_last() else {
            nfa.epsilon(s0, s1);
            return;
        };
        let mut from = s0;
        for &child in init {
            let to = nfa.new_state();
            grammar.build(child, nfa, from, to);
            from = to;
        }
        grammar.build(last, nfa, from, s1);
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl ContainerNode for Concat {
    fn nodes(&self) -> &[NodeId] {
        &self.children
    }

    fn add(&mut self, child: NodeId) {
        self.children.push(child);
    }
}

/// Children tried in parallel
#[derive(Debug, Clone, Default)]
pub struct Alternation {
    children: Vec<NodeId>,
}

impl Alternation {
    pub fn new(children: Vec<NodeId>) -> Self {
        Alternation { children }
    }
}

impl GrammarNode for Alternation {
    fn build_nfa(&self, grammar: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        // An empty alternation matches nothing, so it emits nothing.
        for &child in self.children.iter() {
            grammar.build(child, nfa, s0, s1);
        }
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl ContainerNode for Alternation {
    fn nodes(&self) -> &[NodeId] {
        &self.children
    }

    fn add(&mut self, child: NodeId) {
        self.children.push(child);
    }
}

/// One code point from a set of inclusive ranges.
///
/// The predicate is built once and shared by every edge this node emits.
#[derive(Clone)]
pub struct ClassNode {
    ranges: Vec<(u32, u32)>,
    predicate: CodePointPredicate,
}

impl ClassNode {
    pub fn new(ranges: Vec<(u32, u32)>) -> Self {
        let predicate = ranges_predicate(ranges.clone());
        ClassNode { ranges, predicate }
    }

    pub fn char(ch: char) -> Self {
        let cp = u32::from(ch);
        Self::new(vec![(cp, cp)])
    }

    /// Any code point, including unpaired surrogates.
    pub fn any() -> Self {
        Self::new(vec![(0, u32::MAX)])
    }

    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }
}

impl fmt::Debug for ClassNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassNode").field("ranges", &self.ranges).finish_non_exhaustive()
    }
}

impl GrammarNode for ClassNode {
    fn build_nfa(&self, _: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        nfa.add_alpha(AlphaTransition::shared(s0, s1, self.predicate.clone()));
    }
}

/// A zero-width assertion about the cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// Slot 0.
    Start,
    /// The slot after the last code point.
    End,
    /// The start, or right after a line terminator.
    StartLine { crlf: bool },
    /// The end, or right before a line terminator.
    EndLine { crlf: bool },
    /// Word characters on exactly one side, or on neither or both when
    /// `negate` is set.
    WordBoundary { unicode: bool, negate: bool },
    /// A non-word character (or the start) before and a word character after.
    WordStart { unicode: bool },
    /// A word character before and a non-word character (or the end) after.
    WordEnd { unicode: bool },
    /// A non-word character (or the start) before, whatever comes after.
    WordStartHalf { unicode: bool },
    /// A non-word character (or the end) after, whatever came before.
    WordEndHalf { unicode: bool },
}

impl Assertion {
    /// Returns whether the assertion holds at the cursor of `seq`.
    pub fn holds(self, seq: &dyn CursorIntSequence) -> bool {
        let cursor = seq.cursor_index();
        let prev = cursor.checked_sub(1).map(|i| seq.get_int(i));
        let next = if cursor < seq.int_length() { Some(seq.get_int(cursor)) } else { None };
        match self {
            Assertion::Start => prev.is_none(),
            Assertion::End => next.is_none(),
            Assertion::StartLine { crlf: false } => prev.map_or(true, |c| c == LF),
            Assertion::EndLine { crlf: false } => next.map_or(true, |c| c == LF),
            Assertion::StartLine { crlf: true } => match prev {
                None | Some(LF) => true,
                Some(CR) => next != Some(LF),
                Some(_) => false,
            },
            Assertion::EndLine { crlf: true } => match next {
                None | Some(CR) => true,
                Some(LF) => prev != Some(CR),
                Some(_) => false,
            },
            Assertion::WordBoundary { unicode, negate } => {
                (is_word(prev, unicode) != is_word(next, unicode)) != negate
            }
            Assertion::WordStart { unicode } => {
                !is_word(prev, unicode) && is_word(next, unicode)
            }
            Assertion::WordEnd { unicode } => is_word(prev, unicode) && !is_word(next, unicode),
            Assertion::WordStartHalf { unicode } => !is_word(prev, unicode),
            Assertion::WordEndHalf { unicode } => !is_word(next, unicode),
        }
    }

    /// Returns true if checking this assertion needs Unicode word data.
    pub fn is_unicode_word(self) -> bool {
        match self {
            Assertion::WordBoundary { unicode, .. }
            | Assertion::WordStart { unicode }
            | Assertion::WordEnd { unicode }
            | Assertion::WordStartHalf { unicode }
            | Assertion::WordEndHalf { unicode } => unicode,
            _ => false,
        }
    }
}

const LF: u32 = b'\n' as u32;
const CR: u32 = b'\r' as u32;

/// Unicode word characters are the ones `\w` matches. Without regex-syntax's
/// Perl class data nothing counts as a Unicode word character, and the
/// compiler refuses such assertions up front.
fn is_word(cp: Option<u32>, unicode: bool) -> bool {
    let Some(c) = cp.and_then(char::from_u32) else {
        return false;
    };
    if unicode {
        regex_syntax::try_is_word_character(c).unwrap_or(false)
    } else {
        c.is_ascii() && regex_syntax::is_word_byte(c as u8)
    }
}

impl GrammarNode for Assertion {
    fn build_nfa(&self, _: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        match *self {
            Assertion::Start => nfa.anchor(s0, s1, 0),
            Assertion::End => nfa.anchor(s0, s1, -1),
            assertion => nfa.guard(s0, s1, move |seq| assertion.holds(seq)),
        }
    }
}

/// `min` to `max` copies of one body, with `None` meaning unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Repetition {
    pub body: NodeId,
    pub min: u32,
    pub max: Option<u32>,
}

impl GrammarNode for Repetition {
    fn build_nfa(&self, grammar: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        let mut from = s0;
        for _ in 0..self.min {
            let to = nfa.new_state();
            grammar.build(self.body, nfa, from, to);
            from = to;
        }
        match self.max {
            None => {
                let (top, bottom) = (nfa.new_state(), nfa.new_state());
                nfa.epsilon(from, top);
                grammar.build(self.body, nfa, top, bottom);
                nfa.epsilon(bottom, top);
                nfa.epsilon(top, s1);
            }
            Some(max) => {
                for _ in self.min..max {
                    let to = nfa.new_state();
                    nfa.epsilon(from, s1);
                    grammar.build(self.body, nfa, from, to);
                    from = to;
                }
                nfa.epsilon(from, s1);
            }
        }
    }

    fn children(&self) -> &[NodeId] {
        std::slice::from_ref(&self.body)
    }
}
