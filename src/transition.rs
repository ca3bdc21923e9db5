use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::cursor::CursorIntSequence;

/// A state ID in the NFA
pub type StateId = usize;

/// A predicate over a single code point, used by consuming edges.
pub type CodePointPredicate = Arc<dyn Fn(u32) -> bool + Send + Sync>;

/// A predicate over the whole sequence and its cursor, used by epsilon edges.
pub type SequencePredicate = Arc<dyn Fn(&dyn CursorIntSequence) -> bool + Send + Sync>;

/// An edge between two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub s0: StateId,
    pub s1: StateId,
}

impl Transition {
    pub fn new(s0: StateId, s1: StateId) -> Self {
        Transition { s0, s1 }
    }
}

/// The condition under which an epsilon transition may be taken.
#[derive(Clone)]
pub enum Guard {
    /// Always taken.
    Always,
    /// Taken only at one cursor slot.
    ///
    /// A non-negative index counts symbols consumed from the start. A negative
    /// index counts from the end, with `-1` denoting the slot after the last
    /// symbol.
    Index(isize),
    /// Taken whenever the predicate holds for the sequence at its cursor.
    Custom(SequencePredicate),
}

impl Guard {
    fn test(&self, seq: &dyn CursorIntSequence) -> bool {
        match self {
            Guard::Always => true,
            Guard::Index(index) => at_slot(*index, seq.cursor_index(), seq.int_length()),
            Guard::Custom(predicate) => predicate(seq),
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Always => write!(f, "Always"),
            Guard::Index(index) => f.debug_tuple("Index").field(index).finish(),
            Guard::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Returns true if `cursor` sits at the slot named by `index` in a sequence
/// of `length` symbols.
pub fn at_slot(index: isize, cursor: usize, length: usize) -> bool {
    if index >= 0 {
        cursor == index as usize
    } else {
        cursor as isize - length as isize == index + 1
    }
}

/// A non-consuming edge.
#[derive(Debug, Clone)]
pub struct EpsilonTransition {
    pub transition: Transition,
    pub guard: Guard,
}

impl EpsilonTransition {
    /// An unconditional free move.
    pub fn new(s0: StateId, s1: StateId) -> Self {
        EpsilonTransition { transition: Transition::new(s0, s1), guard: Guard::Always }
    }

    /// An edge that only fires at the cursor slot named by `index`.
    pub fn index(s0: StateId, s1: StateId, index: isize) -> Self {
        EpsilonTransition { transition: Transition::new(s0, s1), guard: Guard::Index(index) }
    }

    /// An edge guarded by an arbitrary predicate over the sequence view.
    pub fn guarded<F>(s0: StateId, s1: StateId, predicate: F) -> Self
    where
        F: Fn(&dyn CursorIntSequence) -> bool + Send + Sync + 'static,
    {
        EpsilonTransition {
            transition: Transition::new(s0, s1),
            guard: Guard::Custom(Arc::new(predicate)),
        }
    }

    pub fn s0(&self) -> StateId {
        self.transition.s0
    }

    pub fn s1(&self) -> StateId {
        self.transition.s1
    }

    pub fn test(&self, seq: &dyn CursorIntSequence) -> bool {
        self.guard.test(seq)
    }
}

/// A consuming edge: moves over exactly one code point that satisfies the
/// predicate.
#[derive(Clone)]
pub struct AlphaTransition {
    pub transition: Transition,
    predicate: CodePointPredicate,
}

impl AlphaTransition {
    pub fn new<F>(s0: StateId, s1: StateId, predicate: F) -> Self
    where
        F: Fn(u32) -> bool + Send + Sync + 'static,
    {
        AlphaTransition { transition: Transition::new(s0, s1), predicate: Arc::new(predicate) }
    }

    /// Create a transition from an already shared predicate.
    pub fn shared(s0: StateId, s1: StateId, predicate: CodePointPredicate) -> Self {
        AlphaTransition { transition: Transition::new(s0, s1), predicate }
    }

    /// Matches exactly one character.
    pub fn literal(s0: StateId, s1: StateId, ch: char) -> Self {
        let want = u32::from(ch);
        Self::new(s0, s1, move |cp| cp == want)
    }

    /// Matches any code point inside one of the inclusive `ranges`.
    pub fn ranges(s0: StateId, s1: StateId, ranges: Vec<(u32, u32)>) -> Self {
        Self::shared(s0, s1, ranges_predicate(ranges))
    }

    pub fn s0(&self) -> StateId {
        self.transition.s0
    }

    pub fn s1(&self) -> StateId {
        self.transition.s1
    }

    pub fn test(&self, value: u32) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for AlphaTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaTransition")
            .field("s0", &self.transition.s0)
            .field("s1", &self.transition.s1)
            .finish_non_exhaustive()
    }
}

/// Returns a predicate accepting any code point inside one of the inclusive
/// `ranges`.
///
/// Ranges are sorted and merged here, so callers may pass them in any order.
/// A negated class is expressed by passing its complement.
pub fn ranges_predicate(ranges: Vec<(u32, u32)>) -> CodePointPredicate {
    let ranges = normalize(ranges);
    Arc::new(move |cp: u32| {
        ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < cp {
                    Ordering::Less
                } else if lo > cp {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    })
}

fn normalize(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges.retain(|&(lo, hi)| lo <= hi);
    ranges.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match merged.last_mut() {
            Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}
