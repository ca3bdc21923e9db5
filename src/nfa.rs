use std::fmt;

use crate::cursor::{CodePoints, CursorIntSequence};
use crate::transition::{AlphaTransition, EpsilonTransition, Guard, StateId, Transition};

/// The entry state of every automaton.
pub const SRC: StateId = 0;

/// The accepting state of every automaton.
pub const DST: StateId = 1;

/// The largest state count simulated with a single machine word.
///
/// Automatons with more states use the array strategy.
pub const BITSET_STATE_LIMIT: usize = u64::BITS as usize;

/// Marks a state that is not active in the array strategy.
const NONE: u32 = u32::MAX;

/// The simulation used by [`NFA::is_match`] for a given automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Active states are bits of a `u64`.
    Bitset,
    /// Active states are entries of a per-call array indexed by state ID.
    Array,
}

/// Collects the states and transitions of an automaton under construction.
///
/// States [`SRC`] and [`DST`] exist from the start. Every other state comes
/// from [`Builder::new_state`].
#[derive(Debug, Clone)]
pub struct Builder {
    epsilon: Vec<EpsilonTransition>,
    alpha: Vec<AlphaTransition>,
    state_count: usize,
}

impl Builder {
    /// Create a builder holding only the entry and accepting states
    pub fn new() -> Self {
        Self { epsilon: Vec::new(), alpha: Vec::new(), state_count: 2 }
    }

    /// Allocate a fresh state and return its ID
    pub fn new_state(&mut self) -> StateId {
        let id = self.state_count;
        self.state_count += 1;
        id
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn add_epsilon(&mut self, transition: EpsilonTransition) {
        self.check(&transition.transition);
        self.epsilon.push(transition);
    }

    pub fn add_alpha(&mut self, transition: AlphaTransition) {
        self.check(&transition.transition);
        self.alpha.push(transition);
    }

    /// Connect two states with an unconditional epsilon transition
    pub fn epsilon(&mut self, s0: StateId, s1: StateId) {
        self.add_epsilon(EpsilonTransition::new(s0, s1));
    }

    /// Connect two states with an epsilon transition anchored at `index`
    pub fn anchor(&mut self, s0: StateId, s1: StateId, index: isize) {
        self.add_epsilon(EpsilonTransition::index(s0, s1, index));
    }

    pub fn guard<F>(&mut self, s0: StateId, s1: StateId, predicate: F)
    where
        F: Fn(&dyn CursorIntSequence) -> bool + Send + Sync + 'static,
    {
        self.add_epsilon(EpsilonTransition::guarded(s0, s1, predicate));
    }

    pub fn alpha<F>(&mut self, s0: StateId, s1: StateId, predicate: F)
    where
        F: Fn(u32) -> bool + Send + Sync + 'static,
    {
        self.add_alpha(AlphaTransition::new(s0, s1, predicate));
    }

    pub fn literal(&mut self, s0: StateId, s1: StateId, ch: char) {
        self.add_alpha(AlphaTransition::literal(s0, s1, ch));
    }

    /// Finish construction. The returned automaton can no longer grow.
    pub fn build(self) -> NFA {
        let nfa = NFA { epsilon: self.epsilon, alpha: self.alpha, state_count: self.state_count };
        debug!(
            "built NFA with {} states, {} epsilon and {} alpha transitions, using {:?}",
            nfa.state_count,
            nfa.epsilon.len(),
            nfa.alpha.len(),
            nfa.strategy(),
        );
        nfa
    }

    fn check(&self, transition: &Transition) {
        assert!(
            transition.s0 < self.state_count && transition.s1 < self.state_count,
            "transition {} -> {} references a state that was never allocated \
             (state count is {})",
            transition.s0,
            transition.s1,
            self.state_count,
        );
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable automaton over code points.
///
/// Matching takes `&self` and allocates its own scratch space, so one `NFA`
/// may be shared between threads as long as each call brings its own
/// sequence.
#[derive(Debug, Clone)]
pub struct NFA {
    epsilon: Vec<EpsilonTransition>,
    alpha: Vec<AlphaTransition>,
    state_count: usize,
}

impl NFA {
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn epsilon(&self) -> &[EpsilonTransition] {
        &self.epsilon
    }

    pub fn alpha(&self) -> &[AlphaTransition] {
        &self.alpha
    }

    /// Returns the simulation [`NFA::is_match`] will use for this automaton.
    pub fn strategy(&self) -> Strategy {
        if self.state_count <= BITSET_STATE_LIMIT {
            Strategy::Bitset
        } else {
            Strategy::Array
        }
    }

    /// Returns true if the automaton accepts the whole of `seq`.
    ///
    /// The cursor is reset to 0 on entry and left at the end of the sequence
    /// on exit.
    pub fn is_match(&self, seq: &mut dyn CursorIntSequence) -> bool {
        seq.set_cursor_index(0);
        match self.strategy() {
            Strategy::Bitset => self.match_bits(seq),
            Strategy::Array => self.match_array(seq),
        }
    }

    /// Returns true if the automaton accepts the code points of `s`.
    pub fn is_match_str(&self, s: &str) -> bool {
        self.is_match(&mut CodePoints::from(s))
    }

    fn match_bits(&self, seq: &mut dyn CursorIntSequence) -> bool {
        let length = seq.int_length();
        let mut mask = self.closure_bits(1 << SRC, seq);
        while seq.cursor_index() < length {
            let cursor = seq.cursor_index();
            mask = self.step_bits(mask, seq.get_int(cursor));
            if mask == 0 {
                trace!("no active states after {} of {} symbols", cursor + 1, length);
                seq.set_cursor_index(length);
                return false;
            }
            seq.set_cursor_index(cursor + 1);
            mask = self.closure_bits(mask, seq);
        }
        mask & (1 << DST) != 0
    }

    fn closure_bits(&self, mut mask: u64, seq: &dyn CursorIntSequence) -> u64 {
        loop {
            let mut changed = false;
            for e in self.epsilon.iter() {
                let (from, to) = (1u64 << e.s0(), 1u64 << e.s1());
                if mask & from != 0 && mask & to == 0 && e.test(seq) {
                    mask |= to;
                    changed = true;
                }
            }
            if !changed {
                return mask;
            }
        }
    }

    fn step_bits(&self, mask: u64, value: u32) -> u64 {
        let mut next = 0;
        for a in self.alpha.iter() {
            if mask & (1u64 << a.s0()) != 0 && a.test(value) {
                next |= 1u64 << a.s1();
            }
        }
        next
    }

    fn match_array(&self, seq: &mut dyn CursorIntSequence) -> bool {
        let length = seq.int_length();
        let mut state = vec![NONE; self.state_count];
        let mut next = vec![NONE; self.state_count];
        state[SRC] = 0;
        self.closure_array(&mut state, seq);
        while seq.cursor_index() < length {
            let cursor = seq.cursor_index();
            if !self.step_array(&state, &mut next, seq.get_int(cursor)) {
                trace!("no active states after {} of {} symbols", cursor + 1, length);
                seq.set_cursor_index(length);
                return false;
            }
            std::mem::swap(&mut state, &mut next);
            seq.set_cursor_index(cursor + 1);
            self.closure_array(&mut state, seq);
        }
        state[DST] != NONE
    }

    fn closure_array(&self, state: &mut [u32], seq: &dyn CursorIntSequence) {
        loop {
            let mut changed = false;
            for e in self.epsilon.iter() {
                let from = state[e.s0()];
                if from != NONE && state[e.s1()] > from && e.test(seq) {
                    state[e.s1()] = from;
                    changed = true;
                }
            }
            if !changed {
                return;
            }
        }
    }

    /// Fills `next` with the states reached by consuming `value` from
    /// `state`. Returns false if no state was reached.
    fn step_array(&self, state: &[u32], next: &mut [u32], value: u32) -> bool {
        next.fill(NONE);
        let mut any = false;
        for a in self.alpha.iter() {
            let from = state[a.s0()];
            if from != NONE && next[a.s1()] > from && a.test(value) {
                next[a.s1()] = from;
                any = true;
            }
        }
        any
    }
}

impl fmt::Display for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "states: {} ({:?})", self.state_count, self.strategy())?;
        for e in self.epsilon.iter() {
            match &e.guard {
                Guard::Always => writeln!(f, "  {} -> {} ε", e.s0(), e.s1())?,
                Guard::Index(index) => writeln!(f, "  {} -> {} ε @{}", e.s0(), e.s1(), index)?,
                Guard::Custom(_) => writeln!(f, "  {} -> {} ε guarded", e.s0(), e.s1())?,
            }
        }
        for a in self.alpha.iter() {
            writeln!(f, "  {} -> {} α", a.s0(), a.s1())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both(nfa: &NFA, input: &str) -> (bool, bool) {
        let mut seq = CodePoints::from(input);
        let bits = nfa.match_bits(&mut seq);
        assert_eq!(seq.cursor_index(), seq.int_length());
        let mut seq = CodePoints::from(input);
        let array = nfa.match_array(&mut seq);
        assert_eq!(seq.cursor_index(), seq.int_length());
        (bits, array)
    }

    fn a_star_b() -> NFA {
        let mut b = Builder::new();
        let loop_state = b.new_state();
        b.epsilon(SRC, loop_state);
        b.literal(loop_state, loop_state, 'a');
        b.literal(loop_state, DST, 'b');
        b.build()
    }

    #[test]
    fn test_strategies_agree_on_small_automaton() {
        let nfa = a_star_b();
        for (input, want) in [("b", true), ("aaab", true), ("", false), ("aba", false), ("ba", false)] {
            assert_eq!(both(&nfa, input), (want, want), "{:?}", input);
        }
    }

    #[test]
    fn test_strategy_threshold() {
        let mut b = Builder::new();
        while b.state_count() < BITSET_STATE_LIMIT {
            b.new_state();
        }
        assert_eq!(b.clone().build().strategy(), Strategy::Bitset);
        b.new_state();
        assert_eq!(b.build().strategy(), Strategy::Array);
    }

    #[test]
    fn test_highest_bit_state() {
        let mut b = Builder::new();
        let mut last = DST;
        while b.state_count() < BITSET_STATE_LIMIT {
            last = b.new_state();
        }
        assert_eq!(last, 63);
        b.literal(SRC, last, 'x');
        b.epsilon(last, DST);
        let nfa = b.build();
        assert_eq!(nfa.strategy(), Strategy::Bitset);
        assert_eq!(both(&nfa, "x"), (true, true));
        assert_eq!(both(&nfa, "y"), (false, false));
    }

    #[test]
    fn test_closure_sees_post_consumption_cursor() {
        // An anchor at slot 1 can only fire after the first symbol.
        let mut b = Builder::new();
        let mid = b.new_state();
        b.literal(SRC, mid, 'a');
        b.anchor(mid, DST, 1);
        let nfa = b.build();
        assert_eq!(both(&nfa, "a"), (true, true));
        assert_eq!(both(&nfa, "aa"), (false, false));
    }

    #[test]
    fn test_closure_reaches_fixpoint_through_chains() {
        // Epsilon edges listed in reverse order need several passes.
        let mut b = Builder::new();
        let s: Vec<StateId> = (0..5).map(|_| b.new_state()).collect();
        b.epsilon(s[3], s[4]);
        b.epsilon(s[2], s[3]);
        b.epsilon(s[1], s[2]);
        b.epsilon(s[0], s[1]);
        b.epsilon(SRC, s[0]);
        b.epsilon(s[4], DST);
        let nfa = b.build();
        assert_eq!(both(&nfa, ""), (true, true));
        assert_eq!(both(&nfa, "a"), (false, false));
    }

    #[test]
    fn test_step_drops_unconsumed_states() {
        // DST is active before any input but nothing consumes into it.
        let mut b = Builder::new();
        let mid = b.new_state();
        b.epsilon(SRC, DST);
        b.literal(SRC, mid, 'a');
        let nfa = b.build();
        assert_eq!(both(&nfa, ""), (true, true));
        assert_eq!(both(&nfa, "a"), (false, false));
    }

    #[test]
    fn test_self_loop_on_entry_state() {
        let mut b = Builder::new();
        b.epsilon(SRC, DST);
        b.literal(SRC, SRC, 'a');
        let nfa = b.build();
        assert_eq!(both(&nfa, "aa"), (true, true));
        assert_eq!(both(&nfa, "ab"), (false, false));
    }

    #[test]
    fn test_is_match_resets_cursor() {
        let nfa = a_star_b();
        let mut seq = CodePoints::from("ab");
        seq.set_cursor_index(1);
        assert!(nfa.is_match(&mut seq));
        assert_eq!(seq.cursor_index(), 2);
    }

    #[test]
    #[should_panic(expected = "never allocated")]
    fn test_unallocated_state_panics() {
        let mut b = Builder::new();
        b.epsilon(SRC, 2);
    }

    #[test]
    fn test_display_lists_edges() {
        let mut b = Builder::new();
        let mid = b.new_state();
        b.anchor(SRC, mid, 0);
        b.literal(mid, DST, 'a');
        let text = b.build().to_string();
        assert!(text.contains("states: 3 (Bitset)"));
        assert!(text.contains("0 -> 2 ε @0"));
        assert!(text.contains("2 -> 1 α"));
    }
}
