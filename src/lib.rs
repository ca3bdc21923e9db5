/*!
A nondeterministic finite automaton over Unicode code points.

Transitions come in two kinds. Alpha transitions consume exactly one code
point that satisfies a predicate. Epsilon transitions consume nothing and
may be guarded by a predicate over the whole sequence and its cursor, which
is how anchors such as `^` and `$` become ordinary edges: an
[`EpsilonTransition::index`] edge only fires at one cursor slot.

An automaton is assembled with a [`Builder`], usually by walking a
[`Grammar`] of nodes, and then frozen into an [`NFA`] that can be matched
any number of times, from any number of threads.

```
use cursor_nfa::{Builder, CodePoints, DST, SRC};

// ^a$
let mut b = Builder::new();
let (s1, s2) = (b.new_state(), b.new_state());
b.anchor(SRC, s1, 0);
b.literal(s1, s2, 'a');
b.anchor(s2, DST, -1);
let nfa = b.build();

assert!(nfa.is_match(&mut CodePoints::from("a")));
assert!(!nfa.is_match(&mut CodePoints::from("ab")));
```

# Simulation

Automatons with at most [`BITSET_STATE_LIMIT`] states track their active
states in a single `u64`. Larger automatons use a pair of arrays indexed by
state ID. The two strategies accept exactly the same sequences; which one
runs is reported by [`NFA::strategy`].

# Crate features

* **logging** - Emits messages through the `log` crate when automatons are
built and when a match gives up early.
*/

#![deny(missing_debug_implementations)]

#[macro_use]
mod macros;

pub mod cursor;
pub mod grammar;
pub mod nfa;
pub mod transition;

pub use cursor::{CodePoints, CursorIntSequence};
pub use grammar::{ContainerNode, EmptyNode, Grammar, GrammarNode, NodeId, SlotNode};
pub use nfa::{Builder, Strategy, BITSET_STATE_LIMIT, DST, NFA, SRC};
pub use transition::{
    ranges_predicate, AlphaTransition, CodePointPredicate, EpsilonTransition, Guard,
    SequencePredicate, StateId, Transition,
};
