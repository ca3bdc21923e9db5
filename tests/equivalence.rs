use cursor_nfa::{Builder, CodePoints, Strategy, BITSET_STATE_LIMIT, NFA};
use quickcheck::{Arbitrary, Gen, QuickCheck};

const ALPHABET: [char; 3] = ['a', 'b', 'c'];

#[derive(Clone, Debug)]
enum Edge {
    Epsilon(usize, usize),
    Anchor(usize, usize, isize),
    Literal(usize, usize, char),
    Any(usize, usize),
}

/// A random automaton over a small alphabet, small enough that the bitset
/// strategy always applies.
#[derive(Clone, Debug)]
struct Random {
    states: usize,
    edges: Vec<Edge>,
}

impl Arbitrary for Random {
    fn arbitrary(g: &mut Gen) -> Random {
        let states = 2 + usize::arbitrary(g) % 10;
        let count = usize::arbitrary(g) % 24;
        let mut state = || usize::arbitrary(g) % states;
        let mut edges = Vec::with_capacity(count);
        for _ in 0..count {
            let (s0, s1) = (state(), state());
            edges.push((s0, s1));
        }
        let edges = edges
            .into_iter()
            .map(|(s0, s1)| match u8::arbitrary(g) % 6 {
                0 | 1 => Edge::Epsilon(s0, s1),
                2 => Edge::Anchor(s0, s1, isize::from(i8::arbitrary(g) % 4)),
                3 => Edge::Any(s0, s1),
                _ => Edge::Literal(s0, s1, *g.choose(&ALPHABET).unwrap()),
            })
            .collect();
        Random { states, edges }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Random>> {
        let this = self.clone();
        Box::new((0..self.edges.len()).map(move |i| {
            let mut edges = this.edges.clone();
            edges.remove(i);
            Random { states: this.states, edges }
        }))
    }
}

impl Random {
    /// Build the automaton with at least `states` states.
    fn build(&self, states: usize) -> NFA {
        let mut b = Builder::new();
        while b.state_count() < self.states.max(states) {
            b.new_state();
        }
        for edge in self.edges.iter() {
            match *edge {
                Edge::Epsilon(s0, s1) => b.epsilon(s0, s1),
                Edge::Anchor(s0, s1, index) => b.anchor(s0, s1, index),
                Edge::Literal(s0, s1, ch) => b.literal(s0, s1, ch),
                Edge::Any(s0, s1) => b.alpha(s0, s1, |_| true),
            }
        }
        b.build()
    }
}

fn word(raw: &[u8]) -> String {
    raw.iter().take(8).map(|&x| ALPHABET[usize::from(x) % ALPHABET.len()]).collect()
}

#[test]
fn padding_past_the_bitset_limit_keeps_results() {
    crate::init();

    fn prop(nfa: Random, inputs: Vec<Vec<u8>>) -> bool {
        let small = nfa.build(0);
        let edge = nfa.build(BITSET_STATE_LIMIT);
        let large = nfa.build(BITSET_STATE_LIMIT + 1);
        assert_eq!(small.strategy(), Strategy::Bitset);
        assert_eq!(edge.strategy(), Strategy::Bitset);
        assert_eq!(large.strategy(), Strategy::Array);
        inputs.iter().map(|raw| word(raw)).chain(Some(String::new())).all(|input| {
            let want = small.is_match(&mut CodePoints::from(input.as_str()));
            want == edge.is_match(&mut CodePoints::from(input.as_str()))
                && want == large.is_match(&mut CodePoints::from(input.as_str()))
        })
    }
    QuickCheck::new().tests(1_000).quickcheck(prop as fn(Random, Vec<Vec<u8>>) -> bool);
}

#[test]
fn fresh_sequences_give_the_same_answer() {
    crate::init();

    fn prop(nfa: Random, raw: Vec<u8>) -> bool {
        let nfa = nfa.build(0);
        let input = word(&raw);
        let first = nfa.is_match_str(&input);
        (0..3).all(|_| nfa.is_match_str(&input) == first)
    }
    QuickCheck::new().quickcheck(prop as fn(Random, Vec<u8>) -> bool);
}
