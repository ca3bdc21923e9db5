use cursor_nfa::{
    Builder, ContainerNode, EmptyNode, Grammar, GrammarNode, NodeId, StateId, Strategy,
};

#[derive(Debug)]
struct Char(char);

impl GrammarNode for Char {
    fn build_nfa(&self, _: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        nfa.literal(s0, s1, self.0);
    }
}

/// Children tried in parallel, each between fresh states of its own.
#[derive(Debug, Default)]
struct Either(Vec<NodeId>);

impl GrammarNode for Either {
    fn build_nfa(&self, grammar: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        for &child in self.0.iter() {
            let (start, end) = (nfa.new_state(), nfa.new_state());
            nfa.epsilon(s0, start);
            grammar.build(child, nfa, start, end);
            nfa.epsilon(end, s1);
        }
    }

    fn children(&self) -> &[NodeId] {
        &self.0
    }
}

impl ContainerNode for Either {
    fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    fn add(&mut self, child: NodeId) {
        self.0.push(child);
    }
}

#[test]
fn optional_through_empty_node() {
    crate::init();
    let mut g = Grammar::new();
    let x = g.push(Char('x'));
    let empty = g.push(EmptyNode);
    let mut either = Either::default();
    either.add(x);
    either.add(empty);
    let root = g.push(either);
    let nfa = g.compile(root);
    assert!(nfa.is_match_str(""));
    assert!(nfa.is_match_str("x"));
    assert!(!nfa.is_match_str("xx"));
}

#[test]
fn large_grammar_switches_strategy() {
    crate::init();
    let mut g = Grammar::new();
    let letters: Vec<NodeId> = ('a'..='z').chain('A'..='Z').map(|c| g.push(Char(c))).collect();
    let root = g.push(Either(letters));
    let nfa = g.compile(root);
    assert_eq!(nfa.strategy(), Strategy::Array);
    assert!(nfa.is_match_str("q"));
    assert!(nfa.is_match_str("Q"));
    assert!(!nfa.is_match_str("qQ"));
    assert!(!nfa.is_match_str("1"));
}

#[test]
fn slot_swapped_between_compilations() {
    crate::init();
    let mut g = Grammar::new();
    let slot = g.slot();
    let a = g.push(Char('a'));
    let root = g.push(Either(vec![a, slot]));
    let b = g.push(Char('b'));
    g.bind(slot, b);
    let first = g.compile(root);

    let c = g.push(Char('c'));
    g.bind(slot, c);
    let second = g.compile(root);

    assert!(first.is_match_str("b") && !first.is_match_str("c"));
    assert!(second.is_match_str("c") && !second.is_match_str("b"));
    assert!(first.is_match_str("a") && second.is_match_str("a"));
}
