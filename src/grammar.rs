/*!
The build-time protocol that turns a tree of grammar nodes into an [`NFA`].

Nodes live in a [`Grammar`] arena and refer to each other by [`NodeId`].
A node emits the transitions of its sub-language between two states it is
handed, allocating any intermediate states it needs from the [`Builder`].
Nothing in this module is used while matching.
*/

use std::fmt;

use crate::nfa::{Builder, DST, NFA, SRC};
use crate::transition::StateId;

/// The index of a node inside a [`Grammar`].
pub type NodeId = usize;

/// A node that knows how to emit its sub-automaton.
pub trait GrammarNode: fmt::Debug {
    /// Emit transitions so that the states reachable from `s0` through the
    /// added edges recognize exactly this node's language, ending at `s1`.
    ///
    /// The default is the empty language's pass-through: a single
    /// unconditional epsilon edge.
    fn build_nfa(&self, grammar: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        let _ = grammar;
        nfa.epsilon(s0, s1);
    }

    /// The nodes this node refers to.
    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn as_slot_mut(&mut self) -> Option<&mut SlotNode> {
        None
    }
}

/// A node holding an ordered list of children.
///
/// Implementations decide whether the children are chained one after the
/// other or tried in parallel.
pub trait ContainerNode: GrammarNode {
    fn nodes(&self) -> &[NodeId];

    fn add(&mut self, child: NodeId);
}

/// Matches the empty sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyNode;

impl GrammarNode for EmptyNode {}

/// An indirection to exactly one other node, which may be rebound after the
/// rest of the grammar exists.
#[derive(Debug, Clone, Default)]
pub struct SlotNode {
    body: Option<NodeId>,
}

impl SlotNode {
    pub fn new(body: Option<NodeId>) -> Self {
        SlotNode { body }
    }

    pub fn get(&self) -> Option<NodeId> {
        self.body
    }

    pub fn set(&mut self, body: NodeId) {
        self.body = Some(body);
    }
}

impl GrammarNode for SlotNode {
    fn build_nfa(&self, grammar: &Grammar, nfa: &mut Builder, s0: StateId, s1: StateId) {
        match self.body {
            Some(body) => grammar.build(body, nfa, s0, s1),
            None => panic!("grammar slot was never bound"),
        }
    }

    fn children(&self) -> &[NodeId] {
        match &self.body {
            Some(body) => std::slice::from_ref(body),
            None => &[],
        }
    }

    fn as_slot_mut(&mut self) -> Option<&mut SlotNode> {
        Some(self)
    }
}

/// An arena of grammar nodes.
#[derive(Debug, Default)]
pub struct Grammar {
    nodes: Vec<Box<dyn GrammarNode>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node and return its ID
    pub fn push<N: GrammarNode + 'static>(&mut self, node: N) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Box::new(node));
        id
    }

    pub fn node(&self, id: NodeId) -> &dyn GrammarNode {
        &*self.nodes[id]
    }

    /// Add an unbound slot, to be filled in later with [`Grammar::bind`]
    pub fn slot(&mut self) -> NodeId {
        self.push(SlotNode::default())
    }

    /// Point the slot `slot` at `target`.
    ///
    /// # Panics
    ///
    /// When `slot` is not a [`SlotNode`] or `target` does not exist.
    pub fn bind(&mut self, slot: NodeId, target: NodeId) {
        assert!(target < self.nodes.len(), "node {} does not exist", target);
        self.nodes[slot]
            .as_slot_mut()
            .unwrap_or_else(|| panic!("node {} is not a slot", slot))
            .set(target);
    }

    /// Emit the sub-automaton of node `id` between `s0` and `s1`
    pub fn build(&self, id: NodeId, nfa: &mut Builder, s0: StateId, s1: StateId) {
        self.nodes[id].build_nfa(self, nfa, s0, s1);
    }

    /// Build a complete automaton for the language of `root`.
    ///
    /// # Panics
    ///
    /// When a node reachable from `root` refers back to one of its own
    /// ancestors through a slot, or a reachable slot is unbound.
    pub fn compile(&self, root: NodeId) -> NFA {
        self.check_acyclic(root);
        let mut nfa = Builder::new();
        self.build(root, &mut nfa, SRC, DST);
        nfa.build()
    }

    fn check_acyclic(&self, root: NodeId) {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            Open,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.nodes.len()];
        // (node, index of the next child to visit)
        let mut stack = vec![(root, 0)];
        marks[root] = Mark::Open;
        while let Some(top) = stack.last_mut() {
            let id = top.0;
            if let Some(&child) = self.nodes[id].children().get(top.1) {
                top.1 += 1;
                match marks[child] {
                    Mark::Open => panic!("grammar node {} refers to itself through node {}", child, id),
                    Mark::Unseen => {
                        marks[child] = Mark::Open;
                        stack.push((child, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[id] = Mark::Done;
                stack.pop();
            }
        }
    }
}
