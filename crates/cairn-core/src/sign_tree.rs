use std::fmt;

use crate::signature::Signature;
use crate::types::{ArgType, TypeSpec};

/// Prefix trie over parameter type lists. Each interior edge carries one
/// parameter type; after a signature's parameters are consumed a terminal
/// child (no type, just the overload index) is appended under the node
/// reached, so overloads sharing leading parameter types share nodes and
/// lookup cost is bounded by depth, not by overload count.
///
/// Nodes live in an arena and name each other by index. Parent links are
/// kept only for formatting; resolution walks strictly root to leaf.
///
/// Children (terminals included) stay in insertion order and the resolver
/// visits them depth-first, so among equally applicable overloads the
/// earliest registered one wins.
pub struct SignTree {
    nodes: Vec<Node>,
}

struct Node {
    /// Edge label from the parent. `None` on the root and on terminals.
    spec: Option<TypeSpec>,
    parent: usize,
    children: Vec<usize>,
    /// Overload index; present only on terminals.
    index: Option<usize>,
    /// On an interior node: some variadic tail rides the edge into this
    /// node, so it may absorb any count of trailing arguments. On a
    /// terminal: the overload ending here is itself variadic.
    variadic: bool,
}

const ROOT: usize = 0;

impl SignTree {
    pub fn new() -> Self {
        SignTree {
            nodes: vec![Node {
                spec: None,
                parent: ROOT,
                children: Vec::new(),
                index: None,
                variadic: false,
            }],
        }
    }

    /// Inserts a signature ending at overload `index`. Structurally equal
    /// parameter types reuse the existing edge; a variadic signature marks
    /// the node its last parameter leads to.
    pub fn insert(&mut self, signature: &Signature, index: usize) {
        let mut at = ROOT;
        for spec in signature.params() {
            at = self.child_for(at, spec);
        }
        if signature.is_variadic() {
            self.nodes[at].variadic = true;
        }
        let terminal = self.push_node(at, None);
        self.nodes[terminal].index = Some(index);
        self.nodes[terminal].variadic = signature.is_variadic();
    }

    fn child_for(&mut self, parent: usize, spec: &TypeSpec) -> usize {
        for &child in &self.nodes[parent].children {
            if self.nodes[child].spec.as_ref() == Some(spec) {
                return child;
            }
        }
        self.push_node(parent, Some(spec.clone()))
    }

    fn push_node(&mut self, parent: usize, spec: Option<TypeSpec>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            spec,
            parent,
            children: Vec::new(),
            index: None,
            variadic: false,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Finds the overload matching the argument types, or `None`. Depth-first
    /// with backtracking; on descending into a variadic-marked node whose
    /// edge type accepts every remaining argument, the tail absorbs them all.
    /// With all arguments consumed, a terminal at the current node beats a
    /// variadic tail entered with zero arguments.
    pub fn resolve(&self, args: &[ArgType]) -> Option<usize> {
        self.walk(ROOT, args)
    }

    fn walk(&self, at: usize, rest: &[ArgType]) -> Option<usize> {
        let node = &self.nodes[at];
        if rest.is_empty() {
            // Signatures ending exactly here, in registration order.
            for &c in &node.children {
                let child = &self.nodes[c];
                if child.spec.is_none() {
                    return child.index;
                }
            }
            // A variadic tail one edge below, matched by zero arguments.
            for &c in &node.children {
                let child = &self.nodes[c];
                if child.spec.is_some() && child.variadic {
                    if let Some(index) = self.variadic_terminal(c) {
                        return Some(index);
                    }
                }
            }
            return None;
        }
        let (head, tail) = (&rest[0], &rest[1..]);
        for &c in &node.children {
            let child = &self.nodes[c];
            let spec = match &child.spec {
                Some(spec) => spec,
                None => continue,
            };
            if !spec.accepts(head) {
                continue;
            }
            // Tail absorption. With exactly one argument left the plain
            // descent below reaches the same terminals and keeps
            // registration order among them, so only longer rests absorb.
            if child.variadic && !tail.is_empty() && tail.iter().all(|a| spec.accepts(a)) {
                if let Some(index) = self.variadic_terminal(c) {
                    return Some(index);
                }
            }
            if let Some(index) = self.walk(c, tail) {
                return Some(index);
            }
        }
        None
    }

    /// First variadic terminal directly under `at`.
    fn variadic_terminal(&self, at: usize) -> Option<usize> {
        for &c in &self.nodes[at].children {
            let child = &self.nodes[c];
            if child.spec.is_none() && child.variadic {
                return child.index;
            }
        }
        None
    }

    fn path_of(&self, terminal: usize) -> String {
        let mut parts = Vec::new();
        let mut at = self.nodes[terminal].parent;
        while at != ROOT {
            let node = &self.nodes[at];
            if let Some(spec) = &node.spec {
                parts.push(spec.describe());
            }
            at = node.parent;
        }
        parts.reverse();
        parts.join(" ")
    }
}

impl fmt::Debug for SignTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(index) = node.index {
                let mut path = self.path_of(id);
                if node.variadic {
                    path.push_str("...");
                }
                map.entry(&path, &index);
            }
        }
        map.finish()
    }
}

impl Default for SignTree {
    fn default() -> Self {
        SignTree::new()
    }
}
