//! Lazy word enumeration

use super::node::{Node, NodeId};
use crate::symbol::Symbol;
use std::collections::hash_map;
use std::iter::FusedIterator;

/// Iterator over the words stored below a node
///
/// Walks the tree depth first with an explicit stack of sibling cursors,
/// so arbitrarily long words cannot exhaust the call stack. The path to the
/// node being visited is kept in a single buffer that grows and shrinks one
/// symbol at a time. Order follows the child maps and is otherwise
/// unspecified.
pub struct Words<'a, S> {
    nodes: &'a [Node<S>],
    /// One cursor per open level; every level but the first owns the last
    /// symbol of `path`
    stack: Vec<hash_map::Iter<'a, S, NodeId>>,
    path: Vec<S>,
    /// The start node itself is a word and has not been yielded yet
    pending_start: bool,
}

impl<'a, S: Symbol> Words<'a, S> {
    pub(crate) fn new(nodes: &'a [Node<S>], start: NodeId, base: Vec<S>) -> Self {
        let node = &nodes[start.index()];
        Words {
            nodes,
            stack: vec![node.children.iter()],
            path: base,
            pending_start: node.is_word,
        }
    }
}

impl<S: Symbol> Iterator for Words<'_, S> {
    type Item = Vec<S>;

    fn next(&mut self) -> Option<Vec<S>> {
        if std::mem::take(&mut self.pending_start) {
            return Some(self.path.clone());
        }

        loop {
            let cursor = self.stack.last_mut()?;
            match cursor.next() {
                Some((symbol, child)) => {
                    let nodes = self.nodes;
                    let node = &nodes[child.index()];
                    self.path.push(*symbol);
                    self.stack.push(node.children.iter());
                    if node.is_word {
                        return Some(self.path.clone());
                    }
                }
                None => {
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        self.path.pop();
                    }
                }
            }
        }
    }
}

impl<S: Symbol> FusedIterator for Words<'_, S> {}
