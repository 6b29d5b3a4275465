//! Trie vertices and the arena that owns them

use super::iter::Words;
use crate::symbol::Symbol;
use std::collections::HashMap;

/// Stable handle to a node inside one trie
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every trie
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A single prefix position
///
/// A node exclusively owns the children in its map. `parent` is a plain
/// back-reference used for upward compaction.
#[derive(Clone, Debug)]
pub struct Node<S> {
    pub(crate) is_word: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: HashMap<S, NodeId>,
}

impl<S: Symbol> Node<S> {
    fn new(parent: Option<NodeId>) -> Self {
        Node {
            is_word: false,
            parent,
            children: HashMap::new(),
        }
    }

    /// True if the path to this node is a stored word
    pub fn is_word(&self) -> bool {
        self.is_word
    }

    /// Owning node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child reached by `symbol`
    pub fn child(&self, symbol: S) -> Option<NodeId> {
        self.children.get(&symbol).copied()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn reset(&mut self, parent: Option<NodeId>) {
        self.is_word = false;
        self.parent = parent;
        self.children.clear();
    }
}

/// Table of nodes addressed by [`NodeId`]
///
/// Slot 0 is the root and is never released. Released slots go on a free
/// list and are handed out again by later insertions.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<S> {
    nodes: Vec<Node<S>>,
    free: Vec<NodeId>,
}

impl<S: Symbol> NodeArena<S> {
    pub fn new() -> Self {
        NodeArena {
            nodes: vec![Node::new(None)],
            free: Vec::new(),
        }
    }

    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.index()]
    }

    /// Number of live nodes, root included
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Follow `key` from `from` as far as the tree allows
    ///
    /// Returns the last node reached and how many symbols of `key` were
    /// matched on the way there.
    pub fn find(&self, from: NodeId, key: &[S]) -> (NodeId, usize) {
        let mut current = from;
        let mut depth = 0;
        for symbol in key {
            match self.node(current).child(*symbol) {
                Some(next) => {
                    current = next;
                    depth += 1;
                }
                None => break,
            }
        }
        (current, depth)
    }

    pub fn has(&self, from: NodeId, key: &[S]) -> bool {
        let (node, depth) = self.find(from, key);
        depth == key.len() && self.node(node).is_word
    }

    /// Store `key` below `from`; false if empty or already stored
    pub fn add(&mut self, from: NodeId, key: &[S]) -> bool {
        if key.is_empty() {
            return false;
        }

        let (mut current, depth) = self.find(from, key);
        if depth == key.len() && self.node(current).is_word {
            return false;
        }

        for symbol in &key[depth..] {
            current = self.append(current, *symbol);
        }
        self.node_mut(current).is_word = true;
        true
    }

    /// Unmark `key` below `from` and drop nodes that no longer lead anywhere
    ///
    /// Only the topmost useless ancestor is detached; its subtree is then
    /// released. The walk never climbs past the first level below `from`.
    pub fn remove(&mut self, from: NodeId, key: &[S]) -> bool {
        if key.is_empty() {
            return false;
        }

        let (mut current, mut depth) = self.find(from, key);
        if depth < key.len() || !self.node(current).is_word {
            return false;
        }

        if !self.node(current).children.is_empty() {
            self.node_mut(current).is_word = false;
            return true;
        }

        while depth > 1 {
            let Some(parent) = self.node(current).parent else {
                break;
            };
            let parent_node = self.node(parent);
            if parent_node.is_word || parent_node.children.len() >= 2 {
                break;
            }
            current = parent;
            depth -= 1;
        }

        if let Some(parent) = self.node(current).parent {
            self.node_mut(parent).children.remove(&key[depth - 1]);
        }
        self.release(current);
        true
    }

    /// Create a child of `parent` under `symbol`, replacing nothing
    ///
    /// Callers must know `symbol` is absent from `parent`.
    fn append(&mut self, parent: NodeId, symbol: S) -> NodeId {
        let child = self.allocate(parent);
        self.node_mut(parent).children.insert(symbol, child);
        child
    }

    /// Create a child of `parent` unless `symbol` is already taken
    pub fn try_append(&mut self, parent: NodeId, symbol: S) -> Option<NodeId> {
        if self.node(parent).children.contains_key(&symbol) {
            return None;
        }
        Some(self.append(parent, symbol))
    }

    /// Mark `id` as a word; false if it already was one
    pub fn mark(&mut self, id: NodeId) -> bool {
        let node = self.node_mut(id);
        !std::mem::replace(&mut node.is_word, true)
    }

    /// Lazily enumerate the words below `from`, each prefixed by `base`
    pub fn words(&self, from: NodeId, base: Vec<S>) -> Words<'_, S> {
        Words::new(&self.nodes, from, base)
    }

    /// Drop every node except the root
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].reset(None);
        self.free.clear();
    }

    fn allocate(&mut self, parent: NodeId) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.node_mut(id).reset(Some(parent));
                id
            }
            None => {
                self.nodes.push(Node::new(Some(parent)));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Release `id` and everything below it
    ///
    /// The caller detaches `id` from its parent first.
    fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, NodeId::ROOT, "the root is never released");
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.node_mut(next);
            stack.extend(node.children.drain().map(|(_, child)| child));
            node.reset(None);
            self.free.push(next);
        }
    }

    /// Panics unless the tree below the root is well formed
    ///
    /// Checks that leaves are words, parent links agree with child maps,
    /// and every slot is either reachable or free, never both.
    #[cfg(test)]
    pub fn assert_well_formed(&self) {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            assert!(!seen[id.index()], "node {id:?} reachable twice");
            seen[id.index()] = true;

            let node = self.node(id);
            if id != NodeId::ROOT {
                assert!(
                    node.is_word || !node.children.is_empty(),
                    "dead leaf {id:?}"
                );
            }
            for child in node.children.values() {
                assert_eq!(self.node(*child).parent, Some(id), "bad parent link");
                stack.push(*child);
            }
        }

        for id in &self.free {
            assert!(!seen[id.index()], "free slot {id:?} is still linked");
            seen[id.index()] = true;
        }
        assert!(seen.iter().all(|s| *s), "leaked slot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(words: &[&str]) -> NodeArena<u8> {
        let mut arena = NodeArena::new();
        for word in words {
            assert!(arena.add(NodeId::ROOT, word.as_bytes()));
        }
        arena
    }

    #[test]
    fn test_find_reports_matched_depth() {
        let arena = arena(&["hat"]);

        let (node, depth) = arena.find(NodeId::ROOT, b"hats");
        assert_eq!(depth, 3);
        assert!(arena.node(node).is_word());

        let (node, depth) = arena.find(NodeId::ROOT, b"dog");
        assert_eq!((node, depth), (NodeId::ROOT, 0));

        let (_, depth) = arena.find(NodeId::ROOT, b"ha");
        assert_eq!(depth, 2);
    }

    #[test]
    fn test_has_requires_mark() {
        let arena = arena(&["hats"]);
        assert!(arena.has(NodeId::ROOT, b"hats"));
        assert!(!arena.has(NodeId::ROOT, b"hat"));
        assert!(!arena.has(NodeId::ROOT, b"hatsful"));
        assert!(!arena.has(NodeId::ROOT, b""));
    }

    #[test]
    fn test_add_rejects_empty_and_duplicates() {
        let mut arena = arena(&["hat"]);
        assert!(!arena.add(NodeId::ROOT, b""));
        assert!(!arena.add(NodeId::ROOT, b"hat"));
        assert_eq!(arena.live_count(), 4);

        // Marking an existing interior node allocates nothing
        assert!(arena.add(NodeId::ROOT, b"ha"));
        assert_eq!(arena.live_count(), 4);
        arena.assert_well_formed();
    }

    #[test]
    fn test_add_only_marks_terminal() {
        let arena = arena(&["tute"]);
        assert!(!arena.has(NodeId::ROOT, b"t"));
        assert!(!arena.has(NodeId::ROOT, b"tu"));
        assert!(!arena.has(NodeId::ROOT, b"tut"));
        assert!(arena.has(NodeId::ROOT, b"tute"));
    }

    #[test]
    fn test_remove_unmarks_interior_word() {
        let mut arena = arena(&["hat", "hatch"]);
        let before = arena.live_count();

        assert!(arena.remove(NodeId::ROOT, b"hat"));
        assert!(!arena.has(NodeId::ROOT, b"hat"));
        assert!(arena.has(NodeId::ROOT, b"hatch"));
        assert_eq!(arena.live_count(), before);
        arena.assert_well_formed();
    }

    #[test]
    fn test_remove_compacts_up_to_word() {
        let mut arena = arena(&["hat", "hats"]);
        assert!(arena.remove(NodeId::ROOT, b"hats"));

        let (node, depth) = arena.find(NodeId::ROOT, b"hats");
        assert_eq!(depth, 3);
        assert_eq!(arena.node(node).child_count(), 0);
        assert_eq!(arena.live_count(), 4);
        arena.assert_well_formed();
    }

    #[test]
    fn test_remove_compacts_up_to_branch() {
        let mut arena = arena(&["tat", "tute"]);
        assert!(arena.remove(NodeId::ROOT, b"tute"));

        let (node, depth) = arena.find(NodeId::ROOT, b"tu");
        assert_eq!(depth, 1);
        assert_eq!(arena.node(node).child_count(), 1);
        assert_eq!(arena.live_count(), 4);
        arena.assert_well_formed();
    }

    #[test]
    fn test_remove_stops_below_root() {
        let mut arena = arena(&["he"]);
        assert!(arena.remove(NodeId::ROOT, b"he"));
        assert_eq!(arena.node(NodeId::ROOT).child_count(), 0);
        assert_eq!(arena.live_count(), 1);
        arena.assert_well_formed();
    }

    #[test]
    fn test_remove_rejects_absent() {
        let mut arena = arena(&["hats"]);
        assert!(!arena.remove(NodeId::ROOT, b""));
        assert!(!arena.remove(NodeId::ROOT, b"hat"));
        assert!(!arena.remove(NodeId::ROOT, b"hatsful"));
        assert!(arena.has(NodeId::ROOT, b"hats"));
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut arena = arena(&["abc"]);
        assert!(arena.remove(NodeId::ROOT, b"abc"));
        assert_eq!(arena.live_count(), 1);

        assert!(arena.add(NodeId::ROOT, b"xyz"));
        assert_eq!(arena.nodes.len(), 4);
        arena.assert_well_formed();
    }

    #[test]
    fn test_operations_from_inner_node() {
        let mut arena = arena(&["tat"]);
        let (t, _) = arena.find(NodeId::ROOT, b"t");

        assert!(arena.add(t, b"ut"));
        assert!(arena.has(NodeId::ROOT, b"tut"));
        assert!(arena.remove(t, b"ut"));
        assert!(!arena.has(NodeId::ROOT, b"tut"));
        assert!(arena.has(NodeId::ROOT, b"tat"));
        arena.assert_well_formed();
    }

    #[test]
    fn test_long_key_release_is_iterative() {
        let mut arena = NodeArena::<u8>::new();
        let key = vec![b'a'; 200_000];
        assert!(arena.add(NodeId::ROOT, &key));
        assert!(arena.remove(NodeId::ROOT, &key));
        assert_eq!(arena.live_count(), 1);
    }

    #[test]
    fn test_try_append_and_mark() {
        let mut arena = NodeArena::<u8>::new();
        let a = arena.try_append(NodeId::ROOT, b'a').unwrap();
        assert!(arena.try_append(NodeId::ROOT, b'a').is_none());
        assert!(arena.mark(a));
        assert!(!arena.mark(a));
        assert!(arena.has(NodeId::ROOT, b"a"));
    }

    #[test]
    fn test_clear_keeps_root() {
        let mut arena = arena(&["he", "tat"]);
        arena.clear();
        assert_eq!(arena.live_count(), 1);
        assert_eq!(arena.node(NodeId::ROOT).child_count(), 0);
        assert!(arena.add(NodeId::ROOT, b"he"));
        arena.assert_well_formed();
    }
}
