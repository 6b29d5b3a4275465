//! Prefix tree dictionary
//!
//! This implements a trie over fixed-width symbols where:
//! - Every node owns its children and keeps a back-reference to its parent
//! - Leaves always end a stored word; removals prune dead branches upward
//! - Nodes live in an arena and refer to each other by index

mod iter;
mod node;
mod tree;

pub use iter::Words;
pub use node::{Node, NodeId};
pub use tree::{ByteTrie, CharTrie, Trie, TrieStats, Utf16Trie};

pub(crate) use node::NodeArena;
