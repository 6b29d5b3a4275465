//! # wordtrie
//!
//! An in-memory string dictionary built on a prefix tree.
//!
//! Strings are sequences of fixed-width symbols (bytes, UTF-16 code units or
//! Unicode scalars). Shared prefixes share nodes, removals prune branches
//! that no longer lead to a word, and the whole tree can be written to and
//! read back from a compact record file.
//!
//! ## Core Concepts
//!
//! - **Symbols**: One fixed-width unit of a stored string; one width per trie
//! - **Nodes**: Prefix positions held in an arena, addressed by [`NodeId`]
//! - **Words**: Stored strings, marked on the node that ends them
//! - **Records**: The file format, one symbol or structural marker per record
//!
//! ## Example
//!
//! ```
//! use wordtrie::ByteTrie;
//!
//! let mut trie = ByteTrie::new();
//! trie.add(b"tat");
//! trie.add(b"tut");
//! assert!(trie.has(b"tut"));
//! assert!(!trie.has(b"tu"));
//! assert_eq!(trie.word_count(), 2);
//! ```

mod store;
pub mod symbol;
pub mod trie;

mod error;

pub use error::{Error, Result};
pub use symbol::{Symbol, TextSymbol};
pub use trie::{ByteTrie, CharTrie, Node, NodeId, Trie, TrieStats, Utf16Trie, Words};
