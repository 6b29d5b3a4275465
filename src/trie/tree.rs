//! Trie container: word count, string API and persistence

use super::{Node, NodeArena, NodeId, Words};
use crate::store::{codec, read_file, write_file};
use crate::symbol::{Symbol, TextSymbol};
use crate::Result;
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Trie over UTF-8 bytes (`.trie1` files)
pub type ByteTrie = Trie<u8>;
/// Trie over UTF-16 code units (`.trie2` files)
pub type Utf16Trie = Trie<u16>;
/// Trie over Unicode scalar values (`.trie4` files)
pub type CharTrie = Trie<char>;

/// A set of strings stored in a prefix tree
///
/// Strings are slices of one [`Symbol`] type and are compared symbol by
/// symbol with no normalization. The empty string can never be stored.
///
/// Not synchronized: callers sharing a trie across threads must wrap it in
/// a lock themselves.
#[derive(Clone, Debug)]
pub struct Trie<S: Symbol = u8> {
    nodes: NodeArena<S>,
    word_count: usize,
}

/// Size summary of a trie
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TrieStats {
    /// Stored words
    pub words: usize,
    /// Live nodes, root included
    pub nodes: usize,
    /// Bytes per record in the file format
    pub symbol_width: usize,
}

impl<S: Symbol> Trie<S> {
    /// Create an empty trie
    pub fn new() -> Self {
        Trie {
            nodes: NodeArena::new(),
            word_count: 0,
        }
    }

    /// Create a trie holding every string in `words`
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[S]>,
    {
        let mut trie = Trie::new();
        trie.add_all(words);
        trie
    }

    /// Load a trie from a file written by [`Trie::write`]
    ///
    /// Any failure yields an empty trie; use [`Trie::try_read`] to see why.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let mut trie = Trie::new();
        trie.read(path);
        trie
    }

    /// Decode a trie from the bytes produced by [`Trie::to_bytes`]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (nodes, word_count) = codec::decode(data)?;
        Ok(Trie { nodes, word_count })
    }

    /// True if `word` is stored
    pub fn has(&self, word: &[S]) -> bool {
        self.nodes.has(NodeId::ROOT, word)
    }

    /// Store `word`
    ///
    /// Returns false, changing nothing, if `word` is empty or already stored.
    pub fn add(&mut self, word: &[S]) -> bool {
        if self.nodes.add(NodeId::ROOT, word) {
            self.word_count += 1;
            true
        } else {
            false
        }
    }

    /// Store each string in order; returns how many were newly added
    pub fn add_all<I>(&mut self, words: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[S]>,
    {
        words
            .into_iter()
            .filter(|word| self.add(word.as_ref()))
            .count()
    }

    /// Remove `word`, pruning nodes that no longer lead to any word
    ///
    /// Returns false, changing nothing, if `word` is not stored.
    pub fn remove(&mut self, word: &[S]) -> bool {
        if self.nodes.remove(NodeId::ROOT, word) {
            self.word_count -= 1;
            true
        } else {
            false
        }
    }

    /// Remove each string in order; returns how many were removed
    ///
    /// Not atomic: strings removed before a missing one stay removed.
    pub fn remove_all<I>(&mut self, words: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[S]>,
    {
        words
            .into_iter()
            .filter(|word| self.remove(word.as_ref()))
            .count()
    }

    /// Number of stored words
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Every stored word
    pub fn words(&self) -> HashSet<Vec<S>> {
        let mut words = HashSet::with_capacity(self.word_count);
        words.extend(self.iter());
        words
    }

    /// Lazily iterate over the stored words in unspecified order
    pub fn iter(&self) -> Words<'_, S> {
        self.nodes.words(NodeId::ROOT, Vec::new())
    }

    /// Remove every word, keeping the trie usable
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.word_count = 0;
    }

    /// The root node, which stands for the empty prefix
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Longest stored path along `word`
    ///
    /// Returns the node at the end of that path and its length in symbols.
    pub fn find(&self, word: &[S]) -> (NodeId, usize) {
        self.nodes.find(NodeId::ROOT, word)
    }

    /// Access a node returned by [`Trie::find`] or [`Trie::root`]
    pub fn node(&self, id: NodeId) -> &Node<S> {
        self.nodes.node(id)
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.live_count()
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            words: self.word_count,
            nodes: self.node_count(),
            symbol_width: S::WIDTH,
        }
    }

    /// Encode into the record format; empty for a trie without words
    pub fn to_bytes(&self) -> Result<Bytes> {
        codec::encode(&self.nodes, self.word_count)
    }

    /// Write the trie to `path`, returning the number of bytes written
    ///
    /// Writes nothing and creates no file when the trie is empty.
    pub fn try_write(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        if data.is_empty() {
            return Ok(0);
        }

        write_file(path, &data)?;
        debug!(
            path = %path.display(),
            bytes = data.len(),
            words = self.word_count,
            "wrote trie"
        );
        Ok(data.len())
    }

    /// Like [`Trie::try_write`], but reports any failure as 0 bytes written
    pub fn write(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.try_write(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "failed to write trie");
            0
        })
    }

    /// Replace the contents of this trie with the file at `path`
    ///
    /// Returns the number of words loaded. On error the trie is left empty.
    pub fn try_read(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.clear();

        let data = read_file(path)?;
        let (nodes, word_count) = codec::decode(&data)?;
        self.nodes = nodes;
        self.word_count = word_count;

        debug!(
            path = %path.display(),
            bytes = data.len(),
            words = word_count,
            "read trie"
        );
        Ok(word_count)
    }

    /// Like [`Trie::try_read`], but reports any failure as 0 words read
    pub fn read(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.try_read(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "failed to read trie");
            0
        })
    }
}

impl<S: TextSymbol> Trie<S> {
    pub fn has_str(&self, word: &str) -> bool {
        self.has(&S::encode_str(word))
    }

    pub fn add_str(&mut self, word: &str) -> bool {
        self.add(&S::encode_str(word))
    }

    pub fn remove_str(&mut self, word: &str) -> bool {
        self.remove(&S::encode_str(word))
    }

    /// Every stored word as text, sorted
    pub fn strings(&self) -> Vec<String> {
        let mut strings: Vec<String> = self.iter().map(|w| S::decode_lossy(&w)).collect();
        strings.sort();
        strings
    }
}

impl<S: Symbol> Default for Trie<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol, W: AsRef<[S]>> FromIterator<W> for Trie<S> {
    fn from_iter<I: IntoIterator<Item = W>>(iter: I) -> Self {
        Trie::from_words(iter)
    }
}

impl<S: Symbol, W: AsRef<[S]>> Extend<W> for Trie<S> {
    fn extend<I: IntoIterator<Item = W>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, S: Symbol> IntoIterator for &'a Trie<S> {
    type Item = Vec<S>;
    type IntoIter = Words<'a, S>;

    fn into_iter(self) -> Words<'a, S> {
        self.iter()
    }
}
