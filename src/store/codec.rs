//! Record stream encoding of a trie
//!
//! Format:
//! ```text
//! A flat sequence of WIDTH-byte records, each a little-endian u32 value
//! truncated to the symbol width. Three values are structural:
//!   '(' (0x28)  open: following records are children of the previous symbol
//!   ')' (0x29)  close: return to the parent level
//!   '*' (0x2A)  mark: the previous symbol ends a word and has children
//! Every other value is a symbol creating a child at the current level.
//!
//! The stream is wrapped in one '(' ... ')' pair for the root. A symbol
//! not followed by '(' is a leaf, and leaves are always words, so '*' is only
//! written for words that also have children.
//!
//!   {"a", "ab", "c"}  =>  ( a * ( b ) c )
//! ```
//!
//! Symbols whose value equals a structural record cannot be told apart from
//! it and are rejected by the encoder.

use crate::symbol::{Symbol, CLOSE, MARK, OPEN};
use crate::trie::{NodeArena, NodeId};
use crate::{Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Encode every word below the root of `arena`
///
/// A tree without words encodes to an empty buffer.
pub(crate) fn encode<S: Symbol>(arena: &NodeArena<S>, word_count: usize) -> Result<Bytes> {
    let root = arena.node(NodeId::ROOT);
    if root.children.is_empty() {
        return Ok(Bytes::new());
    }

    let mut out = BytesMut::with_capacity(2 * S::WIDTH * word_count.max(1));
    put_record::<S>(&mut out, OPEN);

    let mut stack = vec![root.children.iter()];
    while let Some(cursor) = stack.last_mut() {
        match cursor.next() {
            Some((symbol, child)) => {
                if symbol.is_reserved() {
                    return Err(Error::ReservedSymbol {
                        value: symbol.to_record(),
                    });
                }
                put_record::<S>(&mut out, symbol.to_record());

                let node = arena.node(*child);
                if node.children.is_empty() {
                    continue;
                }
                if node.is_word {
                    put_record::<S>(&mut out, MARK);
                }
                put_record::<S>(&mut out, OPEN);
                stack.push(node.children.iter());
            }
            None => {
                put_record::<S>(&mut out, CLOSE);
                stack.pop();
            }
        }
    }

    Ok(out.freeze())
}

/// Decode a record stream into a fresh tree
///
/// Returns the tree and the number of words it holds. An empty buffer is a
/// valid encoding of the empty tree.
pub(crate) fn decode<S: Symbol>(data: &[u8]) -> Result<(NodeArena<S>, usize)> {
    if data.len() % S::WIDTH != 0 {
        return Err(Error::Misaligned {
            len: data.len(),
            width: S::WIDTH,
        });
    }

    let mut arena = NodeArena::new();
    if data.is_empty() {
        return Ok((arena, 0));
    }

    let mut records = RecordReader::<S>::new(data);
    match records.next() {
        Some((_, OPEN)) => {}
        _ => return Err(Error::malformed(0, "stream must start with an open record")),
    }

    let mut word_count = 0;
    let mut current = NodeId::ROOT;
    let mut open_levels = 1usize;
    // Node created by the previous symbol record; it is a leaf unless an
    // open record follows
    let mut pending: Option<NodeId> = None;
    // An open record was just consumed and no child has been read yet
    let mut level_empty = true;

    for (index, value) in records {
        if open_levels == 0 {
            return Err(Error::malformed(index, "records after the top level closed"));
        }

        match value {
            OPEN => {
                let node = pending
                    .take()
                    .ok_or(Error::malformed(index, "open record without a symbol"))?;
                current = node;
                open_levels += 1;
                level_empty = true;
            }
            MARK => {
                let node = pending.ok_or(Error::malformed(index, "mark record without a symbol"))?;
                if !arena.mark(node) {
                    return Err(Error::malformed(index, "symbol marked twice"));
                }
                word_count += 1;
            }
            CLOSE => {
                if level_empty {
                    return Err(Error::malformed(index, "level closed without children"));
                }
                if let Some(leaf) = pending.take() {
                    word_count += usize::from(arena.mark(leaf));
                }
                open_levels -= 1;
                if open_levels > 0 {
                    current = arena
                        .node(current)
                        .parent()
                        .ok_or(Error::malformed(index, "close record above the root"))?;
                }
            }
            value => {
                if let Some(leaf) = pending.take() {
                    word_count += usize::from(arena.mark(leaf));
                }
                let symbol = S::from_record(value)
                    .ok_or(Error::malformed(index, "record is not a valid symbol"))?;
                let child = arena
                    .try_append(current, symbol)
                    .ok_or(Error::malformed(index, "symbol repeated within one level"))?;
                pending = Some(child);
                level_empty = false;
            }
        }
    }

    if open_levels > 0 {
        return Err(Error::malformed(data.len() / S::WIDTH, "unterminated stream"));
    }

    Ok((arena, word_count))
}

fn put_record<S: Symbol>(out: &mut BytesMut, value: u32) {
    out.put_uint_le(u64::from(value), S::WIDTH);
}

/// Yields `(record index, record value)` pairs
struct RecordReader<'a, S> {
    buf: &'a [u8],
    index: usize,
    _symbol: std::marker::PhantomData<S>,
}

impl<'a, S: Symbol> RecordReader<'a, S> {
    fn new(buf: &'a [u8]) -> Self {
        RecordReader {
            buf,
            index: 0,
            _symbol: std::marker::PhantomData,
        }
    }
}

impl<S: Symbol> Iterator for RecordReader<'_, S> {
    type Item = (usize, u32);

    fn next(&mut self) -> Option<(usize, u32)> {
        if self.buf.remaining() < S::WIDTH {
            return None;
        }
        let value = self.buf.get_uint_le(S::WIDTH) as u32;
        let index = self.index;
        self.index += 1;
        Some((index, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[&str]) -> NodeArena<u8> {
        let mut arena = NodeArena::new();
        for word in words {
            arena.add(NodeId::ROOT, word.as_bytes());
        }
        arena
    }

    fn words(arena: &NodeArena<u8>) -> Vec<Vec<u8>> {
        let mut words: Vec<_> = arena.words(NodeId::ROOT, Vec::new()).collect();
        words.sort();
        words
    }

    #[test]
    fn test_encode_single_chain() {
        let arena = build(&["a", "ab"]);
        assert_eq!(&encode(&arena, 2).unwrap()[..], b"(a*(b))");
    }

    #[test]
    fn test_encode_leaf_siblings() {
        let arena = build(&["x"]);
        assert_eq!(&encode(&arena, 1).unwrap()[..], b"(x)");

        let arena = build(&["xy", "xz"]);
        let encoded = encode(&arena, 2).unwrap();
        assert!(&encoded[..] == b"(x(yz))" || &encoded[..] == b"(x(zy))");
    }

    #[test]
    fn test_encode_empty_tree() {
        let arena = NodeArena::<u8>::new();
        assert!(encode(&arena, 0).unwrap().is_empty());
    }

    #[test]
    fn test_encode_pads_wide_records() {
        let mut arena = NodeArena::<u16>::new();
        arena.add(NodeId::ROOT, &[0x0161]);
        let encoded = encode(&arena, 1).unwrap();
        assert_eq!(&encoded[..], &[b'(', 0, 0x61, 0x01, b')', 0]);
    }

    #[test]
    fn test_encode_rejects_reserved_symbol() {
        let arena = build(&["f(x)"]);
        match encode(&arena, 1) {
            Err(Error::ReservedSymbol { value }) => assert_eq!(value, u32::from(b'(')),
            other => panic!("expected reserved symbol error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_counts_implied_and_explicit_marks() {
        let (arena, count) = decode::<u8>(b"(a*(b)c(de))").unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            words(&arena),
            vec![b"a".to_vec(), b"ab".to_vec(), b"cd".to_vec(), b"ce".to_vec()]
        );
        arena.assert_well_formed();
    }

    #[test]
    fn test_decode_empty_buffer() {
        let (arena, count) = decode::<u32>(&[]).unwrap();
        assert_eq!(count, 0);
        assert_eq!(arena.live_count(), 1);
    }

    #[test]
    fn test_decode_misaligned() {
        assert!(matches!(
            decode::<u16>(&[b'(', 0, b'a']),
            Err(Error::Misaligned { len: 3, width: 2 })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_streams() {
        let cases: [(&str, usize); 9] = [
            ("a)", 0),
            ("((a))", 1),
            ("(*a)", 1),
            ("(a**)", 3),
            ("(a())", 3),
            ("(aa)", 2),
            ("(a))", 3),
            ("(a)b", 3),
            ("(a(b)", 5),
        ];
        for (input, at) in cases {
            match decode::<u8>(input.as_bytes()) {
                Err(Error::Malformed { index, .. }) => assert_eq!(index, at, "input {input:?}"),
                other => panic!("input {input:?} should be malformed, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_rejects_invalid_char() {
        let mut data = BytesMut::new();
        for value in [OPEN, 0xD800, CLOSE] {
            data.put_u32_le(value);
        }
        assert!(matches!(
            decode::<char>(&data),
            Err(Error::Malformed { index: 1, .. })
        ));
    }

    #[test]
    fn test_roundtrip_preserves_structure() {
        let original = build(&["he", "tat", "tute", "tut", "t"]);
        let encoded = encode(&original, 5).unwrap();
        let (decoded, count) = decode::<u8>(&encoded).unwrap();

        assert_eq!(count, 5);
        assert_eq!(words(&decoded), words(&original));
        assert_eq!(decoded.live_count(), original.live_count());
        decoded.assert_well_formed();
    }
}
