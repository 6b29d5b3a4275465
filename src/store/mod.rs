//! Persistence for tries
//!
//! This module implements the binary record format and the file handling
//! around it. Files carry no header: the reader must know the symbol width
//! a file was written with (by convention, a `.trie1`/`.trie2`/`.trie4`
//! extension).

pub(crate) mod codec;
mod file;

pub(crate) use file::{read_file, write_file};
